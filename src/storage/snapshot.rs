use super::batch::WriteBatch;
use crate::core::{DocumentRef, Fields, MigrationError, ProductDocument, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Serializable contents of a document store: collection -> id -> fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    #[serde(default)]
    pub collections: BTreeMap<String, BTreeMap<String, Fields>>,
}

impl StoreSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a whole document
    pub fn insert(&mut self, collection: &str, id: &str, fields: Fields) {
        self.collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), fields);
    }

    pub fn get(&self, reference: &DocumentRef) -> Option<&Fields> {
        self.collections
            .get(reference.collection())
            .and_then(|docs| docs.get(reference.id()))
    }

    pub fn documents(&self, collection: &str) -> Vec<ProductDocument> {
        let Some(docs) = self.collections.get(collection) else {
            return Vec::new();
        };
        docs.iter()
            .map(|(id, fields)| {
                ProductDocument::new(DocumentRef::new(collection, id.as_str()), fields.clone())
            })
            .collect()
    }

    /// Apply a batch atomically
    ///
    /// Every target is checked before the first field is written, so a failed
    /// batch leaves the snapshot unchanged.
    pub fn apply(&mut self, batch: &WriteBatch) -> Result<()> {
        if let Some(missing) = batch
            .updates()
            .iter()
            .find(|update| self.get(&update.reference).is_none())
        {
            return Err(MigrationError::DocumentNotFound(missing.reference.path()));
        }

        for update in batch.updates() {
            let reference = &update.reference;
            if let Some(fields) = self
                .collections
                .get_mut(reference.collection())
                .and_then(|docs| docs.get_mut(reference.id()))
            {
                fields.insert(update.field.clone(), update.value.clone());
            }
        }
        Ok(())
    }
}
