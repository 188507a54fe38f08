use crate::core::{DocumentRef, MigrationError, Result};
use serde_json::Value;

/// Hard provider limit on writes per atomic batch
pub const MAX_BATCH_WRITES: usize = 500;

/// One partial update: set `field` to `value`, leave every other field alone
#[derive(Debug, Clone, PartialEq)]
pub struct FieldUpdate {
    pub reference: DocumentRef,
    pub field: String,
    pub value: Value,
}

/// An ordered group of field updates committed atomically by a store
#[derive(Debug, Clone, Default)]
pub struct WriteBatch {
    updates: Vec<FieldUpdate>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a field update
    ///
    /// Fails once the batch already holds [`MAX_BATCH_WRITES`] operations.
    pub fn update(
        &mut self,
        reference: DocumentRef,
        field: impl Into<String>,
        value: Value,
    ) -> Result<&mut Self> {
        if self.updates.len() >= MAX_BATCH_WRITES {
            return Err(MigrationError::BatchLimit(MAX_BATCH_WRITES));
        }
        self.updates.push(FieldUpdate {
            reference,
            field: field.into(),
            value,
        });
        Ok(self)
    }

    pub fn updates(&self) -> &[FieldUpdate] {
        &self.updates
    }

    pub fn len(&self) -> usize {
        self.updates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }
}
