use super::batch::WriteBatch;
use super::engine::DocumentStore;
use super::snapshot::StoreSnapshot;
use crate::core::{DocumentRef, Fields, ProductDocument, Result};
use async_trait::async_trait;
use tokio::sync::Mutex;

/// In-process document store
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    state: Mutex<StoreSnapshot>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a document, replacing any existing one with the same id
    pub async fn insert(&self, collection: &str, id: &str, fields: Fields) {
        self.state.lock().await.insert(collection, id, fields);
    }

    pub async fn get(&self, collection: &str, id: &str) -> Option<Fields> {
        let reference = DocumentRef::new(collection, id);
        self.state.lock().await.get(&reference).cloned()
    }

    pub async fn snapshot(&self) -> StoreSnapshot {
        self.state.lock().await.clone()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn scan(&self, collection: &str) -> Result<Vec<ProductDocument>> {
        Ok(self.state.lock().await.documents(collection))
    }

    async fn commit(&self, batch: WriteBatch) -> Result<()> {
        self.state.lock().await.apply(&batch)
    }
}
