use super::batch::WriteBatch;
use crate::core::{ProductDocument, Result};
use async_trait::async_trait;

/// Document store trait - the client handle the migration runs against
///
/// Implementations are expected to be already connected and authenticated
/// when handed to a runner.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch every document of a collection in one call, ordered by id
    ///
    /// An unknown collection yields an empty list.
    async fn scan(&self, collection: &str) -> Result<Vec<ProductDocument>>;

    /// Apply all staged updates of the batch, or none of them
    async fn commit(&self, batch: WriteBatch) -> Result<()>;
}
