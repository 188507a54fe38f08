// ============================================================================
// products_backfill Library
// ============================================================================

//! Backfill of the derived `active` flag on product documents.
//!
//! The run is a straight pipeline: scan the collection once, plan one write
//! per document whose stored `active` disagrees with its `status`, then commit
//! the writes in batches of at most [`DEFAULT_BATCH_SIZE`], one batch at a time.
//!
//! ```
//! use products_backfill::{MemoryDocumentStore, MigrationConfig, MigrationRunner};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> products_backfill::Result<()> {
//! let store = Arc::new(MemoryDocumentStore::new());
//! let serde_json::Value::Object(fields) = json!({ "status": "inactive" }) else {
//!     unreachable!()
//! };
//! store.insert("products", "sku-1", fields).await;
//!
//! let mut runner = MigrationRunner::new(store.clone(), MigrationConfig::default())?;
//! let report = runner.run().await?;
//! assert_eq!(report.updated, 1);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod core;
pub mod migration;
pub mod storage;

// Re-export main types for convenience
pub use config::{DEFAULT_BATCH_SIZE, DEFAULT_COLLECTION, MigrationConfig};
pub use crate::core::{DocumentRef, Fields, MigrationError, ProductDocument, Result};
pub use migration::{
    MigrationPhase, MigrationReport, MigrationRunner, PendingUpdate, normalize_status,
    plan_updates,
};
pub use storage::{
    DocumentStore, JsonFileStore, MAX_BATCH_WRITES, MemoryDocumentStore, StoreSnapshot,
    WriteBatch,
};
