pub mod batch;
pub mod engine;
pub mod memory;
pub mod persistence;
pub mod snapshot;

pub use batch::{FieldUpdate, MAX_BATCH_WRITES, WriteBatch};
pub use engine::DocumentStore;
pub use memory::MemoryDocumentStore;
pub use persistence::{JsonFileStore, SnapshotFile};
pub use snapshot::StoreSnapshot;
