use crate::core::{MigrationError, Result};
use crate::storage::MAX_BATCH_WRITES;
use std::env;
use std::path::PathBuf;

/// Collection the backfill runs against
pub const DEFAULT_COLLECTION: &str = "products";

/// Updates per committed batch, kept below [`MAX_BATCH_WRITES`]
pub const DEFAULT_BATCH_SIZE: usize = 400;

pub const DEFAULT_STORE_PATH: &str = "products_store.json";

pub const ENV_STORE_PATH: &str = "PRODUCTS_STORE_PATH";
pub const ENV_COLLECTION: &str = "PRODUCTS_COLLECTION";
pub const ENV_BATCH_SIZE: &str = "PRODUCTS_BATCH_SIZE";

/// Migration configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationConfig {
    /// Collection to scan and update
    pub collection: String,

    /// Maximum number of updates per atomic batch
    pub batch_size: usize,

    /// Location of the file-backed store (used by the binary only)
    pub store_path: PathBuf,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            collection: DEFAULT_COLLECTION.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
        }
    }
}

impl MigrationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the collection name
    pub fn collection(mut self, collection: &str) -> Self {
        self.collection = collection.to_string();
        self
    }

    /// Set the batch size
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Set the store path
    pub fn store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.store_path = path.into();
        self
    }

    /// Build from `PRODUCTS_*` environment variables, falling back to defaults
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(path) = lookup(ENV_STORE_PATH) {
            config = config.store_path(path);
        }
        if let Some(collection) = lookup(ENV_COLLECTION) {
            config = config.collection(&collection);
        }
        if let Some(raw) = lookup(ENV_BATCH_SIZE) {
            let batch_size = raw.trim().parse::<usize>().map_err(|_| {
                MigrationError::InvalidConfig(format!("invalid {}='{}'", ENV_BATCH_SIZE, raw))
            })?;
            config = config.batch_size(batch_size);
        }
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.collection.trim().is_empty() {
            return Err(MigrationError::InvalidConfig(
                "collection cannot be empty".to_string(),
            ));
        }

        if self.batch_size == 0 {
            return Err(MigrationError::InvalidConfig(
                "batch_size must be > 0".to_string(),
            ));
        }

        if self.batch_size >= MAX_BATCH_WRITES {
            return Err(MigrationError::InvalidConfig(format!(
                "batch_size must stay below the store limit of {} writes per batch",
                MAX_BATCH_WRITES
            )));
        }

        Ok(())
    }
}
