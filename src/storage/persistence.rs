//! File-backed document store
//!
//! The whole store lives in one JSON snapshot file. Every commit rewrites the
//! file through a temp file in the same directory followed by a rename, so a
//! reader never observes a half-applied batch.

use super::batch::WriteBatch;
use super::engine::DocumentStore;
use super::snapshot::StoreSnapshot;
use crate::core::{MigrationError, ProductDocument, Result};
use async_trait::async_trait;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::sync::Mutex;

// ============================================================================
// Snapshot File
// ============================================================================

pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self) -> Result<StoreSnapshot> {
        let file = File::open(&self.path).map_err(|e| {
            MigrationError::Connection(format!(
                "Failed to open store '{}': {}",
                self.path.display(),
                e
            ))
        })?;
        serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            MigrationError::Connection(format!(
                "Failed to parse store '{}': {}",
                self.path.display(),
                e
            ))
        })
    }

    pub fn save(&self, snapshot: &StoreSnapshot) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let temp = NamedTempFile::new_in(&dir)?;
        {
            let mut writer = BufWriter::new(temp.as_file());
            serde_json::to_writer_pretty(&mut writer, snapshot)?;
            writer.flush()?;
        }
        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|e| {
            MigrationError::Io(format!(
                "Failed to replace store '{}': {}",
                self.path.display(),
                e.error
            ))
        })?;
        // the rename is only durable once the directory entry is flushed
        if cfg!(unix) {
            File::open(&dir)?.sync_all()?;
        }
        Ok(())
    }
}

// ============================================================================
// JSON File Store
// ============================================================================

pub struct JsonFileStore {
    file: SnapshotFile,
    state: Mutex<StoreSnapshot>,
}

impl JsonFileStore {
    /// Open an existing snapshot file
    ///
    /// A missing or malformed file is a connection error: nothing can be
    /// migrated against it.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = SnapshotFile::new(path);
        let snapshot = file.load()?;
        Ok(Self {
            file,
            state: Mutex::new(snapshot),
        })
    }

    /// Write `snapshot` to `path` and open it
    pub fn create<P: AsRef<Path>>(path: P, snapshot: StoreSnapshot) -> Result<Self> {
        let file = SnapshotFile::new(path);
        file.save(&snapshot)?;
        Ok(Self {
            file,
            state: Mutex::new(snapshot),
        })
    }

    pub async fn snapshot(&self) -> StoreSnapshot {
        self.state.lock().await.clone()
    }
}

#[async_trait]
impl DocumentStore for JsonFileStore {
    async fn scan(&self, collection: &str) -> Result<Vec<ProductDocument>> {
        Ok(self.state.lock().await.documents(collection))
    }

    async fn commit(&self, batch: WriteBatch) -> Result<()> {
        if batch.is_empty() {
            return Ok(());
        }
        let mut state = self.state.lock().await;
        let mut next = state.clone();
        next.apply(&batch)?;
        self.file.save(&next)?;
        *state = next;
        Ok(())
    }
}
