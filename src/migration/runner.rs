use super::plan::{ACTIVE_FIELD, PendingUpdate, plan_updates};
use crate::config::MigrationConfig;
use crate::core::{MigrationError, ProductDocument, Result};
use crate::storage::{DocumentStore, WriteBatch};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{Instrument, Level, event, info_span};

/// Lifecycle of a single migration run
///
/// Phases only move forward; `Failed` and `Done` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationPhase {
    Pending,
    Scanning,
    Planning,
    Applying,
    Done,
    Failed,
}

impl fmt::Display for MigrationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::Scanning => "scanning",
            Self::Planning => "planning",
            Self::Applying => "applying",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Counters of a completed run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub scanned: usize,
    pub updated: usize,
    pub batches_committed: usize,
}

/// Scans a collection, plans `active` writes and commits them in batches
pub struct MigrationRunner {
    store: Arc<dyn DocumentStore>,
    config: MigrationConfig,
    phase: MigrationPhase,
}

impl MigrationRunner {
    pub fn new(store: Arc<dyn DocumentStore>, config: MigrationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store,
            config,
            phase: MigrationPhase::Pending,
        })
    }

    pub fn phase(&self) -> MigrationPhase {
        self.phase
    }

    /// Run the migration once
    ///
    /// A commit failure stops the run; batches committed before it stay applied.
    pub async fn run(&mut self) -> Result<MigrationReport> {
        if self.phase != MigrationPhase::Pending {
            return Err(MigrationError::InvalidState(format!(
                "migration already {}",
                self.phase
            )));
        }

        let span = info_span!(
            "migration.run",
            collection = %self.config.collection,
            batch_size = self.config.batch_size
        );
        match self.execute().instrument(span.clone()).await {
            Ok(report) => {
                self.phase = MigrationPhase::Done;
                let _enter = span.enter();
                event!(
                    Level::INFO,
                    scanned = report.scanned,
                    updated = report.updated,
                    batches = report.batches_committed,
                    "migration complete"
                );
                Ok(report)
            }
            Err(err) => {
                let failed_in = self.phase;
                self.phase = MigrationPhase::Failed;
                let _enter = span.enter();
                event!(Level::ERROR, phase = %failed_in, error = %err, "migration failed");
                Err(err)
            }
        }
    }

    async fn execute(&mut self) -> Result<MigrationReport> {
        self.phase = MigrationPhase::Scanning;
        let documents = self.scan().await?;

        self.phase = MigrationPhase::Planning;
        let pending = plan_updates(&documents);
        event!(Level::INFO, updates = pending.len(), "planned updates");

        self.phase = MigrationPhase::Applying;
        let batches_committed = self.apply(&pending).await?;

        Ok(MigrationReport {
            scanned: documents.len(),
            updated: pending.len(),
            batches_committed,
        })
    }

    async fn scan(&self) -> Result<Vec<ProductDocument>> {
        let collection = self.config.collection.as_str();
        event!(Level::INFO, "scanning collection");
        let documents = self.store.scan(collection).await.map_err(|err| match err {
            MigrationError::Connection(_) => err,
            other => MigrationError::Connection(format!(
                "scan of '{}' failed: {}",
                collection, other
            )),
        })?;
        event!(Level::INFO, documents = documents.len(), "scan finished");
        Ok(documents)
    }

    async fn apply(&self, pending: &[PendingUpdate]) -> Result<usize> {
        let batch_size = self.config.batch_size;
        let total = pending.len().div_ceil(batch_size);
        let mut committed = 0;
        let mut batches = 0;

        for (index, chunk) in pending.chunks(batch_size).enumerate() {
            let number = index + 1;
            let write_error = move |err: MigrationError| MigrationError::Write {
                batch: number,
                committed,
                message: err.to_string(),
            };

            let mut batch = WriteBatch::new();
            for update in chunk {
                event!(
                    Level::DEBUG,
                    document = %update.reference,
                    active = update.active,
                    "staging update"
                );
                batch
                    .update(update.reference.clone(), ACTIVE_FIELD, Value::Bool(update.active))
                    .map_err(write_error)?;
            }

            event!(
                Level::INFO,
                batch = number,
                of = total,
                updates = chunk.len(),
                "committing batch"
            );
            self.store.commit(batch).await.map_err(write_error)?;
            committed += chunk.len();
            batches += 1;
        }

        Ok(batches)
    }
}
