use thiserror::Error;

#[derive(Error, Debug)]
pub enum MigrationError {
    #[error("Store connection error: {0}")]
    Connection(String),

    #[error("Batch {batch} commit failed after {committed} committed updates: {message}")]
    Write {
        batch: usize,
        committed: usize,
        message: String,
    },

    #[error("Write batch limit exceeded: at most {0} operations per batch")]
    BatchLimit(usize),

    #[error("Document '{0}' not found")]
    DocumentNotFound(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid runner state: {0}")]
    InvalidState(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, MigrationError>;

impl From<std::io::Error> for MigrationError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for MigrationError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
