pub mod document;
pub mod error;

pub use document::{DocumentRef, Fields, ProductDocument};
pub use error::{MigrationError, Result};
