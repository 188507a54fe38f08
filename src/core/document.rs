use serde_json::{Map, Value};
use std::fmt;

/// Free-form field map of a stored document
pub type Fields = Map<String, Value>;

/// Store-assigned identity of a document
///
/// Stable for the lifetime of the document; the migration never creates one.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentRef {
    collection: String,
    id: String,
}

impl DocumentRef {
    pub fn new(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            id: id.into(),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Slash-separated path, e.g. `products/sku-1`
    pub fn path(&self) -> String {
        format!("{}/{}", self.collection, self.id)
    }
}

impl fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}

/// A document as returned by a collection scan
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDocument {
    pub reference: DocumentRef,
    pub fields: Fields,
}

impl ProductDocument {
    pub fn new(reference: DocumentRef, fields: Fields) -> Self {
        Self { reference, fields }
    }

    /// Get a field value; `None` means the field is absent, not `null`
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}
