//! Plan phase: decide, per document, whether `active` must be written.
//!
//! Everything here is pure; no store access.

use crate::core::{DocumentRef, ProductDocument};
use serde_json::Value;
use std::borrow::Cow;

pub const STATUS_FIELD: &str = "status";
pub const ACTIVE_FIELD: &str = "active";

/// Status assumed for documents without a usable `status`
pub const DEFAULT_STATUS: &str = "active";

/// A field write scheduled by the plan phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingUpdate {
    pub reference: DocumentRef,
    pub active: bool,
}

/// Loose truthiness of a stored value: `null`, `false`, `0` and `""` are falsy
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Effective status of a document
///
/// Absent or falsy values fall back to [`DEFAULT_STATUS`]. Non-string values
/// are rendered as JSON and therefore never equal `"active"`.
pub fn normalize_status(doc: &ProductDocument) -> Cow<'_, str> {
    match doc.field(STATUS_FIELD) {
        Some(value) if is_truthy(value) => match value {
            Value::String(s) => Cow::Borrowed(s.as_str()),
            other => Cow::Owned(other.to_string()),
        },
        _ => Cow::Borrowed(DEFAULT_STATUS),
    }
}

pub fn desired_active(doc: &ProductDocument) -> bool {
    normalize_status(doc) == DEFAULT_STATUS
}

/// Stored `active` value; `None` only when the field is absent
pub fn current_active(doc: &ProductDocument) -> Option<bool> {
    doc.field(ACTIVE_FIELD).map(is_truthy)
}

/// Schedule a write when the stored flag differs from the derived one
///
/// An unset flag differs from both `true` and `false`.
pub fn plan_update(doc: &ProductDocument) -> Option<PendingUpdate> {
    let desired = desired_active(doc);
    if current_active(doc) == Some(desired) {
        return None;
    }
    Some(PendingUpdate {
        reference: doc.reference.clone(),
        active: desired,
    })
}

/// Plan every document, keeping scan order
pub fn plan_updates(docs: &[ProductDocument]) -> Vec<PendingUpdate> {
    docs.iter().filter_map(plan_update).collect()
}
