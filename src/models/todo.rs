//! Todo record type.

use serde::{Deserialize, Serialize};

/// A single todo record.
///
/// Generic over the backend identifier type: the document and hash
/// backends key records by `String`, the relational backend by `i64`.
/// The id is optional because some backends assign it on first save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo<Id> {
    /// Record identifier. `None` until the backend assigns one.
    pub id: Option<Id>,
    /// The text payload. An empty string is allowed.
    pub text: String,
}

impl<Id> Todo<Id> {
    /// Creates a record with a known id.
    pub fn new(id: impl Into<Id>, text: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            text: text.into(),
        }
    }

    /// Creates a record whose id will be assigned by the store.
    pub fn unsaved(text: impl Into<String>) -> Self {
        Self {
            id: None,
            text: text.into(),
        }
    }
}
