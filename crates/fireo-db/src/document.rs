//! Stored document representation.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::value::Value;

/// A document as the store sees it: an optional id and its fields keyed by
/// storage key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// The document id, unset until one is assigned or generated.
    pub id: Option<String>,
    /// Field values keyed by storage key, in write order.
    pub fields: IndexMap<String, Value>,
}

impl Document {
    /// Creates an empty document with no id.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty document with the given id.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            fields: IndexMap::new(),
        }
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Sets the value stored under `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.fields.insert(key.into(), value);
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the document has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
