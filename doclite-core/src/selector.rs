//! Selector construction for document filtering.
//!
//! A [`Selector`] is a flat mapping from field name to exact-match value. Every
//! pair must match simultaneously within a document's structural decomposition
//! (conjunctive match); an empty selector matches every document in a collection.
//!
//! Only equality comparisons are supported. There are no ranges, negation,
//! logical OR, or path operators.
//!
//! # Example
//!
//! ```ignore
//! use doclite::selector::Selector;
//!
//! let all = Selector::new();
//! let by_author = Selector::field("author", "jdoe");
//! let compound = Selector::field("author", "jdoe").and("title", "post 1");
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{DocumentStoreError, DocumentStoreResult};

/// A conjunctive set of field-equals-value conditions used to filter documents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selector(Map<String, Value>);

impl Selector {
    /// Creates an empty selector, which matches every document.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Creates a selector with a single field-equals-value condition.
    pub fn field(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new().and(field, value)
    }

    /// Adds a further field-equals-value condition; all conditions must match.
    pub fn and(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    /// Creates a selector from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::InvalidSelector`] if the value is not a JSON object.
    pub fn from_value(value: Value) -> DocumentStoreResult<Self> {
        match value {
            Value::Object(conditions) => Ok(Self(conditions)),
            other => Err(DocumentStoreError::InvalidSelector(format!(
                "expected a JSON object, got {other}"
            ))),
        }
    }

    /// Returns `true` if the selector has no conditions (matches everything).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of conditions.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over the field/value conditions.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl From<Map<String, Value>> for Selector {
    fn from(conditions: Map<String, Value>) -> Self {
        Self(conditions)
    }
}
