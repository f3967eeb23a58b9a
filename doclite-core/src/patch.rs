//! Patch construction and update-merge semantics.
//!
//! A [`Patch`] describes a partial update in two independent parts:
//!
//! - Ordinary fields overwrite the corresponding document field entirely
//!   (shallow overwrite; nested objects are replaced wholesale, never deep-merged).
//! - Push fields (the `$push` key on the wire) append a value to an array field.
//!   If the target field is absent or not an array, it becomes a new
//!   single-element array holding the pushed value.
//!
//! Ordinary fields are always merged before push fields are applied, so a push
//! never overwrites an ordinary field set by the same patch.
//!
//! On the wire a patch is a single JSON object with push entries nested under
//! `$push`; the serde representation converts through that shape.
//!
//! # Example
//!
//! ```ignore
//! use doclite::patch::Patch;
//!
//! let patch = Patch::new().set("title", "updated post").push("tags", 3);
//! let updated = patch.apply(&doc);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    document::Document,
    error::{DocumentStoreError, DocumentStoreResult},
};

/// The reserved wire key holding array-append entries.
pub const PUSH_FIELD: &str = "$push";

/// A partial update description applied to every document matched by a selector.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct Patch {
    fields: Map<String, Value>,
    push: Map<String, Value>,
}

impl Patch {
    /// Creates an empty patch. Applying it returns documents unchanged.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field to a value, replacing any existing value wholesale.
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Appends a value to an array field. An absent or non-array field becomes
    /// a new single-element array containing the value.
    pub fn push(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push.insert(field.into(), value.into());
        self
    }

    /// Creates a patch from its wire shape, a JSON object whose `$push` key
    /// holds the array-append entries.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::InvalidPatch`] if the value is not a JSON
    /// object or its `$push` entry is not a JSON object.
    pub fn from_value(value: Value) -> DocumentStoreResult<Self> {
        match value {
            Value::Object(raw) => raw.try_into(),
            other => Err(DocumentStoreError::InvalidPatch(format!(
                "expected a JSON object, got {other}"
            ))),
        }
    }

    /// Returns `true` if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.push.is_empty()
    }

    /// Computes the patched version of a document.
    ///
    /// Ordinary fields are merged first, then push entries are applied: an
    /// existing array field gets the pushed value appended after its current
    /// elements; any other field is replaced with a single-element array.
    pub fn apply(&self, document: &Document) -> Document {
        let mut fields = document.fields().clone();

        for (field, value) in &self.fields {
            fields.insert(field.clone(), value.clone());
        }

        for (field, value) in &self.push {
            match fields.get_mut(field) {
                Some(Value::Array(items)) => items.push(value.clone()),
                _ => {
                    fields.insert(field.clone(), Value::Array(vec![value.clone()]));
                }
            }
        }

        Document::from(fields)
    }
}

impl TryFrom<Map<String, Value>> for Patch {
    type Error = DocumentStoreError;

    fn try_from(mut raw: Map<String, Value>) -> DocumentStoreResult<Self> {
        let push = match raw.remove(PUSH_FIELD) {
            None => Map::new(),
            Some(Value::Object(push)) => push,
            Some(other) => {
                return Err(DocumentStoreError::InvalidPatch(format!(
                    "\"{PUSH_FIELD}\" must map fields to appended values, got {other}"
                )));
            }
        };

        Ok(Self { fields: raw, push })
    }
}

impl From<Patch> for Map<String, Value> {
    fn from(patch: Patch) -> Self {
        let mut raw = patch.fields;

        if !patch.push.is_empty() {
            raw.insert(PUSH_FIELD.to_string(), Value::Object(patch.push));
        }

        raw
    }
}
