//! Core types for document representation and serialization.
//!
//! This module provides the schema-less [`Document`] type stored by every backend,
//! as well as utilities for converting documents between JSON values, serialized
//! text, and user-defined Rust types.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value, from_str, from_value, to_string, to_value};
use uuid::Uuid;

use crate::error::{DocumentStoreError, DocumentStoreResult};

/// The reserved identifier field present on every stored document.
pub const ID_FIELD: &str = "id";

/// A schema-less document: an arbitrary mapping from field names to
/// JSON-representable values (scalars, arrays, nested objects).
///
/// Every stored document carries a reserved `id` field. If the caller does not
/// supply one, the store generates a random UUID before persisting; a supplied
/// `id` of any JSON type is used verbatim and uniqueness is not enforced.
///
/// # Example
///
/// ```ignore
/// use doclite::document::Document;
/// use serde_json::json;
///
/// let doc = Document::from_value(json!({ "title": "post 1", "author": "jdoe" }))?;
/// assert_eq!(doc.get("author"), Some(&json!("jdoe")));
/// # Ok::<(), doclite::error::DocumentStoreError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Map<String, Value>);

impl Document {
    /// Creates a new empty document.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Creates a document from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::InvalidDocument`] if the value is not a JSON object.
    pub fn from_value(value: Value) -> DocumentStoreResult<Self> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(DocumentStoreError::InvalidDocument(format!(
                "expected a JSON object, got {other}"
            ))),
        }
    }

    /// Consumes the document and returns it as a JSON value.
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Parses a document from its serialized JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid JSON or not a JSON object.
    pub fn from_text(text: &str) -> DocumentStoreResult<Self> {
        Self::from_value(from_str(text)?)
    }

    /// Serializes the document to its full JSON text, the form persisted by backends.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_text(&self) -> DocumentStoreResult<String> {
        Ok(to_string(&self.0)?)
    }

    /// Creates a document from any serializable Rust value.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the value does not serialize
    /// to a JSON object.
    pub fn from_serialize<T: Serialize>(value: &T) -> DocumentStoreResult<Self> {
        Self::from_value(to_value(value)?)
    }

    /// Deserializes the document into a user-defined Rust type.
    ///
    /// # Errors
    ///
    /// Returns an error if the document's structure does not match the target type.
    pub fn deserialize_into<T: DeserializeOwned>(&self) -> DocumentStoreResult<T> {
        Ok(from_value(Value::Object(self.0.clone()))?)
    }

    /// Returns the document's `id` field, if present.
    pub fn id(&self) -> Option<&Value> {
        self.0.get(ID_FIELD)
    }

    /// Assigns a freshly generated random UUID to the `id` field if the document
    /// does not already have one. A present `id` is left untouched.
    pub fn ensure_id(&mut self) {
        if !self.0.contains_key(ID_FIELD) {
            self.0
                .insert(ID_FIELD.to_string(), Value::String(Uuid::new_v4().to_string()));
        }
    }

    /// Returns the value of a field, if present.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Sets a field to a value, returning the previous value if there was one.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(field.into(), value.into())
    }

    /// Removes a field, returning its value if it was present.
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.0.remove(field)
    }

    /// Returns `true` if the document has the given field.
    pub fn contains_field(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Returns the number of top-level fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the document has no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns a reference to the underlying field map.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Returns a mutable reference to the underlying field map.
    pub fn fields_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.0
    }
}

impl From<Map<String, Value>> for Document {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

impl From<Document> for Value {
    fn from(document: Document) -> Self {
        document.into_value()
    }
}

impl TryFrom<Value> for Document {
    type Error = DocumentStoreError;

    fn try_from(value: Value) -> DocumentStoreResult<Self> {
        Self::from_value(value)
    }
}

/// One-or-many normalization for [`Document`] arguments.
///
/// `create` accepts either a single document or a sequence of documents; this
/// type performs the normalization so backends always see a sequence. On the
/// wire a batch deserializes from a single JSON object or a JSON array of
/// objects, and serializes as the normalized array.
///
/// # Example
///
/// ```ignore
/// let one: DocumentBatch = doc.into();
/// let many: DocumentBatch = vec![doc_a, doc_b].into();
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentBatch(Vec<Document>);

impl DocumentBatch {
    /// Creates a batch from a JSON value holding a single document or an
    /// array of documents.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::InvalidDocument`] if the value (or any
    /// array element) is not a JSON object.
    pub fn from_value(value: Value) -> DocumentStoreResult<Self> {
        match value {
            Value::Array(items) => items
                .into_iter()
                .map(Document::from_value)
                .collect(),
            other => Ok(Document::from_value(other)?.into()),
        }
    }

    /// Consumes the batch and returns the normalized sequence of documents.
    pub fn into_documents(self) -> Vec<Document> {
        self.0
    }

    /// Returns the number of documents in the batch.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the batch holds no documents.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Document> for DocumentBatch {
    fn from(document: Document) -> Self {
        Self(vec![document])
    }
}

impl From<Vec<Document>> for DocumentBatch {
    fn from(documents: Vec<Document>) -> Self {
        Self(documents)
    }
}

impl<const N: usize> From<[Document; N]> for DocumentBatch {
    fn from(documents: [Document; N]) -> Self {
        Self(documents.into())
    }
}

impl FromIterator<Document> for DocumentBatch {
    fn from_iter<I: IntoIterator<Item = Document>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Serialize for DocumentBatch {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DocumentBatch {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum OneOrMany {
            One(Document),
            Many(Vec<Document>),
        }

        Ok(match OneOrMany::deserialize(deserializer)? {
            OneOrMany::One(document) => Self(vec![document]),
            OneOrMany::Many(documents) => Self(documents),
        })
    }
}
