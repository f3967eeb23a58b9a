//! Error types and result types for document store operations.
//!
//! This module provides error handling for all document store operations.
//! Use [`DocumentStoreResult<T>`] as the return type for fallible operations.

use serde_json::Error as SerdeJsonError;
use thiserror::Error;

/// Represents all possible errors that can occur when interacting with a document store.
///
/// This enum covers serialization errors, malformed inputs, adapter dispatch
/// failures, and backend-specific errors.
#[derive(Error, Debug)]
pub enum DocumentStoreError {
    /// Serialization/deserialization error when converting documents to or from JSON text.
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// Error while establishing the backend connection. Fatal; operations are not retried.
    #[error("Initialization error: {0}")]
    Initialization(String),
    /// The value is not usable as a document (documents must be JSON objects).
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
    /// The value is not usable as a selector (selectors must be JSON objects).
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),
    /// The value is not usable as a patch (e.g. a non-object `$push` entry).
    #[error("Invalid patch: {0}")]
    InvalidPatch(String),
    /// An operation name the request adapter does not recognize.
    #[error("Operation \"{0}\" not supported")]
    UnsupportedOperation(String),
    /// An error occurred in the underlying storage backend. The backend's own
    /// diagnostic text is carried through unchanged.
    #[error("Backend error: {0}")]
    Backend(String),
}

/// A specialized `Result` type for document store operations.
///
/// This type alias is used throughout the crate to indicate operations that may fail
/// with a [`DocumentStoreError`].
pub type DocumentStoreResult<T> = Result<T, DocumentStoreError>;

impl From<SerdeJsonError> for DocumentStoreError {
    fn from(err: SerdeJsonError) -> Self {
        DocumentStoreError::Serialization(err.to_string())
    }
}
