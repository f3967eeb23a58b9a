//! Storage backend abstraction for the document store.
//!
//! This module defines the core traits that abstract over different storage
//! implementations, allowing the document store to work with various backends
//! (in-memory, SQLite, etc.).
//!
//! # Overview
//!
//! The [`StoreBackend`] trait provides a unified async interface for the store's
//! operations: document creation, selector-filtered reads, patch updates,
//! deletion, and the catalog-level emptiness check. Implementations are required
//! to be thread-safe (`Send + Sync`) and support concurrent access.
//!
//! # Traits
//!
//! - [`StoreBackend`]: The core trait for storage backends
//! - [`DynStoreBackend`]: A trait for dynamic dispatch over backend implementations
//! - [`StoreBackendBuilder`]: Factory trait for creating backend instances
//!
//! # Examples
//!
//! ```ignore
//! use doclite::backend::StoreBackend;
//! use doclite::document::Document;
//! use serde_json::json;
//!
//! // Use a concrete backend implementation
//! let backend = MyBackendImpl::new();
//!
//! // Create a document in a collection
//! let doc = Document::from_value(json!({ "name": "Alice", "age": 30 }))?;
//! let stored = backend.create_documents(vec![doc], "users").await?;
//! assert!(stored[0].id().is_some());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use async_trait::async_trait;
use std::{any::Any, fmt::Debug};

use crate::{document::Document, error::DocumentStoreResult, patch::Patch, selector::Selector};

/// Abstract interface for document storage backends.
///
/// Implementers of this trait provide concrete storage strategies for
/// schema-less documents, from a simple in-memory map to a relational engine
/// holding one serialized blob per row.
///
/// # Thread Safety
///
/// All implementations must be thread-safe and support concurrent access from
/// multiple async tasks. The exact concurrency model is implementation-specific;
/// the backend provides statement-level atomicity only, and no application-level
/// locking spans the multi-step operations (`update_documents` and
/// `delete_documents` are read-then-write).
///
/// # Error Handling
///
/// Operations return [`DocumentStoreResult<T>`](crate::error::DocumentStoreResult).
/// Backends surface their underlying engine's errors without reinterpreting them,
/// carrying the original diagnostic text. No operation is retried automatically.
#[async_trait]
pub trait StoreBackend: Send + Sync + Debug {
    /// Creates new documents in a collection, materializing the collection if
    /// it does not exist yet.
    ///
    /// Documents without an `id` field are assigned a freshly generated random
    /// UUID before persisting; supplied ids are preserved verbatim and
    /// uniqueness is not enforced. Collection materialization is idempotent and
    /// must tolerate concurrent creation attempts.
    ///
    /// # Arguments
    ///
    /// * `documents` - The normalized sequence of documents to store
    /// * `collection` - The name of the collection to create into
    ///
    /// # Returns
    ///
    /// The documents exactly as stored (generated ids included), in call order,
    /// or a [`DocumentStoreError`](crate::error::DocumentStoreError) on failure.
    async fn create_documents(
        &self,
        documents: Vec<Document>,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Document>>;

    /// Reads all documents in a collection matching a selector.
    ///
    /// Every selector pair must match key-equals-value within the same
    /// document's structural decomposition, at any nesting depth, all pairs
    /// simultaneously. An empty selector matches every document. Reading a
    /// collection that was never created returns an empty sequence.
    ///
    /// # Arguments
    ///
    /// * `selector` - The conjunctive field-equals-value conditions
    /// * `collection` - The name of the collection to read
    ///
    /// # Returns
    ///
    /// The matching documents in unspecified order, or a
    /// [`DocumentStoreError`](crate::error::DocumentStoreError) on failure.
    async fn read_documents(
        &self,
        selector: &Selector,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Document>>;

    /// Updates all documents matching a selector by applying a patch.
    ///
    /// Matching documents are read, patched in memory ([`Patch::apply`]), and
    /// each matched row is overwritten in place. A selector matching zero
    /// documents performs no writes.
    ///
    /// # Arguments
    ///
    /// * `selector` - The conjunctive conditions choosing documents to update
    /// * `patch` - The overwrite and array-append description
    /// * `collection` - The name of the collection to update
    ///
    /// # Returns
    ///
    /// The post-patch documents in matched-read order, or a
    /// [`DocumentStoreError`](crate::error::DocumentStoreError) on failure.
    async fn update_documents(
        &self,
        selector: &Selector,
        patch: &Patch,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Document>>;

    /// Deletes all documents matching a selector.
    ///
    /// An empty selector removes every document in the collection. Deleting
    /// from a collection that was never created removes nothing.
    ///
    /// # Arguments
    ///
    /// * `selector` - The conjunctive conditions choosing documents to remove
    /// * `collection` - The name of the collection to delete from
    ///
    /// # Returns
    ///
    /// The removed documents in matched-read order, or a
    /// [`DocumentStoreError`](crate::error::DocumentStoreError) on failure.
    async fn delete_documents(
        &self,
        selector: &Selector,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Document>>;

    /// Reports whether the store currently holds zero collections.
    ///
    /// This is a catalog-level check used for bootstrap decisions, not a
    /// per-collection operation. A collection emptied of documents may still
    /// count as existing if its physical table persists.
    ///
    /// # Returns
    ///
    /// `true` if no collection has ever been materialized, or a
    /// [`DocumentStoreError`](crate::error::DocumentStoreError) on failure.
    async fn is_empty(&self) -> DocumentStoreResult<bool>;

    /// Cleanly shuts down the backend, releasing all resources.
    ///
    /// The default implementation is a no-op; backends with persistent storage
    /// or external connections should override this.
    ///
    /// # Returns
    ///
    /// Returns `Ok(())` on success, or a [`DocumentStoreError`](crate::error::DocumentStoreError) on failure.
    async fn shutdown(self) -> DocumentStoreResult<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

#[async_trait]
impl<B> StoreBackend for &B
where
    B: StoreBackend,
{
    async fn create_documents(
        &self,
        documents: Vec<Document>,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Document>> {
        (*self)
            .create_documents(documents, collection)
            .await
    }

    async fn read_documents(
        &self,
        selector: &Selector,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Document>> {
        (*self)
            .read_documents(selector, collection)
            .await
    }

    async fn update_documents(
        &self,
        selector: &Selector,
        patch: &Patch,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Document>> {
        (*self)
            .update_documents(selector, patch, collection)
            .await
    }

    async fn delete_documents(
        &self,
        selector: &Selector,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Document>> {
        (*self)
            .delete_documents(selector, collection)
            .await
    }

    async fn is_empty(&self) -> DocumentStoreResult<bool> {
        (*self).is_empty().await
    }
}

#[async_trait]
impl<B> StoreBackend for &mut B
where
    B: StoreBackend,
{
    async fn create_documents(
        &self,
        documents: Vec<Document>,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Document>> {
        (**self)
            .create_documents(documents, collection)
            .await
    }

    async fn read_documents(
        &self,
        selector: &Selector,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Document>> {
        (**self)
            .read_documents(selector, collection)
            .await
    }

    async fn update_documents(
        &self,
        selector: &Selector,
        patch: &Patch,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Document>> {
        (**self)
            .update_documents(selector, patch, collection)
            .await
    }

    async fn delete_documents(
        &self,
        selector: &Selector,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Document>> {
        (**self)
            .delete_documents(selector, collection)
            .await
    }

    async fn is_empty(&self) -> DocumentStoreResult<bool> {
        (**self).is_empty().await
    }
}

#[async_trait]
pub trait DynStoreBackend: Send + Sync + Debug {
    async fn create_documents(
        &self,
        documents: Vec<Document>,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Document>>;
    async fn read_documents(
        &self,
        selector: &Selector,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Document>>;
    async fn update_documents(
        &self,
        selector: &Selector,
        patch: &Patch,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Document>>;
    async fn delete_documents(
        &self,
        selector: &Selector,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Document>>;
    async fn is_empty(&self) -> DocumentStoreResult<bool>;
    async fn shutdown_boxed(self: Box<Self>) -> DocumentStoreResult<()>;

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

#[async_trait]
impl<B: StoreBackend + Send + Sync + 'static> DynStoreBackend for B {
    async fn create_documents(
        &self,
        documents: Vec<Document>,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Document>> {
        self.create_documents(documents, collection)
            .await
    }

    async fn read_documents(
        &self,
        selector: &Selector,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Document>> {
        self.read_documents(selector, collection)
            .await
    }

    async fn update_documents(
        &self,
        selector: &Selector,
        patch: &Patch,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Document>> {
        self.update_documents(selector, patch, collection)
            .await
    }

    async fn delete_documents(
        &self,
        selector: &Selector,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Document>> {
        self.delete_documents(selector, collection)
            .await
    }

    async fn is_empty(&self) -> DocumentStoreResult<bool> {
        self.is_empty().await
    }

    async fn shutdown_boxed(self: Box<Self>) -> DocumentStoreResult<()> {
        self.shutdown().await
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

#[async_trait]
pub trait StoreBackendBuilder {
    type Backend: StoreBackend;

    async fn build(self) -> DocumentStoreResult<Self::Backend>;
}
