//! Collection handles for document store operations.
//!
//! This module provides the per-collection view over a storage backend. A
//! collection is a named logical grouping of documents, lazily materialized by
//! the backend the first time a document is created in it.
//!
//! # Collection Types
//!
//! - [`Collection`] - Collection handle bound to a concrete backend type
//! - [`DynCollection`] - Dynamic dispatch version over a backend trait object
//!
//! # Example
//!
//! ```ignore
//! use doclite::selector::Selector;
//! use serde_json::json;
//!
//! # async fn example(store: &doclite::store::DocumentStore<impl doclite::backend::StoreBackend>) -> doclite::error::DocumentStoreResult<()> {
//! let posts = store.collection("posts");
//! posts.create(doclite::document::Document::from_value(json!({ "title": "post 1" }))?).await?;
//!
//! let matched = posts.read(&Selector::field("title", "post 1")).await?;
//! # Ok(()) }
//! ```

use crate::{
    backend::{DynStoreBackend, StoreBackend},
    document::{Document, DocumentBatch},
    error::DocumentStoreResult,
    patch::Patch,
    selector::Selector,
};

/// A collection handle with a reference to a storage backend.
///
/// All operations delegate to the backend with this handle's collection name.
/// The handle itself carries no state beyond the name; two handles with the
/// same name over the same backend observe the same documents.
///
/// # Type Parameters
///
/// * `'a` - Lifetime of the backend reference
/// * `B` - The storage backend type
#[derive(Debug)]
pub struct Collection<'a, B: StoreBackend> {
    name: String,
    backend: &'a B,
}

impl<'a, B: StoreBackend> Collection<'a, B> {
    /// Creates a new collection handle (internal use).
    pub(crate) fn new(name: String, backend: &'a B) -> Self {
        Self { name, backend }
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Creates new documents in the collection.
    ///
    /// Accepts a single document or a sequence of documents (anything
    /// convertible into a [`DocumentBatch`]). Documents without an `id` field
    /// are assigned a freshly generated random UUID; supplied ids are
    /// preserved verbatim. The collection's physical storage is materialized
    /// if it does not exist yet.
    ///
    /// # Arguments
    ///
    /// * `documents` - A document or sequence of documents to store
    ///
    /// # Returns
    ///
    /// The documents exactly as stored, in call order, generated ids included.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentStoreError`](crate::error::DocumentStoreError) if the operation fails.
    pub async fn create(
        &self,
        documents: impl Into<DocumentBatch> + Send,
    ) -> DocumentStoreResult<Vec<Document>> {
        Ok(self
            .backend
            .create_documents(documents.into().into_documents(), self.name())
            .await?)
    }

    /// Reads all documents in the collection matching a selector.
    ///
    /// An empty selector matches every document. Reading a collection that
    /// was never created returns an empty sequence. Result order is
    /// unspecified.
    ///
    /// # Arguments
    ///
    /// * `selector` - The conjunctive field-equals-value conditions
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentStoreError`](crate::error::DocumentStoreError) if the operation fails.
    pub async fn read(&self, selector: &Selector) -> DocumentStoreResult<Vec<Document>> {
        Ok(self
            .backend
            .read_documents(selector, self.name())
            .await?)
    }

    /// Updates all documents matching a selector by applying a patch.
    ///
    /// # Arguments
    ///
    /// * `selector` - The conjunctive conditions choosing documents to update
    /// * `patch` - The overwrite and array-append description
    ///
    /// # Returns
    ///
    /// The post-patch documents in matched-read order. A selector matching
    /// zero documents returns an empty sequence and performs no writes.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentStoreError`](crate::error::DocumentStoreError) if the operation fails.
    pub async fn update(
        &self,
        selector: &Selector,
        patch: &Patch,
    ) -> DocumentStoreResult<Vec<Document>> {
        Ok(self
            .backend
            .update_documents(selector, patch, self.name())
            .await?)
    }

    /// Deletes all documents matching a selector.
    ///
    /// An empty selector removes every document in the collection.
    ///
    /// # Arguments
    ///
    /// * `selector` - The conjunctive conditions choosing documents to remove
    ///
    /// # Returns
    ///
    /// The removed documents in matched-read order.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentStoreError`](crate::error::DocumentStoreError) if the operation fails.
    pub async fn delete(&self, selector: &Selector) -> DocumentStoreResult<Vec<Document>> {
        Ok(self
            .backend
            .delete_documents(selector, self.name())
            .await?)
    }
}

/// A dynamic (type-erased) collection handle over a backend trait object.
///
/// This struct provides the same operations as [`Collection`] but uses dynamic
/// dispatch, enabling different backend implementations at runtime without
/// generic type parameters.
///
/// # Type Parameters
///
/// * `'a` - Lifetime of the backend trait object reference
#[derive(Debug)]
pub struct DynCollection<'a> {
    name: String,
    backend: &'a dyn DynStoreBackend,
}

impl<'a> DynCollection<'a> {
    /// Creates a new dynamic collection handle (internal use).
    pub(crate) fn new(name: String, backend: &'a dyn DynStoreBackend) -> Self {
        Self { name, backend }
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Creates new documents in the collection.
    ///
    /// See [`Collection::create`].
    pub async fn create(
        &self,
        documents: impl Into<DocumentBatch> + Send,
    ) -> DocumentStoreResult<Vec<Document>> {
        Ok(self
            .backend
            .create_documents(documents.into().into_documents(), self.name())
            .await?)
    }

    /// Reads all documents in the collection matching a selector.
    ///
    /// See [`Collection::read`].
    pub async fn read(&self, selector: &Selector) -> DocumentStoreResult<Vec<Document>> {
        Ok(self
            .backend
            .read_documents(selector, self.name())
            .await?)
    }

    /// Updates all documents matching a selector by applying a patch.
    ///
    /// See [`Collection::update`].
    pub async fn update(
        &self,
        selector: &Selector,
        patch: &Patch,
    ) -> DocumentStoreResult<Vec<Document>> {
        Ok(self
            .backend
            .update_documents(selector, patch, self.name())
            .await?)
    }

    /// Deletes all documents matching a selector.
    ///
    /// See [`Collection::delete`].
    pub async fn delete(&self, selector: &Selector) -> DocumentStoreResult<Vec<Document>> {
        Ok(self
            .backend
            .delete_documents(selector, self.name())
            .await?)
    }
}
