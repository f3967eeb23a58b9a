//! Main document store interface for interacting with document backends.
//!
//! This module provides the primary API for working with document stores. It exposes three store types:
//!
//! - [`DocumentStore`] - Typed store for working with a specific backend implementation
//! - [`DynDocumentStore`] - Dynamic dispatch store for runtime backend selection
//! - [`DynDocumentStoreRef`] - Reference-based store for temporary use
//!
//! Additionally, it provides conversion traits for flexible store type handling.
//!
//! # Example
//!
//! ```ignore
//! use doclite::store::DocumentStore;
//!
//! let store = DocumentStore::new(backend);
//! let posts = store.collection("posts");
//! ```

use crate::{
    backend::{DynStoreBackend, StoreBackend},
    collection::{Collection, DynCollection},
    error::DocumentStoreResult,
    source::DocumentSource,
};

/// A document store bound to a specific backend implementation.
///
/// This struct provides access to a document store with compile-time knowledge
/// of the backend type, enabling full backend optimization.
///
/// # Type Parameters
///
/// * `B` - The backend implementation type
///
/// # Example
///
/// ```ignore
/// let store = DocumentStore::new(my_backend);
/// let posts = store.collection("posts");
/// ```
#[derive(Debug)]
pub struct DocumentStore<B: StoreBackend> {
    backend: B,
}

impl<B: StoreBackend> DocumentStore<B> {
    /// Creates a new document store with the given backend.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Gets a collection handle with the given name.
    ///
    /// The collection does not need to exist yet; it is materialized by the
    /// backend on first `create`.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the collection
    pub fn collection<'a>(&'a self, name: &str) -> Collection<'a, B> {
        Collection::new(name.to_string(), &self.backend)
    }

    /// Gets a request adapter bound to a collection, borrowing this store.
    ///
    /// The returned [`DocumentSource`] exposes the generic `fetch`/`mutate`
    /// request vocabulary over the given collection.
    ///
    /// # Arguments
    ///
    /// * `collection` - The name of the collection the adapter serves
    pub fn source<'a>(&'a self, collection: &str) -> DocumentSource<&'a B> {
        DocumentSource::new(DocumentStore::new(&self.backend), collection)
    }

    /// Reports whether the store currently holds zero collections.
    ///
    /// This is a catalog-level check used for bootstrap decisions. A collection
    /// emptied of documents may still count as existing if its physical storage
    /// persists.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be inspected.
    pub async fn is_empty(&self) -> DocumentStoreResult<bool> {
        self.backend.is_empty().await
    }

    /// Shuts down the store and releases backend resources.
    ///
    /// This consumes the store and should be called when no longer needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the shutdown operation fails.
    pub async fn shutdown(self) -> DocumentStoreResult<()> {
        self.backend.shutdown().await?;

        Ok(())
    }
}

/// A document store over a boxed backend trait object.
///
/// Use this store type when the backend implementation is selected at runtime.
#[derive(Debug)]
pub struct DynDocumentStore {
    backend: Box<dyn DynStoreBackend>,
}

impl DynDocumentStore {
    /// Creates a new dynamic document store with the given backend trait object.
    pub fn new(backend: Box<dyn DynStoreBackend>) -> Self {
        Self { backend }
    }

    /// Gets a dynamic collection handle with the given name.
    pub fn collection<'a>(&'a self, name: &str) -> DynCollection<'a> {
        DynCollection::new(name.to_string(), &*self.backend)
    }

    /// Reports whether the store currently holds zero collections.
    pub async fn is_empty(&self) -> DocumentStoreResult<bool> {
        self.backend.is_empty().await
    }

    /// Shuts down the store and releases backend resources.
    pub async fn shutdown(self) -> DocumentStoreResult<()> {
        self.backend.shutdown_boxed().await
    }
}

/// A borrowed view of a document store over a backend trait object.
#[derive(Debug)]
pub struct DynDocumentStoreRef<'a> {
    backend: &'a dyn DynStoreBackend,
}

impl<'a> DynDocumentStoreRef<'a> {
    /// Creates a reference to a dynamic document store.
    pub fn new(backend: &'a dyn DynStoreBackend) -> Self {
        Self { backend }
    }

    /// Gets a dynamic collection handle with the given name.
    pub fn collection(&'a self, name: &str) -> DynCollection<'a> {
        DynCollection::new(name.to_string(), self.backend)
    }

    /// Reports whether the store currently holds zero collections.
    pub async fn is_empty(&self) -> DocumentStoreResult<bool> {
        self.backend.is_empty().await
    }
}

/// Conversion trait for converting a document store to a dynamic reference.
///
/// This trait allows converting any store type to a [`DynDocumentStoreRef`] for runtime polymorphism.
pub trait AsDynDocumentStore {
    /// Converts this store to a dynamic reference.
    fn as_dyn<'a>(&'a self) -> DynDocumentStoreRef<'a>;
}

/// Conversion trait for converting a document store into a dynamic owned store.
///
/// This trait allows converting any store type to a [`DynDocumentStore`] for runtime polymorphism.
pub trait IntoDynDocumentStore {
    /// Converts this store into a dynamic owned store.
    fn into_dyn(self) -> DynDocumentStore;
}

impl<B: StoreBackend + 'static> AsDynDocumentStore for DocumentStore<B> {
    fn as_dyn<'a>(&'a self) -> DynDocumentStoreRef<'a> {
        DynDocumentStoreRef::new(&self.backend)
    }
}

impl<B: StoreBackend + 'static> AsDynDocumentStore for &'_ DocumentStore<B> {
    fn as_dyn<'a>(&'a self) -> DynDocumentStoreRef<'a> {
        DynDocumentStoreRef::new(&self.backend)
    }
}

impl AsDynDocumentStore for DynDocumentStore {
    fn as_dyn<'a>(&'a self) -> DynDocumentStoreRef<'a> {
        DynDocumentStoreRef::new(&*self.backend)
    }
}

impl<'a> AsDynDocumentStore for DynDocumentStoreRef<'a> {
    fn as_dyn<'b>(&'b self) -> DynDocumentStoreRef<'b> {
        DynDocumentStoreRef::new(self.backend)
    }
}

impl<B: StoreBackend + 'static> IntoDynDocumentStore for DocumentStore<B> {
    fn into_dyn(self) -> DynDocumentStore {
        DynDocumentStore::new(Box::new(self.backend))
    }
}

impl IntoDynDocumentStore for DynDocumentStore {
    fn into_dyn(self) -> DynDocumentStore {
        self
    }
}

/// Conversion trait for recovering a typed store view from a dynamic one.
pub trait AsStaticDocumentStore {
    /// Downcasts to a borrowed typed store, or `None` if the backend is not a `B`.
    fn as_static<'a, B>(&'a self) -> Option<DocumentStore<&'a B>>
    where
        B: StoreBackend + 'static;
}

/// Conversion trait for recovering an owned typed store from a dynamic one.
pub trait IntoStaticDocumentStore {
    /// Downcasts into an owned typed store, or `None` if the backend is not a `B`.
    fn into_static<B>(self) -> Option<DocumentStore<B>>
    where
        B: StoreBackend + 'static;
}

impl AsStaticDocumentStore for DynDocumentStore {
    fn as_static<'a, B>(&'a self) -> Option<DocumentStore<&'a B>>
    where
        B: StoreBackend + 'static,
    {
        self.backend
            .as_any()
            .downcast_ref::<B>()
            .map(|b| DocumentStore::new(b))
    }
}

impl<'a> AsStaticDocumentStore for DynDocumentStoreRef<'a> {
    fn as_static<'b, B>(&'b self) -> Option<DocumentStore<&'b B>>
    where
        B: StoreBackend + 'static,
    {
        self.backend
            .as_any()
            .downcast_ref::<B>()
            .map(|b| DocumentStore::new(b))
    }
}

impl IntoStaticDocumentStore for DynDocumentStore {
    fn into_static<B>(self) -> Option<DocumentStore<B>>
    where
        B: StoreBackend + 'static,
    {
        self.backend
            .into_any()
            .downcast::<B>()
            .ok()
            .map(|b| DocumentStore::new(*b))
    }
}
