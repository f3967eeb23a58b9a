//! Convenient re-exports of commonly used types from doclite.
//!
//! Import this prelude module to quickly access the most frequently used types
//! and traits without needing to import from multiple sub-modules:
//!
//! ```ignore
//! use doclite::prelude::*;
//! ```
//!
//! This provides access to:
//! - Document, selector, and patch types
//! - Store backends and builders
//! - Collection and store interfaces
//! - The request adapter
//! - Error types

pub use doclite_core::{
    backend::{DynStoreBackend, StoreBackend, StoreBackendBuilder},
    collection::{Collection, DynCollection},
    document::{Document, DocumentBatch},
    error::{DocumentStoreError, DocumentStoreResult},
    patch::Patch,
    selector::Selector,
    source::{DocumentSource, FetchOperation, FetchResult, Mutation, MutationResult},
    store::{
        AsDynDocumentStore, AsStaticDocumentStore, DocumentStore, DynDocumentStore,
        DynDocumentStoreRef, IntoDynDocumentStore, IntoStaticDocumentStore,
    },
};
