//! Main doclite crate providing a schema-less JSON document store over SQLite.
//!
//! This crate is the primary entry point for users of doclite. It re-exports
//! the core types and functionality from the sub-crates and provides
//! convenient access to the storage backends.
//!
//! # Features
//!
//! - **Schema-less documents** - Store arbitrary JSON objects in named
//!   collections without declaring a schema
//! - **Structural filtering** - Match documents by field-equals-value
//!   selectors decomposed from the stored JSON at query time
//! - **Patch updates** - Overwrite fields or append to array fields with the
//!   `$push` modifier
//! - **Multiple backends** - SQLite persistence and an in-memory backend for
//!   development and testing, behind one extensible trait
//!
//! # Quick Start
//!
//! ```ignore
//! use doclite::{document::Document, patch::Patch, selector::Selector, sqlite::SqliteStore, store::DocumentStore};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // An in-memory SQLite database; pass a file path for persistence.
//!     let store = DocumentStore::new(SqliteStore::in_memory());
//!     let posts = store.collection("posts");
//!
//!     // Create documents; ids are generated when absent.
//!     posts.create(vec![
//!         Document::from_value(json!({ "title": "post 1", "author": "jdoe" }))?,
//!         Document::from_value(json!({ "title": "post 2", "author": "jsmith" }))?,
//!     ]).await?;
//!
//!     // Filter by any field, at any nesting depth.
//!     let by_author = posts.read(&Selector::field("author", "jdoe")).await?;
//!     assert_eq!(by_author.len(), 1);
//!
//!     // Overwrite fields and append to arrays.
//!     posts.update(
//!         &Selector::field("author", "jdoe"),
//!         &Patch::new().set("title", "updated").push("tags", "news"),
//!     ).await?;
//!
//!     store.shutdown().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Request Adapter
//!
//! For upstream layers speaking the generic `fetch`/`mutate` request
//! vocabulary, bind a store to a collection with
//! [`DocumentStore::source`](store::DocumentStore::source):
//!
//! ```ignore
//! use doclite::source::{FetchOperation, Mutation};
//! use doclite::selector::Selector;
//! use serde_json::json;
//!
//! let source = store.source("posts");
//!
//! source.mutate(vec![
//!     Mutation::parse("create", json!(null), json!({ "title": "post 1" }))?,
//! ]).await?;
//!
//! let first = source.fetch(FetchOperation::Read, &Selector::new()).await?;
//! ```
//!
//! # Backends
//!
//! - [`memory`] - Fast in-memory storage for development and testing
//! - [`sqlite`] - Persistent SQLite backend

pub mod prelude;

pub use doclite_core::{backend, collection, document, error, patch, selector, source, store};

// Re-export the JSON types for convenience
pub use serde_json;

/// In-memory storage backend implementations.
pub mod memory {
    pub use doclite_memory::{InMemoryStore, InMemoryStoreBuilder};
}

/// SQLite storage backend implementations.
pub mod sqlite {
    pub use doclite_sqlite::{SqliteStore, SqliteStoreBuilder};
}
