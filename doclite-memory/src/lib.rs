//! In-memory document storage backend for doclite.
//!
//! This crate provides a thread-safe, in-memory implementation of the
//! `StoreBackend` trait. It uses async-aware read-write locks for concurrent
//! access and is ideal for development and testing.
//!
//! # Features
//!
//! - **Thread-safe access** - Concurrent reads and writes using an async-aware RwLock
//! - **Shared state** - Cheap clones of a store share the same documents
//! - **Structural matching** - Selector semantics mirror the SQL backend's
//!   JSON decomposition, so tests written against this backend behave the same
//!   against persistent storage
//!
//! # Quick Start
//!
//! ```ignore
//! use doclite::{document::Document, memory::InMemoryStore, selector::Selector, store::DocumentStore};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = DocumentStore::new(InMemoryStore::new());
//!     let posts = store.collection("posts");
//!
//!     posts.create(Document::from_value(json!({ "title": "post 1", "author": "jdoe" }))?).await?;
//!     let matched = posts.read(&Selector::field("author", "jdoe")).await?;
//!     assert_eq!(matched.len(), 1);
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as doclite_memory;

pub mod matcher;
pub mod store;

pub use store::{InMemoryStore, InMemoryStoreBuilder};
