//! SQLite backend implementation for doclite.
//!
//! This crate provides a SQLite-based implementation of the `StoreBackend`
//! trait over [libsql](https://github.com/tursodatabase/libsql). Each
//! collection is one table with a single `store` column; each document is one
//! row holding its full JSON serialization. Selector filtering decomposes the
//! serialized text at query time with SQLite's `json_tree`, so no schema is
//! ever declared.
//!
//! # Features
//!
//! - **Persistent storage** - Data is persisted to a database file, or kept
//!   in memory with the `:memory:` path
//! - **Schema-less filtering** - Selectors match arbitrary document fields
//!   through SQLite's structural JSON decomposition
//! - **Lazy connection** - The connection opens on first use and is shared by
//!   all operations on the store
//! - **Injection-safe naming** - Collection names are quoted as identifiers,
//!   so names containing SQL metacharacters stay ordinary isolated tables
//!
//! # Example
//!
//! ```ignore
//! use doclite::{document::Document, sqlite::SqliteStore, store::DocumentStore};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = DocumentStore::new(SqliteStore::new("posts.db"));
//!     let posts = store.collection("posts");
//!
//!     posts.create(Document::from_value(json!({ "title": "post 1" }))?).await?;
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as doclite_sqlite;

pub mod sql;
pub mod store;

pub use store::{SqliteStore, SqliteStoreBuilder};
