//! A minimal schema-less JSON document store abstraction over pluggable backends.
//!
//! This crate is the core of the doclite project and provides:
//!
//! - **Document model** ([`document`]) - The schema-less [`Document`](document::Document) type and batch normalization
//! - **Selectors** ([`selector`]) - Conjunctive field-equals-value filtering
//! - **Patches** ([`patch`]) - Partial updates with overwrite and `$push` array-append semantics
//! - **Store backend abstraction** ([`backend`]) - Traits for implementing storage backends
//! - **Collections interface** ([`collection`]) - Per-collection handles over a backend
//! - **Document store** ([`store`]) - Main interface for working with a backend
//! - **Request adapter** ([`source`]) - The `fetch`/`mutate` request vocabulary
//! - **Error handling** ([`error`]) - Error and result types
//!
//! # Example
//!
//! ```ignore
//! use doclite_core::{document::Document, selector::Selector, store::DocumentStore};
//! use serde_json::json;
//!
//! let store = DocumentStore::new(backend);
//! let posts = store.collection("posts");
//!
//! posts.create(Document::from_value(json!({ "title": "post 1", "author": "jdoe" }))?).await?;
//! let by_author = posts.read(&Selector::field("author", "jdoe")).await?;
//! ```

#[allow(unused_extern_crates)]
extern crate self as doclite_core;

pub mod backend;
pub mod collection;
pub mod document;
pub mod error;
pub mod patch;
pub mod selector;
pub mod source;
pub mod store;
