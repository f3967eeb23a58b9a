//! In-memory storage implementation for document stores.
//!
//! This module provides a simple in-memory backend that stores documents in a
//! HashMap of collections behind an async-safe read-write lock.

use async_trait::async_trait;
use mea::rwlock::RwLock;
use std::{collections::HashMap, sync::Arc};

use doclite_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    document::Document,
    error::DocumentStoreResult,
    patch::Patch,
    selector::Selector,
};

use crate::matcher::matches;

type StoreMap = HashMap<String, Vec<Document>>;

/// Thread-safe in-memory document storage backend.
///
/// This struct implements the [`StoreBackend`] trait to provide a fully
/// functional document store that operates entirely in memory using an
/// async-aware read-write lock. Each collection holds its documents in
/// insertion order.
///
/// # Thread Safety
///
/// `InMemoryStore` is cloneable and uses an `Arc`-wrapped internal state,
/// allowing it to be safely shared across async tasks. Multiple clones of the
/// same instance share the same underlying data.
///
/// # Performance
///
/// Every operation scans the full collection (no indexing). For development
/// and test datasets this is typically acceptable; for anything larger, use
/// the SQLite backend.
///
/// # Example
///
/// ```ignore
/// use doclite_memory::InMemoryStore;
/// use doclite::{backend::StoreBackend, document::Document, selector::Selector};
/// use serde_json::json;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = InMemoryStore::new();
///
///     let doc = Document::from_value(json!({ "name": "Alice" }))?;
///     let stored = store.create_documents(vec![doc], "users").await?;
///     assert!(stored[0].id().is_some());
///
///     Ok(())
/// }
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryStore {
    /// The main storage map: collection_name -> documents in insertion order
    store: Arc<RwLock<StoreMap>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory document store.
    ///
    /// The returned store is ready for use and contains no collections or documents.
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(StoreMap::new())),
        }
    }

    /// Creates a builder for constructing an `InMemoryStore`.
    ///
    /// Currently, the builder simply creates a default store, but it can be
    /// extended in future versions to support configuration options.
    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder::default()
    }
}

#[async_trait]
impl StoreBackend for InMemoryStore {
    async fn create_documents(
        &self,
        mut documents: Vec<Document>,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Document>> {
        for document in &mut documents {
            document.ensure_id();
        }

        let mut store = self.store.write().await;
        store
            .entry(collection.to_string())
            .or_default()
            .extend(documents.iter().cloned());

        Ok(documents)
    }

    async fn read_documents(
        &self,
        selector: &Selector,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Document>> {
        let store = self.store.read().await;

        Ok(match store.get(collection) {
            Some(documents) => documents
                .iter()
                .filter(|document| matches(document, selector))
                .cloned()
                .collect(),
            None => Vec::new(),
        })
    }

    async fn update_documents(
        &self,
        selector: &Selector,
        patch: &Patch,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Document>> {
        let mut store = self.store.write().await;
        let Some(documents) = store.get_mut(collection) else {
            return Ok(Vec::new());
        };

        let mut updated = Vec::new();

        for document in documents.iter_mut() {
            if matches(document, selector) {
                *document = patch.apply(document);
                updated.push(document.clone());
            }
        }

        Ok(updated)
    }

    async fn delete_documents(
        &self,
        selector: &Selector,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Document>> {
        let mut store = self.store.write().await;
        let Some(documents) = store.get_mut(collection) else {
            return Ok(Vec::new());
        };

        let mut removed = Vec::new();

        documents.retain(|document| {
            if matches(document, selector) {
                removed.push(document.clone());
                false
            } else {
                true
            }
        });

        Ok(removed)
    }

    async fn is_empty(&self) -> DocumentStoreResult<bool> {
        Ok(self.store.read().await.is_empty())
    }
}

/// Builder for constructing [`InMemoryStore`] instances.
///
/// Currently a no-op builder, but can be extended in future versions to
/// support configuration options like capacity hints.
#[derive(Default)]
pub struct InMemoryStoreBuilder;

#[async_trait]
impl StoreBackendBuilder for InMemoryStoreBuilder {
    type Backend = InMemoryStore;

    /// Builds and returns a new [`InMemoryStore`] instance.
    ///
    /// This always succeeds and returns a freshly initialized store.
    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        Ok(InMemoryStore::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doclite_core::{
        error::DocumentStoreError,
        store::{DocumentStore, DynDocumentStore, IntoDynDocumentStore, IntoStaticDocumentStore},
    };
    use serde_json::{Value, json};
    use uuid::Uuid;

    fn doc(value: Value) -> Document {
        Document::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn create_generates_unique_ids() {
        let store = InMemoryStore::new();
        let created = store
            .create_documents(
                vec![doc(json!({ "n": 1 })), doc(json!({ "n": 2 }))],
                "tests",
            )
            .await
            .unwrap();

        let ids: Vec<&str> = created
            .iter()
            .map(|d| d.id().and_then(Value::as_str).unwrap())
            .collect();

        assert_ne!(ids[0], ids[1]);
        assert!(ids.iter().all(|id| Uuid::parse_str(id).is_ok()));
    }

    #[tokio::test]
    async fn create_preserves_explicit_ids() {
        let store = InMemoryStore::new();
        let created = store
            .create_documents(vec![doc(json!({ "id": 1 }))], "tests")
            .await
            .unwrap();

        assert_eq!(created[0].id(), Some(&json!(1)));
    }

    #[tokio::test]
    async fn read_filters_by_selector() {
        let store = InMemoryStore::new();
        store
            .create_documents(
                vec![
                    doc(json!({ "title": "post 1", "author": "jdoe" })),
                    doc(json!({ "title": "post 2", "author": "jsmith" })),
                ],
                "posts",
            )
            .await
            .unwrap();

        let all = store
            .read_documents(&Selector::new(), "posts")
            .await
            .unwrap();
        assert_eq!(all.len(), 2);

        let by_author = store
            .read_documents(&Selector::field("author", "jdoe"), "posts")
            .await
            .unwrap();
        assert_eq!(by_author.len(), 1);
        assert_eq!(by_author[0].get("title"), Some(&json!("post 1")));
    }

    #[tokio::test]
    async fn missing_collection_is_an_empty_no_op() {
        let store = InMemoryStore::new();

        assert!(store
            .read_documents(&Selector::new(), "nowhere")
            .await
            .unwrap()
            .is_empty());
        assert!(store
            .update_documents(&Selector::new(), &Patch::new().set("a", 1), "nowhere")
            .await
            .unwrap()
            .is_empty());
        assert!(store
            .delete_documents(&Selector::new(), "nowhere")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn update_overwrites_and_pushes() {
        let store = InMemoryStore::new();
        store
            .create_documents(
                vec![doc(json!({ "title": "post 1", "author": "jdoe", "tags": [1, 2] }))],
                "posts",
            )
            .await
            .unwrap();

        let updated = store
            .update_documents(
                &Selector::field("author", "jdoe"),
                &Patch::new().set("title", "x").push("tags", 3),
                "posts",
            )
            .await
            .unwrap();

        assert_eq!(updated.len(), 1);
        assert_eq!(updated[0].get("title"), Some(&json!("x")));
        assert_eq!(updated[0].get("author"), Some(&json!("jdoe")));
        assert_eq!(updated[0].get("tags"), Some(&json!([1, 2, 3])));

        // the write is visible through a subsequent read
        let reread = store
            .read_documents(&Selector::field("title", "x"), "posts")
            .await
            .unwrap();
        assert_eq!(reread, updated);
    }

    #[tokio::test]
    async fn update_of_zero_matches_writes_nothing() {
        let store = InMemoryStore::new();
        store
            .create_documents(vec![doc(json!({ "title": "post 1" }))], "posts")
            .await
            .unwrap();

        let updated = store
            .update_documents(
                &Selector::field("title", "post 9"),
                &Patch::new().set("title", "x"),
                "posts",
            )
            .await
            .unwrap();
        assert!(updated.is_empty());

        let all = store
            .read_documents(&Selector::new(), "posts")
            .await
            .unwrap();
        assert_eq!(all[0].get("title"), Some(&json!("post 1")));
    }

    #[tokio::test]
    async fn delete_removes_exactly_the_matched_set() {
        let store = InMemoryStore::new();
        store
            .create_documents(
                vec![
                    doc(json!({ "author": "jdoe" })),
                    doc(json!({ "author": "jsmith" })),
                    doc(json!({ "author": "jdoe" })),
                ],
                "posts",
            )
            .await
            .unwrap();

        let removed = store
            .delete_documents(&Selector::field("author", "jdoe"), "posts")
            .await
            .unwrap();
        assert_eq!(removed.len(), 2);

        let left = store
            .read_documents(&Selector::new(), "posts")
            .await
            .unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].get("author"), Some(&json!("jsmith")));
    }

    #[tokio::test]
    async fn empty_selector_deletes_everything() {
        let store = InMemoryStore::new();
        store
            .create_documents(
                vec![doc(json!({ "n": 1 })), doc(json!({ "n": 2 }))],
                "tests",
            )
            .await
            .unwrap();

        let removed = store
            .delete_documents(&Selector::new(), "tests")
            .await
            .unwrap();
        assert_eq!(removed.len(), 2);
        assert!(store
            .read_documents(&Selector::new(), "tests")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn emptiness_tracks_collection_creation() {
        let store = InMemoryStore::new();
        assert!(store.is_empty().await.unwrap());

        store
            .create_documents(vec![doc(json!({ "n": 1 }))], "tests")
            .await
            .unwrap();
        assert!(!store.is_empty().await.unwrap());

        // an emptied collection still exists
        store
            .delete_documents(&Selector::new(), "tests")
            .await
            .unwrap();
        assert!(!store.is_empty().await.unwrap());
    }

    #[tokio::test]
    async fn clones_share_state() {
        let store = InMemoryStore::new();
        let clone = store.clone();

        store
            .create_documents(vec![doc(json!({ "n": 1 }))], "tests")
            .await
            .unwrap();

        let seen = clone
            .read_documents(&Selector::new(), "tests")
            .await
            .unwrap();
        assert_eq!(seen.len(), 1);
    }

    #[tokio::test]
    async fn builder_produces_a_working_store() {
        let backend = InMemoryStore::builder().build().await.unwrap();
        assert!(backend.is_empty().await.unwrap());
    }

    #[tokio::test]
    async fn dyn_store_round_trips_through_downcast() {
        let store = DocumentStore::new(InMemoryStore::new());
        store
            .collection("tests")
            .create(doc(json!({ "n": 1 })))
            .await
            .unwrap();

        let dyn_store: DynDocumentStore = store.into_dyn();
        assert_eq!(
            dyn_store
                .collection("tests")
                .read(&Selector::new())
                .await
                .unwrap()
                .len(),
            1
        );

        let recovered = dyn_store
            .into_static::<InMemoryStore>()
            .expect("backend should downcast to InMemoryStore");
        assert!(!recovered.is_empty().await.unwrap());
    }

    #[tokio::test]
    async fn source_adapter_dispatches_over_memory() {
        use doclite_core::source::{FetchOperation, FetchResult, Mutation, MutationResult};

        let store = DocumentStore::new(InMemoryStore::new());
        let source = store.source("posts");

        let results = source
            .mutate(vec![
                Mutation::parse(
                    "create",
                    json!(null),
                    json!([
                        { "title": "post 1", "author": "jdoe" },
                        { "title": "post 2", "author": "jsmith" },
                    ]),
                )
                .unwrap(),
                Mutation::parse("update", json!({ "author": "jdoe" }), json!({ "title": "x" }))
                    .unwrap(),
                Mutation::parse("remove", json!({ "author": "jsmith" }), json!(null)).unwrap(),
            ])
            .await
            .unwrap();

        assert_eq!(results.len(), 3);
        assert!(matches!(&results[0], MutationResult::Created(created) if created.len() == 2));
        assert!(
            matches!(&results[1], MutationResult::Updated(Some(updated)) if updated.get("title") == Some(&json!("x")))
        );
        assert!(
            matches!(&results[2], MutationResult::Removed(Some(removed)) if removed.get("author") == Some(&json!("jsmith")))
        );

        let one = source
            .fetch(FetchOperation::Read, &Selector::field("title", "x"))
            .await
            .unwrap();
        assert!(
            matches!(one, FetchResult::Document(Some(found)) if found.get("author") == Some(&json!("jdoe")))
        );

        let none = source
            .fetch(FetchOperation::Read, &Selector::field("title", "gone"))
            .await
            .unwrap();
        assert_eq!(none, FetchResult::Document(None));

        let many = source
            .fetch(FetchOperation::ReadMany, &Selector::new())
            .await
            .unwrap();
        assert!(matches!(many, FetchResult::Documents(all) if all.len() == 1));
    }

    #[tokio::test]
    async fn unsupported_names_are_rejected_before_any_work() {
        use doclite_core::source::Mutation;

        let store = DocumentStore::new(InMemoryStore::new());

        let err = Mutation::parse("destroy", json!({}), json!({})).unwrap_err();
        assert!(matches!(err, DocumentStoreError::UnsupportedOperation(_)));

        // nothing reached the store
        assert!(store.is_empty().await.unwrap());
    }
}
