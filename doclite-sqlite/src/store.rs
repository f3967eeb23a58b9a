//! SQLite storage implementation for document stores.

use async_trait::async_trait;
use futures::future::try_join_all;
use libsql::{Builder, Connection, Value as SqlValue};
use std::fmt::Debug;
use tokio::sync::OnceCell;
use tracing::debug;

use doclite_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    document::Document,
    error::{DocumentStoreError, DocumentStoreResult},
    patch::Patch,
    selector::Selector,
};

use crate::sql;

/// SQLite-backed document storage.
///
/// Each collection is one table holding one serialized document per row; no
/// per-field columns exist, so no schema is ever declared. Selector filtering
/// happens at query time through SQLite's `json_tree` decomposition of the
/// serialization. Rows are identified by their hidden SQLite rowid, so the
/// read-then-write phases of `update_documents` and `delete_documents` key
/// their writes on a stable value rather than on document content; duplicate
/// documents update independently, and a row removed between phases makes
/// that row's write a silent no-op.
///
/// # Connection
///
/// The connection opens lazily on the first operation and is memoized for the
/// lifetime of the store; concurrent first uses never open two connections.
/// The default location is [`SqliteStore::IN_MEMORY_NAME`].
///
/// # Example
///
/// ```ignore
/// use doclite_sqlite::SqliteStore;
/// use doclite::{backend::StoreBackend, document::Document};
/// use serde_json::json;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = SqliteStore::new("posts.db");
///
///     let doc = Document::from_value(json!({ "title": "post 1" }))?;
///     let stored = store.create_documents(vec![doc], "posts").await?;
///     assert!(stored[0].id().is_some());
///
///     Ok(())
/// }
/// ```
pub struct SqliteStore {
    database_file: String,
    connection: OnceCell<Connection>,
}

impl Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore")
            .field("database_file", &self.database_file)
            .finish()
    }
}

impl SqliteStore {
    /// The database location naming an in-memory database.
    pub const IN_MEMORY_NAME: &'static str = ":memory:";

    /// Creates a store over the database at the given location.
    ///
    /// No connection is opened yet; establishment is deferred to the first
    /// operation.
    pub fn new(database_file: impl Into<String>) -> Self {
        Self {
            database_file: database_file.into(),
            connection: OnceCell::new(),
        }
    }

    /// Creates a store over an in-memory database.
    pub fn in_memory() -> Self {
        Self::new(Self::IN_MEMORY_NAME)
    }

    /// Creates a builder for constructing a `SqliteStore`.
    pub fn builder() -> SqliteStoreBuilder {
        SqliteStoreBuilder::default()
    }

    /// Returns the shared connection, opening it on first use.
    async fn connection(&self) -> DocumentStoreResult<&Connection> {
        self.connection
            .get_or_try_init(|| async {
                debug!(database_file = %self.database_file, "opening database connection");

                let database = Builder::new_local(&self.database_file)
                    .build()
                    .await
                    .map_err(|e| DocumentStoreError::Initialization(e.to_string()))?;

                database
                    .connect()
                    .map_err(|e| DocumentStoreError::Initialization(e.to_string()))
            })
            .await
    }

    /// Probes the catalog for the collection's table, with the name bound as
    /// an ordinary parameter.
    async fn collection_exists(
        &self,
        connection: &Connection,
        collection: &str,
    ) -> DocumentStoreResult<bool> {
        let mut rows = connection
            .query(
                sql::TABLE_EXISTS,
                vec![SqlValue::Text(collection.to_string())],
            )
            .await
            .map_err(|e| DocumentStoreError::Backend(e.to_string()))?;

        match rows
            .next()
            .await
            .map_err(|e| DocumentStoreError::Backend(e.to_string()))?
        {
            Some(row) => Ok(row
                .get::<i64>(0)
                .map_err(|e| DocumentStoreError::Backend(e.to_string()))?
                > 0),
            None => Ok(false),
        }
    }

    /// Reads the rowid and document of every row matching the selector.
    ///
    /// A collection with no table yet yields an empty result rather than a
    /// statement error.
    async fn read_rows(
        &self,
        selector: &Selector,
        collection: &str,
    ) -> DocumentStoreResult<Vec<(i64, Document)>> {
        let connection = self.connection().await?;

        if !self.collection_exists(connection, collection).await? {
            return Ok(Vec::new());
        }

        let (statement, params) = sql::select_rows(collection, selector)?;
        debug!(collection, %statement, "querying documents");

        let mut rows = connection
            .query(&statement, params)
            .await
            .map_err(|e| DocumentStoreError::Backend(e.to_string()))?;

        let mut matched = Vec::new();

        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DocumentStoreError::Backend(e.to_string()))?
        {
            let rowid = row
                .get::<i64>(0)
                .map_err(|e| DocumentStoreError::Backend(e.to_string()))?;
            let store = row
                .get::<String>(1)
                .map_err(|e| DocumentStoreError::Backend(e.to_string()))?;

            matched.push((rowid, Document::from_text(&store)?));
        }

        Ok(matched)
    }
}

#[async_trait]
impl StoreBackend for SqliteStore {
    async fn create_documents(
        &self,
        mut documents: Vec<Document>,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Document>> {
        let connection = self.connection().await?;

        for document in &mut documents {
            document.ensure_id();
        }

        debug!(collection, "creating collection table if absent");
        connection
            .execute(&sql::create_table(collection), ())
            .await
            .map_err(|e| DocumentStoreError::Backend(e.to_string()))?;

        let statement = sql::insert_document(collection);
        let inserts = documents
            .iter()
            .map(Document::to_text)
            .collect::<DocumentStoreResult<Vec<_>>>()?
            .into_iter()
            .map(|store| {
                let statement = statement.clone();

                async move {
                    connection
                        .execute(&statement, vec![SqlValue::Text(store)])
                        .await
                        .map_err(|e| DocumentStoreError::Backend(e.to_string()))?;

                    Ok::<_, DocumentStoreError>(())
                }
            });

        debug!(collection, count = documents.len(), "inserting documents");
        try_join_all(inserts).await?;

        Ok(documents)
    }

    async fn read_documents(
        &self,
        selector: &Selector,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Document>> {
        Ok(self
            .read_rows(selector, collection)
            .await?
            .into_iter()
            .map(|(_, document)| document)
            .collect())
    }

    async fn update_documents(
        &self,
        selector: &Selector,
        patch: &Patch,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Document>> {
        let matched = self.read_rows(selector, collection).await?;

        if matched.is_empty() {
            return Ok(Vec::new());
        }

        let connection = self.connection().await?;
        let statement = sql::overwrite_row(collection);
        let mut updated = Vec::with_capacity(matched.len());

        debug!(collection, count = matched.len(), "overwriting documents");

        for (rowid, document) in matched {
            let patched = patch.apply(&document);

            connection
                .execute(
                    &statement,
                    vec![SqlValue::Text(patched.to_text()?), SqlValue::Integer(rowid)],
                )
                .await
                .map_err(|e| DocumentStoreError::Backend(e.to_string()))?;

            updated.push(patched);
        }

        Ok(updated)
    }

    async fn delete_documents(
        &self,
        selector: &Selector,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Document>> {
        let matched = self.read_rows(selector, collection).await?;

        if matched.is_empty() {
            return Ok(Vec::new());
        }

        let connection = self.connection().await?;
        let statement = sql::delete_row(collection);
        let mut removed = Vec::with_capacity(matched.len());

        debug!(collection, count = matched.len(), "deleting documents");

        for (rowid, document) in matched {
            connection
                .execute(&statement, vec![SqlValue::Integer(rowid)])
                .await
                .map_err(|e| DocumentStoreError::Backend(e.to_string()))?;

            removed.push(document);
        }

        Ok(removed)
    }

    async fn is_empty(&self) -> DocumentStoreResult<bool> {
        let connection = self.connection().await?;

        let mut rows = connection
            .query(sql::COUNT_TABLES, ())
            .await
            .map_err(|e| DocumentStoreError::Backend(e.to_string()))?;

        match rows
            .next()
            .await
            .map_err(|e| DocumentStoreError::Backend(e.to_string()))?
        {
            Some(row) => Ok(row
                .get::<i64>(0)
                .map_err(|e| DocumentStoreError::Backend(e.to_string()))?
                == 0),
            None => Ok(true),
        }
    }
}

/// Builder for constructing [`SqliteStore`] instances.
///
/// The builder only configures the store; the connection is established
/// lazily on the first operation, so `build` cannot fail on an unreachable
/// database file.
pub struct SqliteStoreBuilder {
    database_file: String,
}

impl Default for SqliteStoreBuilder {
    fn default() -> Self {
        Self {
            database_file: SqliteStore::IN_MEMORY_NAME.to_string(),
        }
    }
}

impl SqliteStoreBuilder {
    /// Creates a builder for the database at the given location.
    pub fn new(database_file: impl Into<String>) -> Self {
        Self {
            database_file: database_file.into(),
        }
    }

    /// Sets the database location.
    pub fn database_file(mut self, database_file: impl Into<String>) -> Self {
        self.database_file = database_file.into();
        self
    }
}

#[async_trait]
impl StoreBackendBuilder for SqliteStoreBuilder {
    type Backend = SqliteStore;

    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        Ok(SqliteStore::new(self.database_file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use tempfile::tempdir;
    use uuid::Uuid;

    fn doc(value: Value) -> Document {
        Document::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn create_generates_unique_ids() {
        let store = SqliteStore::in_memory();
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
        let store = SqliteStore::in_memory();
        let created = store
            .create_documents(vec![doc(json!({ "id": 1, "n": 1 }))], "tests")
            .await
            .unwrap();
        assert_eq!(created[0].id(), Some(&json!(1)));

        let read = store
            .read_documents(&Selector::field("id", 1), "tests")
            .await
            .unwrap();
        assert_eq!(read.len(), 1);
        assert_eq!(read[0].id(), Some(&json!(1)));
    }

    #[tokio::test]
    async fn read_returns_the_exact_stored_set() {
        let store = SqliteStore::in_memory();
        let created = store
            .create_documents(
                vec![
                    doc(json!({ "title": "post 1", "author": "jdoe" })),
                    doc(json!({ "title": "post 2", "author": "jsmith" })),
                ],
                "posts",
            )
            .await
            .unwrap();

        let mut all = store
            .read_documents(&Selector::new(), "posts")
            .await
            .unwrap();
        assert_eq!(all.len(), 2);

        // order is unspecified, compare as sets
        for document in &created {
            let position = all.iter().position(|d| d == document).unwrap();
            all.remove(position);
        }
        assert!(all.is_empty());
    }

    #[tokio::test]
    async fn selectors_are_conjunctive() {
        let store = SqliteStore::in_memory();
        store
            .create_documents(
                vec![
                    doc(json!({ "title": "post 1", "author": "jdoe" })),
                    doc(json!({ "title": "post 2", "author": "jdoe" })),
                    doc(json!({ "title": "post 1", "author": "jsmith" })),
                ],
                "posts",
            )
            .await
            .unwrap();

        let matched = store
            .read_documents(
                &Selector::field("author", "jdoe").and("title", "post 1"),
                "posts",
            )
            .await
            .unwrap();

        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].get("title"), Some(&json!("post 1")));
        assert_eq!(matched[0].get("author"), Some(&json!("jdoe")));
    }

    #[tokio::test]
    async fn selectors_match_nested_and_container_values() {
        let store = SqliteStore::in_memory();
        store
            .create_documents(
                vec![doc(json!({
                    "meta": { "flags": { "draft": true } },
                    "tags": [1, 2],
                }))],
                "posts",
            )
            .await
            .unwrap();

        // a key matches at any nesting depth
        let by_nested = store
            .read_documents(&Selector::field("draft", true), "posts")
            .await
            .unwrap();
        assert_eq!(by_nested.len(), 1);

        // container values match by their whole JSON rendering
        let by_array = store
            .read_documents(&Selector::field("tags", json!([1, 2])), "posts")
            .await
            .unwrap();
        assert_eq!(by_array.len(), 1);

        let no_match = store
            .read_documents(&Selector::field("tags", json!([2, 1])), "posts")
            .await
            .unwrap();
        assert!(no_match.is_empty());
    }

    #[tokio::test]
    async fn null_selector_values_match_stored_nulls() {
        let store = SqliteStore::in_memory();
        store
            .create_documents(
                vec![
                    doc(json!({ "editor": null })),
                    doc(json!({ "editor": "jdoe" })),
                ],
                "posts",
            )
            .await
            .unwrap();

        let matched = store
            .read_documents(&Selector::field("editor", json!(null)), "posts")
            .await
            .unwrap();
        assert_eq!(matched.len(), 1);
    }

    #[tokio::test]
    async fn missing_collection_is_an_empty_no_op() {
        let store = SqliteStore::in_memory();

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
    async fn update_overwrites_mentioned_fields_only() {
        let store = SqliteStore::in_memory();
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

        let updated = store
            .update_documents(
                &Selector::field("author", "jdoe"),
                &Patch::new().set("title", "x"),
                "posts",
            )
            .await
            .unwrap();
        assert_eq!(updated.len(), 1);

        let reread = store
            .read_documents(&Selector::field("title", "x"), "posts")
            .await
            .unwrap();
        assert_eq!(reread.len(), 1);
        assert_eq!(reread[0].get("author"), Some(&json!("jdoe")));

        // the other document is untouched
        let other = store
            .read_documents(&Selector::field("author", "jsmith"), "posts")
            .await
            .unwrap();
        assert_eq!(other[0].get("title"), Some(&json!("post 2")));
    }

    #[tokio::test]
    async fn push_appends_and_wraps() {
        let store = SqliteStore::in_memory();
        store
            .create_documents(
                vec![doc(json!({ "id": 1, "tags": [1, 2] })), doc(json!({ "id": 2 }))],
                "posts",
            )
            .await
            .unwrap();

        store
            .update_documents(
                &Selector::field("id", 1),
                &Patch::new().push("tags", 3),
                "posts",
            )
            .await
            .unwrap();
        store
            .update_documents(
                &Selector::field("id", 2),
                &Patch::new().push("tags", 3),
                "posts",
            )
            .await
            .unwrap();

        let appended = store
            .read_documents(&Selector::field("id", 1), "posts")
            .await
            .unwrap();
        assert_eq!(appended[0].get("tags"), Some(&json!([1, 2, 3])));

        let wrapped = store
            .read_documents(&Selector::field("id", 2), "posts")
            .await
            .unwrap();
        assert_eq!(wrapped[0].get("tags"), Some(&json!([3])));
    }

    #[tokio::test]
    async fn duplicate_documents_update_independently() {
        let store = SqliteStore::in_memory();
        store
            .create_documents(
                vec![doc(json!({ "id": 7, "n": 1 })), doc(json!({ "id": 7, "n": 1 }))],
                "dupes",
            )
            .await
            .unwrap();

        let updated = store
            .update_documents(
                &Selector::field("id", 7),
                &Patch::new().push("seen", true),
                "dupes",
            )
            .await
            .unwrap();
        assert_eq!(updated.len(), 2);

        let reread = store
            .read_documents(&Selector::field("id", 7), "dupes")
            .await
            .unwrap();
        assert_eq!(reread.len(), 2);
        assert!(reread
            .iter()
            .all(|d| d.get("seen") == Some(&json!([true]))));
    }

    #[tokio::test]
    async fn delete_removes_exactly_the_matched_set() {
        let store = SqliteStore::in_memory();
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
    async fn hostile_collection_names_are_isolated() {
        let store = SqliteStore::in_memory();

        store
            .create_documents(vec![doc(json!({ "n": 1 }))], "tests")
            .await
            .unwrap();
        store
            .create_documents(vec![doc(json!({ "n": 2 }))], "\"; DROP TABLE tests;")
            .await
            .unwrap();

        // both collections exist and stay separate
        let plain = store
            .read_documents(&Selector::new(), "tests")
            .await
            .unwrap();
        assert_eq!(plain.len(), 1);
        assert_eq!(plain[0].get("n"), Some(&json!(1)));

        let hostile = store
            .read_documents(&Selector::new(), "\"; DROP TABLE tests;")
            .await
            .unwrap();
        assert_eq!(hostile.len(), 1);
        assert_eq!(hostile[0].get("n"), Some(&json!(2)));

        store
            .delete_documents(&Selector::new(), "\"; DROP TABLE tests;")
            .await
            .unwrap();
        assert_eq!(
            store
                .read_documents(&Selector::new(), "tests")
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn emptiness_tracks_table_creation() {
        let store = SqliteStore::in_memory();
        assert!(store.is_empty().await.unwrap());

        store
            .create_documents(vec![doc(json!({ "n": 1 }))], "tests")
            .await
            .unwrap();
        assert!(!store.is_empty().await.unwrap());

        // deleting every document leaves the table behind
        store
            .delete_documents(&Selector::new(), "tests")
            .await
            .unwrap();
        assert!(!store.is_empty().await.unwrap());
    }

    #[tokio::test]
    async fn anonymous_disk_files_track_emptiness() {
        // an empty location opens a throwaway on-disk database
        let store = SqliteStore::new("");
        assert!(store.is_empty().await.unwrap());

        store
            .create_documents(vec![doc(json!({ "n": 1 }))], "tests")
            .await
            .unwrap();
        assert!(!store.is_empty().await.unwrap());
    }

    #[tokio::test]
    async fn documents_persist_in_a_database_file() {
        let dir = tempdir().unwrap();
        let database_file = dir.path().join("store.db");
        let path = database_file.to_str().unwrap().to_string();

        {
            let store = SqliteStore::builder()
                .database_file(&path)
                .build()
                .await
                .unwrap();
            store
                .create_documents(vec![doc(json!({ "title": "post 1" }))], "posts")
                .await
                .unwrap();
        }

        let reopened = SqliteStore::new(&path);
        let read = reopened
            .read_documents(&Selector::field("title", "post 1"), "posts")
            .await
            .unwrap();
        assert_eq!(read.len(), 1);
    }
}
