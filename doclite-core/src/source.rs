//! Request adapter mapping a generic request vocabulary onto store operations.
//!
//! A [`DocumentSource`] binds a [`DocumentStore`] to a fixed collection and
//! exposes exactly two entry points to an upstream request-routing layer:
//!
//! - [`fetch`](DocumentSource::fetch) - read requests, named by a
//!   [`FetchOperation`]
//! - [`mutate`](DocumentSource::mutate) - a batch of write requests, each a
//!   [`Mutation`], executed strictly in sequence
//!
//! The adapter is purely dispatch: it holds no state of its own and results
//! flow back unchanged apart from the single-vs-many unwrapping each operation
//! name implies.
//!
//! Operation names form a closed set. Wire names parse through
//! [`FetchOperation::from_str`] and [`Mutation::parse`]; anything outside the
//! set is rejected with
//! [`DocumentStoreError::UnsupportedOperation`](crate::error::DocumentStoreError::UnsupportedOperation)
//! before any work is performed.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

use crate::{
    backend::StoreBackend,
    document::{Document, DocumentBatch},
    error::{DocumentStoreError, DocumentStoreResult},
    patch::Patch,
    selector::Selector,
    store::DocumentStore,
};

/// A read request name accepted by [`DocumentSource::fetch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FetchOperation {
    /// Returns the first matching document, or `None` if nothing matches.
    Read,
    /// Returns the full sequence of matching documents.
    ReadMany,
}

impl FromStr for FetchOperation {
    type Err = DocumentStoreError;

    fn from_str(name: &str) -> DocumentStoreResult<Self> {
        match name {
            "read" => Ok(Self::Read),
            "readMany" => Ok(Self::ReadMany),
            other => Err(DocumentStoreError::UnsupportedOperation(other.to_string())),
        }
    }
}

/// The result of a [`DocumentSource::fetch`] call.
///
/// Serializes untagged, so a `Document` result is the bare document (or JSON
/// `null` when absent) and a `Documents` result is a JSON array.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FetchResult {
    /// The first matching document of a `read` operation, if any.
    Document(Option<Document>),
    /// All matching documents of a `readMany` operation.
    Documents(Vec<Document>),
}

/// A single write request accepted by [`DocumentSource::mutate`].
///
/// On the wire a mutation is a JSON object tagged by its `name` field, with
/// `selector` and `data` alongside as the operation requires. The set of names
/// is closed; [`Mutation::parse`] rejects anything else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "lowercase")]
pub enum Mutation {
    /// Creates one document or a sequence of documents.
    Create {
        /// The document(s) to store.
        data: DocumentBatch,
    },
    /// Applies a patch to every document matching the selector.
    Update {
        /// The conditions choosing documents to update.
        #[serde(default)]
        selector: Selector,
        /// The overwrite and array-append description.
        data: Patch,
    },
    /// Removes every document matching the selector.
    Remove {
        /// The conditions choosing documents to remove.
        #[serde(default)]
        selector: Selector,
    },
}

impl Mutation {
    /// Builds a mutation from its wire parts.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::UnsupportedOperation`] for an
    /// unrecognized `name`, or an invalid-input error if `selector`/`data` do
    /// not fit the named operation's shape. Nothing is executed on failure.
    pub fn parse(name: &str, selector: Value, data: Value) -> DocumentStoreResult<Self> {
        match name {
            "create" => Ok(Self::Create {
                data: DocumentBatch::from_value(data)?,
            }),
            "update" => Ok(Self::Update {
                selector: Selector::from_value(selector)?,
                data: Patch::from_value(data)?,
            }),
            "remove" => Ok(Self::Remove {
                selector: Selector::from_value(selector)?,
            }),
            other => Err(DocumentStoreError::UnsupportedOperation(other.to_string())),
        }
    }
}

/// The result of one mutation within a [`DocumentSource::mutate`] batch.
///
/// Serializes untagged. `Created` carries the full created sequence; `Updated`
/// and `Removed` carry the first affected document, or JSON `null` when the
/// selector matched nothing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MutationResult {
    /// The created documents, in call order.
    Created(Vec<Document>),
    /// The first updated document, if any.
    Updated(Option<Document>),
    /// The first removed document, if any.
    Removed(Option<Document>),
}

/// The request adapter: a two-method capability over one collection.
///
/// # Example
///
/// ```ignore
/// use doclite::source::{FetchOperation, Mutation};
/// use doclite::selector::Selector;
///
/// let source = store.source("posts");
/// let one = source.fetch(FetchOperation::Read, &Selector::field("author", "jdoe")).await?;
/// ```
#[derive(Debug)]
pub struct DocumentSource<B: StoreBackend> {
    store: DocumentStore<B>,
    collection: String,
}

impl<B: StoreBackend> DocumentSource<B> {
    /// Creates an adapter over a store, bound to one collection.
    pub fn new(store: DocumentStore<B>, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }

    /// Returns the name of the collection this adapter serves.
    pub fn collection_name(&self) -> &str {
        &self.collection
    }

    /// Executes a read request.
    ///
    /// `Read` returns the first document matching the selector (or `None`);
    /// `ReadMany` returns the full matching sequence.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentStoreError`](crate::error::DocumentStoreError) if the underlying read fails.
    pub async fn fetch(
        &self,
        operation: FetchOperation,
        selector: &Selector,
    ) -> DocumentStoreResult<FetchResult> {
        let collection = self.store.collection(&self.collection);

        match operation {
            FetchOperation::Read => {
                let documents = collection.read(selector).await?;

                Ok(FetchResult::Document(documents.into_iter().next()))
            }
            FetchOperation::ReadMany => Ok(FetchResult::Documents(collection.read(selector).await?)),
        }
    }

    /// Executes a batch of mutations strictly in sequence.
    ///
    /// Each mutation awaits the previous one; results come back one per input,
    /// in input order. The first failing mutation aborts the remainder of the
    /// batch, leaving earlier mutations' effects committed.
    ///
    /// # Errors
    ///
    /// Returns the first mutation failure, or a
    /// [`DocumentStoreError`](crate::error::DocumentStoreError) from the underlying store.
    pub async fn mutate(&self, mutations: Vec<Mutation>) -> DocumentStoreResult<Vec<MutationResult>> {
        let mut results = Vec::with_capacity(mutations.len());

        for mutation in mutations {
            results.push(self.apply(mutation).await?);
        }

        Ok(results)
    }

    async fn apply(&self, mutation: Mutation) -> DocumentStoreResult<MutationResult> {
        let collection = self.store.collection(&self.collection);

        match mutation {
            Mutation::Create { data } => Ok(MutationResult::Created(collection.create(data).await?)),
            Mutation::Update { selector, data } => {
                let updated = collection.update(&selector, &data).await?;

                Ok(MutationResult::Updated(updated.into_iter().next()))
            }
            Mutation::Remove { selector } => {
                let removed = collection.delete(&selector).await?;

                Ok(MutationResult::Removed(removed.into_iter().next()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fetch_operation_parses_known_names() {
        assert_eq!("read".parse::<FetchOperation>().unwrap(), FetchOperation::Read);
        assert_eq!(
            "readMany".parse::<FetchOperation>().unwrap(),
            FetchOperation::ReadMany
        );
    }

    #[test]
    fn fetch_operation_rejects_unknown_names() {
        let err = "readAll".parse::<FetchOperation>().unwrap_err();

        assert!(matches!(err, DocumentStoreError::UnsupportedOperation(_)));
        assert_eq!(err.to_string(), "Operation \"readAll\" not supported");
    }

    #[test]
    fn mutation_parses_known_names() {
        let create = Mutation::parse("create", json!(null), json!({ "title": "post 1" })).unwrap();
        assert!(matches!(create, Mutation::Create { ref data } if data.len() == 1));

        let update = Mutation::parse(
            "update",
            json!({ "author": "jdoe" }),
            json!({ "title": "x", "$push": { "tags": 3 } }),
        )
        .unwrap();
        assert_eq!(
            update,
            Mutation::Update {
                selector: Selector::field("author", "jdoe"),
                data: Patch::new().set("title", "x").push("tags", 3),
            }
        );

        let remove = Mutation::parse("remove", json!({ "id": 1 }), json!(null)).unwrap();
        assert_eq!(
            remove,
            Mutation::Remove {
                selector: Selector::field("id", 1),
            }
        );
    }

    #[test]
    fn mutation_rejects_unknown_names_before_execution() {
        assert!(matches!(
            Mutation::parse("destroy", json!({}), json!({})),
            Err(DocumentStoreError::UnsupportedOperation(_))
        ));
    }

    #[test]
    fn mutation_wire_shape_round_trip() {
        let mutation: Mutation = serde_json::from_value(json!({
            "name": "update",
            "selector": { "author": "jdoe" },
            "data": { "title": "x" },
        }))
        .unwrap();

        assert_eq!(
            mutation,
            Mutation::Update {
                selector: Selector::field("author", "jdoe"),
                data: Patch::new().set("title", "x"),
            }
        );

        let create: Mutation =
            serde_json::from_value(json!({ "name": "create", "data": { "title": "post 1" } }))
                .unwrap();
        assert!(matches!(create, Mutation::Create { ref data } if data.len() == 1));
    }

    #[test]
    fn results_serialize_to_wire_shapes() {
        let document = Document::from_value(json!({ "id": 1 })).unwrap();

        assert_eq!(
            serde_json::to_value(FetchResult::Document(Some(document.clone()))).unwrap(),
            json!({ "id": 1 })
        );
        assert_eq!(
            serde_json::to_value(FetchResult::Document(None)).unwrap(),
            json!(null)
        );
        assert_eq!(
            serde_json::to_value(MutationResult::Created(vec![document])).unwrap(),
            json!([{ "id": 1 }])
        );
        assert_eq!(
            serde_json::to_value(MutationResult::Removed(None)).unwrap(),
            json!(null)
        );
    }
}
