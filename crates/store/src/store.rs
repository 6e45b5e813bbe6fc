//! Persistence trait for document backends.

use {async_trait::async_trait, serde_json::Value};

use crate::{
    Result,
    filter::{Filter, Page},
    types::DocumentId,
};

/// A document as a backend returns it: the storage identifier kept apart
/// from the body.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDocument {
    pub id: DocumentId,
    pub body: Value,
}

/// Schema-less collection storage.
///
/// Single-document writes are atomic, including the existence check of
/// [`DocumentStore::insert_unique`]; nothing else is promised.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Persist `body` in `collection` under a freshly generated identifier.
    async fn insert(&self, collection: &str, body: Value) -> Result<DocumentId>;

    /// Persist `body` unless some document in `collection` already has the
    /// same value at `field`. Returns `None` when one does.
    async fn insert_unique(
        &self,
        collection: &str,
        field: &str,
        body: Value,
    ) -> Result<Option<DocumentId>>;

    /// Documents in `collection` matching `filter`, in insertion order,
    /// windowed by `page`.
    async fn find(&self, collection: &str, filter: &Filter, page: Page)
    -> Result<Vec<RawDocument>>;
}
