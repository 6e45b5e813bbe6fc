//! In-memory document store. No persistence.

use std::{collections::HashMap, sync::Mutex};

use {async_trait::async_trait, serde_json::Value};

use crate::{
    Result,
    filter::{Filter, Page},
    store::{DocumentStore, RawDocument},
    types::DocumentId,
};

/// Collections as insertion-ordered vectors behind one lock.
#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, Vec<RawDocument>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(&self, collection: &str, body: Value) -> Result<DocumentId> {
        let id = DocumentId::generate();
        let mut collections = self.collections.lock().unwrap_or_else(|e| e.into_inner());
        collections
            .entry(collection.to_string())
            .or_default()
            .push(RawDocument {
                id: id.clone(),
                body,
            });
        Ok(id)
    }

    async fn insert_unique(
        &self,
        collection: &str,
        field: &str,
        body: Value,
    ) -> Result<Option<DocumentId>> {
        let guard = Filter::eq(field, body.get(field).cloned().unwrap_or(Value::Null));
        let mut collections = self.collections.lock().unwrap_or_else(|e| e.into_inner());
        let docs = collections.entry(collection.to_string()).or_default();
        if docs.iter().any(|d| guard.matches(d)) {
            return Ok(None);
        }
        let id = DocumentId::generate();
        docs.push(RawDocument {
            id: id.clone(),
            body,
        });
        Ok(Some(id))
    }

    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        page: Page,
    ) -> Result<Vec<RawDocument>> {
        let collections = self.collections.lock().unwrap_or_else(|e| e.into_inner());
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };
        Ok(page.apply(docs.iter().filter(|d| filter.matches(d)).cloned()))
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, serde_json::json};

    #[tokio::test]
    async fn collections_are_isolated() {
        let store = MemoryStore::new();
        store.insert("Links", json!({ "url": "a" })).await.unwrap();
        store.insert("Votes", json!({ "linkId": "x" })).await.unwrap();

        let links = store.find("Links", &Filter::All, Page::ALL).await.unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].body["url"], "a");
        assert!(
            store
                .find("Users", &Filter::All, Page::ALL)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn find_keeps_insertion_order_and_pages() {
        let store = MemoryStore::new();
        for n in 0..5 {
            store.insert("Links", json!({ "n": n })).await.unwrap();
        }
        let page = store
            .find("Links", &Filter::All, Page::new(1, Some(2)))
            .await
            .unwrap();
        let ns: Vec<_> = page.iter().map(|d| d.body["n"].clone()).collect();
        assert_eq!(ns, vec![json!(1), json!(2)]);
    }

    #[tokio::test]
    async fn find_by_returned_id() {
        let store = MemoryStore::new();
        let id = store.insert("Users", json!({ "name": "ada" })).await.unwrap();
        store.insert("Users", json!({ "name": "bob" })).await.unwrap();
        let found = store
            .find("Users", &Filter::id(&id), Page::ALL)
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, id);
        assert_eq!(found[0].body["name"], "ada");
    }

    #[tokio::test]
    async fn insert_unique_refuses_taken_values() {
        let store = MemoryStore::new();
        let first = store
            .insert_unique("Sessions", "userId", json!({ "userId": "u1", "token": "a" }))
            .await
            .unwrap();
        let second = store
            .insert_unique("Sessions", "userId", json!({ "userId": "u1", "token": "b" }))
            .await
            .unwrap();
        assert!(first.is_some());
        assert!(second.is_none());

        let sessions = store.find("Sessions", &Filter::All, Page::ALL).await.unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].body["token"], "a");
    }
}
