//! Typed collection handles and identity normalization.

use std::{marker::PhantomData, sync::Arc};

use {
    serde::{Serialize, de::DeserializeOwned},
    serde_json::Value,
    tracing::debug,
};

use crate::{
    Error, Result,
    filter::{Filter, Page},
    store::{DocumentStore, RawDocument},
    types::{DocumentId, Link, NewLink, NewSession, NewUser, NewVote, Session, User, Vote},
};

/// An entity type bound to the collection that stores it.
pub trait Entity: DeserializeOwned + Send + Sync + 'static {
    const COLLECTION: &'static str;

    /// Insert-time body, without an identifier.
    type New: Serialize + Send + Sync;
}

impl Entity for Link {
    const COLLECTION: &'static str = "Links";
    type New = NewLink;
}

impl Entity for User {
    const COLLECTION: &'static str = "Users";
    type New = NewUser;
}

impl Entity for Vote {
    const COLLECTION: &'static str = "Votes";
    type New = NewVote;
}

impl Entity for Session {
    const COLLECTION: &'static str = "Sessions";
    type New = NewSession;
}

/// Turn a raw document into an entity whose `id` is the storage identifier.
///
/// This is the only place documents leave the storage boundary. Any `id`
/// member already present in the body is overwritten.
pub fn normalize<T: Entity>(doc: RawDocument) -> Result<T> {
    let RawDocument { id, mut body } = doc;
    let Value::Object(map) = &mut body else {
        return Err(Error::not_an_object(T::COLLECTION));
    };
    map.insert("id".to_string(), Value::String(id.into_inner()));
    Ok(serde_json::from_value(body)?)
}

/// Typed find/insert over one named collection.
pub struct Collection<T> {
    store: Arc<dyn DocumentStore>,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _entity: PhantomData,
        }
    }
}

impl<T: Entity> Collection<T> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        T::COLLECTION
    }

    /// Persist `new` and return it as stored, identifier included.
    pub async fn insert(&self, new: &T::New) -> Result<T> {
        let body = serde_json::to_value(new)?;
        if !body.is_object() {
            return Err(Error::not_an_object(T::COLLECTION));
        }
        let id = self.store.insert(T::COLLECTION, body.clone()).await?;
        normalize(RawDocument { id, body })
    }

    /// Persist `new` unless an entity with the same `field` value exists.
    ///
    /// `field` is the stored (camelCase) member name. Returns `None` when
    /// the value is already taken.
    pub async fn insert_unique(&self, field: &str, new: &T::New) -> Result<Option<T>> {
        let body = serde_json::to_value(new)?;
        if !body.is_object() {
            return Err(Error::not_an_object(T::COLLECTION));
        }
        match self.store.insert_unique(T::COLLECTION, field, body.clone()).await? {
            Some(id) => normalize(RawDocument { id, body }).map(Some),
            None => Ok(None),
        }
    }

    pub async fn find(&self, filter: &Filter, page: Page) -> Result<Vec<T>> {
        debug!(collection = T::COLLECTION, ?filter, ?page, "find");
        self.store
            .find(T::COLLECTION, filter, page)
            .await?
            .into_iter()
            .map(normalize)
            .collect()
    }

    pub async fn find_one(&self, filter: &Filter) -> Result<Option<T>> {
        Ok(self.find(filter, Page::first(1)).await?.into_iter().next())
    }

    pub async fn find_by_id(&self, id: &DocumentId) -> Result<Option<T>> {
        self.find_one(&Filter::id(id)).await
    }

    /// Every entity whose identifier is in `ids`; unknown ids are skipped.
    pub async fn find_by_ids(&self, ids: &[DocumentId]) -> Result<Vec<T>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.find(&Filter::IdIn(ids.to_vec()), Page::ALL).await
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{Database, MemoryStore},
        chrono::Utc,
        serde_json::json,
    };

    fn new_link(description: &str) -> NewLink {
        NewLink {
            url: "https://example.com".into(),
            description: description.into(),
            date_created: Utc::now(),
            posted_by_id: None,
        }
    }

    #[tokio::test]
    async fn inserted_id_matches_refetched_id() {
        let db = Database::in_memory();
        let created = db.links.insert(&new_link("first")).await.unwrap();
        let fetched = db.links.find_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(created.id, fetched.id);
        assert_eq!(created.description, fetched.description);
    }

    #[tokio::test]
    async fn normalize_overwrites_body_id() {
        let store = Arc::new(MemoryStore::new());
        let id = store
            .insert(
                "Votes",
                json!({ "id": "stale", "linkId": "l1", "userId": null }),
            )
            .await
            .unwrap();
        let votes: Collection<Vote> = Collection::new(store);
        let vote = votes.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(vote.id, id);
        assert_ne!(vote.id.as_str(), "stale");
    }

    #[test]
    fn normalize_rejects_non_objects() {
        let err = normalize::<Vote>(RawDocument {
            id: "x".into(),
            body: json!([1, 2]),
        })
        .unwrap_err();
        assert!(matches!(err, Error::NotAnObject { ref collection } if collection == "Votes"));
    }

    #[tokio::test]
    async fn insert_unique_returns_stored_entity_once() {
        let db = Database::in_memory();
        let session = NewSession {
            token: "tok".into(),
            user_id: "u1".into(),
        };
        let stored = db.sessions.insert_unique("userId", &session).await.unwrap().unwrap();
        let refetched = db.sessions.find_by_id(&stored.id).await.unwrap().unwrap();
        assert_eq!(stored.id, refetched.id);
        assert!(db.sessions.insert_unique("userId", &session).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn find_by_ids_skips_unknown() {
        let db = Database::in_memory();
        let a = db.links.insert(&new_link("a")).await.unwrap();
        let b = db.links.insert(&new_link("b")).await.unwrap();
        let found = db
            .links
            .find_by_ids(&[b.id.clone(), "missing".into(), a.id.clone()])
            .await
            .unwrap();
        assert_eq!(found.len(), 2);
        assert!(db.links.find_by_ids(&[]).await.unwrap().is_empty());
    }
}
