//! Document storage for links, users, votes, and sessions.
//!
//! Entities live as schema-less JSON documents in named collections. A
//! [`DocumentStore`] backend only knows how to insert a body and find bodies
//! matching a [`Filter`]; the typed [`Collection`] handles on top of it turn
//! raw documents into entities through a single normalization step, so the
//! identifier an entity carries is always the storage-assigned one.

pub mod collection;
pub mod error;
pub mod filter;
pub mod store;
pub mod store_memory;
pub mod store_sqlite;
pub mod types;

use std::sync::Arc;

pub use {
    collection::{Collection, Entity, normalize},
    error::{Error, Result},
    filter::{Filter, Page},
    store::{DocumentStore, RawDocument},
    store_memory::MemoryStore,
    store_sqlite::SqliteStore,
    types::{DocumentId, Link, NewLink, NewSession, NewUser, NewVote, Session, User, Vote},
};

/// URL that selects the in-memory backend in [`Database::open`].
pub const MEMORY_URL: &str = "memory";

/// Typed handles for every collection, sharing one backend.
#[derive(Clone)]
pub struct Database {
    pub links: Collection<Link>,
    pub users: Collection<User>,
    pub votes: Collection<Vote>,
    pub sessions: Collection<Session>,
}

impl Database {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            links: Collection::new(Arc::clone(&store)),
            users: Collection::new(Arc::clone(&store)),
            votes: Collection::new(Arc::clone(&store)),
            sessions: Collection::new(store),
        }
    }

    /// A database that lives only as long as the process.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Open the backend named by `url`: [`MEMORY_URL`] or a `sqlite:` URL.
    pub async fn open(url: &str, max_connections: u32) -> Result<Self> {
        if url == MEMORY_URL {
            tracing::info!("using in-memory document store");
            return Ok(Self::in_memory());
        }
        let store = SqliteStore::connect(url, max_connections).await?;
        Ok(Self::new(Arc::new(store)))
    }
}
