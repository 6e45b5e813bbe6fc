//! Per-operation batched user lookups.
//!
//! [`RequestLoaders`] is a schema extension: every operation, whether an HTTP
//! query, a mutation, or a subscription opened over WebSocket, gets a fresh
//! [`UserDataLoader`] in its request data. Concurrent `load_one` calls within
//! that operation collapse into a single store query, and nothing cached
//! survives into the next operation.

use std::{collections::HashMap, sync::Arc};

use {
    async_graphql::{
        Request, ServerResult,
        dataloader::{DataLoader, HashMapCache, Loader},
        extensions::{Extension, ExtensionContext, ExtensionFactory, NextPrepareRequest},
    },
    hackernews_store::{Collection, DocumentId, User},
    tracing::debug,
};

/// Batches `User` lookups by identifier.
pub struct UserLoader {
    users: Collection<User>,
}

impl UserLoader {
    pub fn new(users: Collection<User>) -> Self {
        Self { users }
    }
}

impl Loader<DocumentId> for UserLoader {
    type Value = User;
    type Error = Arc<hackernews_store::Error>;

    async fn load(&self, keys: &[DocumentId]) -> Result<HashMap<DocumentId, User>, Self::Error> {
        debug!(keys = keys.len(), "batch loading users");
        let users = self.users.find_by_ids(keys).await.map_err(Arc::new)?;
        Ok(users.into_iter().map(|user| (user.id.clone(), user)).collect())
    }
}

pub type UserDataLoader = DataLoader<UserLoader, HashMapCache>;

pub fn user_data_loader(users: Collection<User>) -> UserDataLoader {
    DataLoader::with_cache(UserLoader::new(users), tokio::spawn, HashMapCache::default())
}

/// Installs a fresh [`UserDataLoader`] into each operation.
pub struct RequestLoaders {
    users: Collection<User>,
}

impl RequestLoaders {
    pub fn new(users: Collection<User>) -> Self {
        Self { users }
    }
}

impl ExtensionFactory for RequestLoaders {
    fn create(&self) -> Arc<dyn Extension> {
        Arc::new(RequestLoadersExtension {
            users: self.users.clone(),
        })
    }
}

struct RequestLoadersExtension {
    users: Collection<User>,
}

#[async_trait::async_trait]
impl Extension for RequestLoadersExtension {
    async fn prepare_request(
        &self,
        ctx: &ExtensionContext<'_>,
        request: Request,
        next: NextPrepareRequest<'_>,
    ) -> ServerResult<Request> {
        let request = request.data(user_data_loader(self.users.clone()));
        next.run(ctx, request).await
    }
}
