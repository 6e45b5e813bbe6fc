//! Schema construction and type alias.

use std::sync::Arc;

use {
    async_graphql::{Schema, SchemaBuilder},
    hackernews_store::Database,
};

use crate::{
    context::GqlContext, events::EventBus, loader::RequestLoaders, mutations::MutationRoot,
    queries::QueryRoot, subscriptions::SubscriptionRoot,
};

/// The full Hacker News GraphQL schema type.
pub type HackerNewsSchema = Schema<QueryRoot, MutationRoot, SubscriptionRoot>;

/// Schema builder with the shared context and per-operation loaders
/// installed, for callers that add limits before `finish()`.
pub fn schema_builder(
    db: Database,
    events: EventBus,
) -> SchemaBuilder<QueryRoot, MutationRoot, SubscriptionRoot> {
    let loaders = RequestLoaders::new(db.users.clone());
    let ctx = Arc::new(GqlContext { db, events });

    Schema::build(QueryRoot, MutationRoot, SubscriptionRoot)
        .data(ctx)
        .extension(loaders)
}

pub fn build_schema(db: Database, events: EventBus) -> HackerNewsSchema {
    schema_builder(db, events).finish()
}
