//! Request context shared by every resolver.

use std::sync::Arc;

use {
    async_graphql::Context,
    hackernews_store::{Database, User},
};

use crate::events::EventBus;

/// Process-wide state injected into the schema via `Schema::build().data()`.
pub struct GqlContext {
    pub db: Database,
    pub events: EventBus,
}

/// The identity behind one request or WebSocket connection.
///
/// Resolved once by the transport layer and attached as request data. A
/// request without a `Viewer` is treated as anonymous.
#[derive(Debug, Clone, Default)]
pub struct Viewer(pub Option<User>);

impl Viewer {
    pub fn anonymous() -> Self {
        Self(None)
    }

    pub fn user(&self) -> Option<&User> {
        self.0.as_ref()
    }
}

/// Fetch the shared context from the resolver context.
pub(crate) fn gql_context<'a>(ctx: &Context<'a>) -> async_graphql::Result<&'a Arc<GqlContext>> {
    ctx.data::<Arc<GqlContext>>()
}

/// The authenticated user, if any.
pub(crate) fn viewer<'a>(ctx: &Context<'a>) -> Option<&'a User> {
    ctx.data_opt::<Viewer>().and_then(Viewer::user)
}
