//! GraphQL subscription resolvers.
//!
//! Each open subscription owns one queue on the event bus. The queue is
//! released when the client goes away and the stream is dropped.

use {
    async_graphql::{Context, Result, Subscription},
    tokio_stream::Stream,
    tracing::debug,
};

use crate::{
    context::gql_context,
    types::{LinkSubscriptionFilter, LinkSubscriptionPayload},
};

#[derive(Default)]
pub struct SubscriptionRoot;

#[Subscription(name = "Subscription")]
impl SubscriptionRoot {
    /// Live feed of link mutations.
    #[graphql(name = "Link")]
    async fn link(
        &self,
        ctx: &Context<'_>,
        filter: Option<LinkSubscriptionFilter>,
    ) -> Result<impl Stream<Item = LinkSubscriptionPayload>> {
        let mut events = gql_context(ctx)?.events.subscribe();
        debug!(?filter, "link subscription opened");
        Ok(async_stream::stream! {
            while let Some(event) = events.recv().await {
                if filter.as_ref().is_none_or(|f| f.accepts(event.mutation)) {
                    yield LinkSubscriptionPayload::from(event);
                }
            }
        })
    }
}
