//! GraphQL query resolvers.

use {
    async_graphql::{Context, Object, Result},
    hackernews_store::{Filter, Page},
    tracing::debug,
};

use crate::{
    context::gql_context,
    error::api_err,
    types::{Link, LinkFilter},
};

/// Negative `skip`/`first` values clamp to zero.
pub(crate) fn page(skip: Option<i32>, first: Option<i32>) -> Page {
    let clamp = |n: i32| usize::try_from(n).unwrap_or(0);
    Page::new(skip.map_or(0, clamp), first.map(clamp))
}

#[derive(Default)]
pub struct QueryRoot;

#[Object(name = "Query")]
impl QueryRoot {
    /// Links in insertion order, optionally filtered and paginated.
    async fn all_links(
        &self,
        ctx: &Context<'_>,
        filter: Option<LinkFilter>,
        skip: Option<i32>,
        first: Option<i32>,
    ) -> Result<Vec<Link>> {
        let filter = filter.as_ref().map_or(Filter::All, LinkFilter::to_filter);
        debug!(?filter, ?skip, ?first, "allLinks");
        let links = gql_context(ctx)?
            .db
            .links
            .find(&filter, page(skip, first))
            .await
            .map_err(api_err)?;
        Ok(links.into_iter().map(Link).collect())
    }
}
