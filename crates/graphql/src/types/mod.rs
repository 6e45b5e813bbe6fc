//! GraphQL output and input types.
//!
//! Output types wrap the store entities and resolve their relationships
//! lazily: `postedBy` and `Vote.user` go through the per-operation user
//! loader, vote lists and `Vote.link` query the store directly. A dangling
//! foreign key resolves to `null`.

mod inputs;

use {
    async_graphql::{Context, ID, Object, Result, SimpleObject},
    hackernews_store::{self as store, DocumentId, Filter, Page},
};

pub use inputs::{AuthProviderEmail, AuthProviderSignupData, LinkFilter, LinkSubscriptionFilter};

use crate::{
    context::gql_context,
    error::api_err,
    events::{LinkEvent, MutationType},
    loader::UserDataLoader,
    scalars::Date,
};

async fn user_by_id(ctx: &Context<'_>, id: Option<&DocumentId>) -> Result<Option<User>> {
    let Some(id) = id else {
        return Ok(None);
    };
    let loader = ctx.data::<UserDataLoader>()?;
    let user = loader.load_one(id.clone()).await.map_err(api_err)?;
    Ok(user.map(User))
}

async fn votes_where(ctx: &Context<'_>, field: &str, id: &DocumentId) -> Result<Vec<Vote>> {
    let votes = gql_context(ctx)?
        .db
        .votes
        .find(&Filter::eq(field, id.as_str()), Page::ALL)
        .await
        .map_err(api_err)?;
    Ok(votes.into_iter().map(Vote).collect())
}

// ── Link ─────────────────────────────────────────────────────────────────────

pub struct Link(pub store::Link);

#[Object]
impl Link {
    async fn id(&self) -> ID {
        ID(self.0.id.to_string())
    }

    async fn url(&self) -> &str {
        &self.0.url
    }

    async fn description(&self) -> &str {
        &self.0.description
    }

    async fn date_created(&self) -> Option<Date> {
        Some(Date(self.0.date_created))
    }

    async fn posted_by(&self, ctx: &Context<'_>) -> Result<Option<User>> {
        user_by_id(ctx, self.0.posted_by_id.as_ref()).await
    }

    async fn votes(&self, ctx: &Context<'_>) -> Result<Vec<Vote>> {
        votes_where(ctx, "linkId", &self.0.id).await
    }
}

// ── User ─────────────────────────────────────────────────────────────────────

/// A registered user. The password hash is never exposed.
pub struct User(pub store::User);

#[Object]
impl User {
    async fn id(&self) -> ID {
        ID(self.0.id.to_string())
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    async fn email(&self) -> Option<&str> {
        self.0.email.as_deref()
    }

    async fn votes(&self, ctx: &Context<'_>) -> Result<Vec<Vote>> {
        votes_where(ctx, "userId", &self.0.id).await
    }
}

// ── Vote ─────────────────────────────────────────────────────────────────────

pub struct Vote(pub store::Vote);

#[Object]
impl Vote {
    async fn id(&self) -> ID {
        ID(self.0.id.to_string())
    }

    async fn user(&self, ctx: &Context<'_>) -> Result<Option<User>> {
        user_by_id(ctx, self.0.user_id.as_ref()).await
    }

    async fn link(&self, ctx: &Context<'_>) -> Result<Option<Link>> {
        let link = gql_context(ctx)?
            .db
            .links
            .find_by_id(&self.0.link_id)
            .await
            .map_err(api_err)?;
        Ok(link.map(Link))
    }
}

// ── Payloads ─────────────────────────────────────────────────────────────────

#[derive(SimpleObject)]
pub struct SigninPayload {
    pub token: Option<String>,
    pub user: Option<User>,
}

#[derive(SimpleObject)]
pub struct LinkSubscriptionPayload {
    pub mutation: MutationType,
    pub node: Option<Link>,
}

impl From<LinkEvent> for LinkSubscriptionPayload {
    fn from(event: LinkEvent) -> Self {
        Self {
            mutation: event.mutation,
            node: Some(Link(event.node)),
        }
    }
}
