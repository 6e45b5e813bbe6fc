//! GraphQL mutation resolvers.
//!
//! Every successful `createLink` publishes exactly one `CREATED` event on the
//! bus. No other mutation publishes.

use {
    async_graphql::{Context, ID, Object, Result},
    chrono::Utc,
    hackernews_store::{DocumentId, NewLink, NewVote},
    tracing::debug,
};

use crate::{
    context::{gql_context, viewer},
    error::{ApiError, api_err},
    events::LinkEvent,
    types::{AuthProviderEmail, AuthProviderSignupData, Link, SigninPayload, User, Vote},
};

fn validate_url(url: &str) -> Result<(), ApiError> {
    url::Url::parse(url)
        .map(drop)
        .map_err(|_| ApiError::validation("url", "Link validation error: invalid url."))
}

#[derive(Default)]
pub struct MutationRoot;

#[Object(name = "Mutation")]
impl MutationRoot {
    /// Post a link. It is attributed to the authenticated user, or to
    /// `postedById` when the request is anonymous.
    async fn create_link(
        &self,
        ctx: &Context<'_>,
        url: String,
        description: String,
        posted_by_id: Option<ID>,
    ) -> Result<Option<Link>> {
        validate_url(&url).map_err(api_err)?;
        let c = gql_context(ctx)?;
        let posted_by_id = viewer(ctx)
            .map(|user| user.id.clone())
            .or_else(|| posted_by_id.map(|id| DocumentId::from(id.0)));

        let link = c
            .db
            .links
            .insert(&NewLink {
                url,
                description,
                date_created: Utc::now(),
                posted_by_id,
            })
            .await
            .map_err(api_err)?;
        debug!(link_id = %link.id, "created link");

        c.events.publish(LinkEvent::created(link.clone()));
        Ok(Some(Link(link)))
    }

    /// Vote for a link as the authenticated user, or anonymously.
    async fn create_vote(&self, ctx: &Context<'_>, link_id: ID) -> Result<Option<Vote>> {
        let c = gql_context(ctx)?;
        let vote = c
            .db
            .votes
            .insert(&NewVote {
                user_id: viewer(ctx).map(|user| user.id.clone()),
                link_id: DocumentId::from(link_id.0),
            })
            .await
            .map_err(api_err)?;
        debug!(vote_id = %vote.id, link_id = %vote.link_id, "created vote");
        Ok(Some(Vote(vote)))
    }

    async fn create_user(
        &self,
        ctx: &Context<'_>,
        name: String,
        auth_provider: AuthProviderSignupData,
    ) -> Result<Option<User>> {
        let Some(AuthProviderEmail { email, password }) = auth_provider.email else {
            return Err(api_err(ApiError::validation(
                "authProvider.email",
                "email credentials are required",
            )));
        };
        let c = gql_context(ctx)?;
        let user = hackernews_auth::register(&c.db, &name, Some(&email), &password)
            .await
            .map_err(api_err)?;
        Ok(Some(User(user)))
    }

    /// Exchange email and password for the user's bearer token.
    async fn signin_user(
        &self,
        ctx: &Context<'_>,
        email: Option<AuthProviderEmail>,
    ) -> Result<SigninPayload> {
        let Some(AuthProviderEmail { email, password }) = email else {
            return Err(api_err(ApiError::unauthenticated("email credentials are required")));
        };
        let c = gql_context(ctx)?;
        let signed_in = hackernews_auth::sign_in(&c.db, &email, &password)
            .await
            .map_err(api_err)?;
        Ok(SigninPayload {
            token: Some(signed_in.token),
            user: Some(User(signed_in.user)),
        })
    }
}
