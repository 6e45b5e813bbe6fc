//! Viewer resolution from bearer credentials.
//!
//! A missing, malformed, or unknown token yields an anonymous viewer. Store
//! failures during the lookup are logged and also treated as anonymous.

use std::convert::Infallible;

use {
    axum::{
        extract::FromRequestParts,
        http::{header, request::Parts},
    },
    hackernews_auth::bearer_token,
    hackernews_graphql::Viewer,
    hackernews_store::Database,
    serde_json::Value,
    tracing::{debug, warn},
};

use crate::server::AppState;

/// Look up the user behind an `Authorization` header value.
pub async fn resolve_viewer(db: &Database, authorization: Option<&str>) -> Viewer {
    let Some(token) = authorization.and_then(bearer_token) else {
        return Viewer::anonymous();
    };
    match hackernews_auth::authenticate(db, token).await {
        Ok(Some(user)) => {
            debug!(user_id = %user.id, "authenticated viewer");
            Viewer(Some(user))
        },
        Ok(None) => {
            debug!("unknown bearer token");
            Viewer::anonymous()
        },
        Err(e) => {
            warn!(error = %e, "viewer lookup failed, continuing anonymously");
            Viewer::anonymous()
        },
    }
}

/// The `Authorization` entry of a WebSocket `connection_init` payload.
pub fn init_payload_authorization(payload: &Value) -> Option<&str> {
    ["Authorization", "authorization"]
        .into_iter()
        .find_map(|key| payload.get(key)?.as_str())
}

/// Axum extractor resolving the request's `Authorization` header.
/// Never rejects.
pub struct RequestViewer(pub Viewer);

impl FromRequestParts<AppState> for RequestViewer {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let authorization = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        Ok(Self(resolve_viewer(&state.gateway.db, authorization).await))
    }
}
