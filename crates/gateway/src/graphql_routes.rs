//! GraphQL HTTP handlers for the gateway.
//!
//! GraphiQL on GET `/graphql` and `/graphiql`, query/mutation execution on
//! POST `/graphql`, and WebSocket subscriptions on GET `/graphql` and
//! `/subscriptions`.

use {
    async_graphql::{Data, http::GraphiQLSource},
    async_graphql_axum::{GraphQLProtocol, GraphQLRequest, GraphQLResponse, GraphQLWebSocket},
    axum::{
        Json,
        extract::{FromRequestParts, Request, State, WebSocketUpgrade},
        http::{HeaderMap, StatusCode, header, request::Parts},
        response::{Html, IntoResponse, Response},
    },
    hackernews_graphql::Viewer,
    tracing::debug,
};

use crate::{
    auth::{RequestViewer, init_payload_authorization, resolve_viewer},
    server::AppState,
};

/// Handle GET `/graphql`:
///
/// - Standard HTTP GET: returns GraphiQL.
/// - WebSocket upgrade GET: upgrades to GraphQL subscriptions.
pub async fn graphql_get_handler(State(state): State<AppState>, req: Request) -> Response {
    let (mut parts, _body) = req.into_parts();

    if is_websocket_upgrade_request(&parts.headers) {
        return upgrade(&state, &mut parts).await;
    }

    graphiql_response(&state)
}

/// Handle GET `/subscriptions`, which only speaks WebSocket.
pub async fn subscriptions_handler(State(state): State<AppState>, req: Request) -> Response {
    let (mut parts, _body) = req.into_parts();
    upgrade(&state, &mut parts).await
}

/// Handle GET `/graphiql`.
pub async fn graphiql_handler(State(state): State<AppState>) -> Response {
    graphiql_response(&state)
}

/// Handle GraphQL queries and mutations.
pub async fn graphql_handler(
    State(state): State<AppState>,
    RequestViewer(viewer): RequestViewer,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let request = req.into_inner().data(viewer);
    state.gateway.schema.execute(request).await.into()
}

async fn upgrade(state: &AppState, parts: &mut Parts) -> Response {
    let protocol = match GraphQLProtocol::from_request_parts(parts, &()).await {
        Ok(protocol) => protocol,
        Err(status) => return status.into_response(),
    };

    let ws = match WebSocketUpgrade::from_request_parts(parts, &()).await {
        Ok(ws) => ws,
        Err(rejection) => return rejection.into_response(),
    };

    let authorization = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    let viewer = resolve_viewer(&state.gateway.db, authorization).await;

    graphql_ws_response(state, protocol, ws, viewer)
}

/// Upgrade to a GraphQL WebSocket session.
///
/// The viewer from the upgrade request applies unless the client sends its
/// own `Authorization` in the `connection_init` payload.
fn graphql_ws_response(
    state: &AppState,
    protocol: GraphQLProtocol,
    ws: WebSocketUpgrade,
    viewer: Viewer,
) -> Response {
    let schema = state.gateway.schema.clone();
    let db = state.gateway.db.clone();
    ws.protocols(["graphql-transport-ws", "graphql-ws"])
        .on_upgrade(move |socket| {
            let resp = GraphQLWebSocket::new(socket, schema, protocol).on_connection_init(
                move |payload| async move {
                    let viewer = match init_payload_authorization(&payload) {
                        Some(authorization) => resolve_viewer(&db, Some(authorization)).await,
                        None => viewer,
                    };
                    debug!(
                        authenticated = viewer.user().is_some(),
                        "graphql websocket connection initialised"
                    );
                    let mut data = Data::default();
                    data.insert(viewer);
                    Ok(data)
                },
            );
            async move {
                resp.serve().await;
            }
        })
        .into_response()
}

fn graphiql_response(state: &AppState) -> Response {
    if !state.gateway.graphiql {
        return (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "graphiql is disabled" })),
        )
            .into_response();
    }

    Html(
        GraphiQLSource::build()
            .endpoint("/graphql")
            .subscription_endpoint("/subscriptions")
            .finish(),
    )
    .into_response()
}

fn is_websocket_upgrade_request(headers: &HeaderMap) -> bool {
    // Some clients omit `Connection: Upgrade`, so Sec-WebSocket-Key alone
    // also counts.
    let has_upgrade_header = headers
        .get(header::UPGRADE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| {
            v.split(',')
                .any(|t| t.trim().eq_ignore_ascii_case("websocket"))
        });

    has_upgrade_header || headers.contains_key(header::SEC_WEBSOCKET_KEY)
}

#[cfg(test)]
mod tests {
    use {super::*, axum::http::HeaderValue};

    #[test]
    fn detects_websocket_upgrades() {
        let mut headers = HeaderMap::new();
        assert!(!is_websocket_upgrade_request(&headers));

        headers.insert(header::UPGRADE, HeaderValue::from_static("h2c, WebSocket"));
        assert!(is_websocket_upgrade_request(&headers));

        let mut headers = HeaderMap::new();
        headers.insert(
            header::SEC_WEBSOCKET_KEY,
            HeaderValue::from_static("dGhlIHNhbXBsZSBub25jZQ=="),
        );
        assert!(is_websocket_upgrade_request(&headers));
    }
}
