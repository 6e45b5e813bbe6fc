use std::{net::SocketAddr, sync::Arc};

use {
    anyhow::Context,
    axum::{
        Router,
        extract::State,
        response::{IntoResponse, Json},
        routing::get,
    },
    hackernews_config::HackerNewsConfig,
    hackernews_store::Database,
    tower_http::{
        cors::{Any, CorsLayer},
        trace::TraceLayer,
    },
    tracing::info,
};

use crate::{
    graphql_routes::{graphiql_handler, graphql_get_handler, graphql_handler, subscriptions_handler},
    state::GatewayState,
};

// ── Shared app state ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<GatewayState>,
}

// ── Server startup ───────────────────────────────────────────────────────────

/// Build the gateway router (shared between production startup and tests).
pub fn build_app(state: Arc<GatewayState>, cors: bool) -> Router {
    let router = Router::new()
        .route("/health", get(health_handler))
        .route("/graphql", get(graphql_get_handler).post(graphql_handler))
        .route("/subscriptions", get(subscriptions_handler))
        .route("/graphiql", get(graphiql_handler))
        .with_state(AppState { gateway: state });

    let router = if cors {
        router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        router
    };

    router.layer(TraceLayer::new_for_http())
}

/// Open the database, serve until Ctrl-C or SIGTERM, then close the event
/// bus so open subscriptions end.
pub async fn start_gateway(config: HackerNewsConfig) -> anyhow::Result<()> {
    let db = Database::open(&config.database.url, config.database.max_connections)
        .await
        .with_context(|| format!("failed to open database {}", config.database.url))?;
    let state = Arc::new(GatewayState::new(db, &config.graphql));
    let events = state.events.clone();
    let app = build_app(state, config.server.cors);

    let addr: SocketAddr = format!("{}:{}", config.server.bind, config.server.port)
        .parse()
        .with_context(|| format!("invalid bind address {}", config.server.bind))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(%addr, graphiql = config.graphql.graphiql, "hackernews gateway listening");
    info!("graphql endpoint: http://{addr}/graphql");
    info!("subscriptions endpoint: ws://{addr}/subscriptions");

    let closing = events.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            info!("shutting down");
            closing.close();
        })
        .await?;

    info!(open_subscriptions = events.receiver_count(), "gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": state.gateway.version,
        "subscriptions": state.gateway.events.receiver_count(),
    }))
}
