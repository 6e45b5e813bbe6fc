//! HTTP and WebSocket front end for the Hacker News GraphQL API.
//!
//! Serves queries and mutations on POST `/graphql`, subscriptions over
//! WebSocket on `/graphql` and `/subscriptions`, the GraphiQL IDE, and a
//! health check. Bearer tokens are resolved into a viewer once per request
//! or connection.

pub mod auth;
pub mod graphql_routes;
pub mod server;
pub mod state;

pub use {
    server::{build_app, start_gateway},
    state::GatewayState,
};
