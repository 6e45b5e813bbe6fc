//! GraphQL API for the Hacker News backend.
//!
//! Defines the schema (links, users, votes), the resolvers that map fields
//! onto store collections, the per-operation user loader, and the in-process
//! event bus behind the `Link` subscription.
//!
//! The gateway crate is responsible for building the HTTP handlers and wiring
//! them into the router. This crate only defines the schema, types, and resolvers.

pub mod context;
pub mod error;
pub mod events;
pub mod loader;
pub mod mutations;
pub mod queries;
pub mod scalars;
pub mod schema;
pub mod subscriptions;
pub mod types;

pub use {
    context::{GqlContext, Viewer},
    error::ApiError,
    events::{EventBus, LinkEvent, LinkEvents, MutationType},
    schema::{HackerNewsSchema, build_schema, schema_builder},
};
