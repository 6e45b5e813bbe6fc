use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HackerNewsConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub graphql: GraphqlConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to. Defaults to "127.0.0.1".
    pub bind: String,
    pub port: u16,
    /// Allow cross-origin requests from any origin.
    pub cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".into(),
            port: 4000,
            cors: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// A `sqlite:` URL, or `memory` for a store that is lost on exit.
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:hackernews.db?mode=rwc".into(),
            max_connections: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphqlConfig {
    /// Serve the GraphiQL IDE on GET `/graphql` and `/graphiql`.
    pub graphiql: bool,
    pub depth_limit: Option<usize>,
    pub complexity_limit: Option<usize>,
    /// Events buffered per subscriber before it starts skipping.
    pub event_capacity: usize,
}

impl Default for GraphqlConfig {
    fn default() -> Self {
        Self {
            graphiql: true,
            depth_limit: None,
            complexity_limit: None,
            event_capacity: 256,
        }
    }
}
