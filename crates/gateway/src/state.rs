use {
    hackernews_config::GraphqlConfig,
    hackernews_graphql::{EventBus, HackerNewsSchema, schema_builder},
    hackernews_store::Database,
    tracing::debug,
};

/// Everything request handlers need, built once at startup.
pub struct GatewayState {
    pub db: Database,
    pub events: EventBus,
    pub schema: HackerNewsSchema,
    pub graphiql: bool,
    pub version: String,
}

impl GatewayState {
    pub fn new(db: Database, config: &GraphqlConfig) -> Self {
        let events = EventBus::new(config.event_capacity);
        let mut builder = schema_builder(db.clone(), events.clone());
        if let Some(depth) = config.depth_limit {
            debug!(depth, "limiting query depth");
            builder = builder.limit_depth(depth);
        }
        if let Some(complexity) = config.complexity_limit {
            debug!(complexity, "limiting query complexity");
            builder = builder.limit_complexity(complexity);
        }

        Self {
            db,
            events,
            schema: builder.finish(),
            graphiql: config.graphiql,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
