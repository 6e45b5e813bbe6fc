mod config_commands;

use std::path::PathBuf;

use {
    clap::{Parser, Subcommand},
    hackernews_config::HackerNewsConfig,
    hackernews_graphql::{EventBus, build_schema},
    hackernews_store::Database,
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "hackernews", about = "Hacker News GraphQL server")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Config file to load instead of searching the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Address to bind to (overrides config value).
    #[arg(long, global = true)]
    bind: Option<String>,
    /// Port to listen on (overrides config value).
    #[arg(long, global = true)]
    port: Option<u16>,
    /// Database URL: `sqlite:<path>` or `memory` (overrides config value).
    #[arg(long, global = true)]
    database_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server (default when no subcommand is provided).
    Serve,
    /// Print the GraphQL schema in SDL.
    Schema,
    /// Configuration inspection.
    Config {
        #[command(subcommand)]
        action: config_commands::ConfigAction,
    },
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

/// Defaults, then the config file, then `HACKERNEWS_*` variables, then flags.
fn resolve_config(cli: &Cli) -> anyhow::Result<HackerNewsConfig> {
    let config = match &cli.config {
        Some(path) => hackernews_config::load_config(path)?,
        None => hackernews_config::discover_and_load(),
    };
    let mut config = hackernews_config::apply_env_overrides(config);

    if let Some(bind) = &cli.bind {
        config.server.bind.clone_from(bind);
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(url) = &cli.database_url {
        config.database.url.clone_from(url);
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    let config = resolve_config(&cli)?;

    match cli.command {
        None | Some(Commands::Serve) => {
            info!(version = env!("CARGO_PKG_VERSION"), "hackernews starting");
            hackernews_gateway::start_gateway(config).await
        },
        Some(Commands::Schema) => {
            let schema = build_schema(Database::in_memory(), EventBus::new(1));
            print!("{}", schema.sdl());
            Ok(())
        },
        Some(Commands::Config { action }) => config_commands::handle_config(action, &config),
    }
}
