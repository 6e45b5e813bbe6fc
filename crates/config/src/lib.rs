//! Configuration loading with env substitution and overrides.
//!
//! Config files: `hackernews.toml`, `hackernews.yaml`, or `hackernews.json`
//! Searched in `./` then `~/.config/hackernews/`.
//!
//! Supports `${ENV_VAR}` substitution in all string values, and
//! `HACKERNEWS_*` variables override individual settings after loading.

pub mod env_subst;
pub mod error;
pub mod loader;
pub mod schema;

pub use {
    error::{Error, Result},
    loader::{apply_env_overrides, config_dir, discover_and_load, load_config},
    schema::{DatabaseConfig, GraphqlConfig, HackerNewsConfig, ServerConfig},
};
