use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{Error, Result, env_subst::substitute_env, schema::HackerNewsConfig};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &[
    "hackernews.toml",
    "hackernews.yaml",
    "hackernews.yml",
    "hackernews.json",
];

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> Result<HackerNewsConfig> {
    let raw = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&substitute_env(&raw), path)
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./hackernews.{toml,yaml,yml,json}`
/// 2. `~/.config/hackernews/hackernews.{toml,yaml,yml,json}`
///
/// Returns the defaults if no file is found or the file fails to parse.
pub fn discover_and_load() -> HackerNewsConfig {
    let Some(path) = find_config_file() else {
        debug!("no config file found, using defaults");
        return HackerNewsConfig::default();
    };
    debug!(path = %path.display(), "loading config");
    load_config(&path).unwrap_or_else(|e| {
        warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
        HackerNewsConfig::default()
    })
}

/// Returns the user-global config directory (`~/.config/hackernews/`).
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "hackernews").map(|d| d.config_dir().to_path_buf())
}

fn find_config_file() -> Option<PathBuf> {
    let local = CONFIG_FILENAMES.iter().map(PathBuf::from);
    let global = config_dir()
        .into_iter()
        .flat_map(|dir| CONFIG_FILENAMES.iter().map(move |name| dir.join(name)));
    local.chain(global).find(|p| p.exists())
}

fn parse_config(raw: &str, path: &Path) -> Result<HackerNewsConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");
    match ext {
        "toml" => Ok(toml::from_str(raw)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        _ => Err(Error::UnsupportedFormat {
            extension: ext.to_string(),
        }),
    }
}

/// Apply `HACKERNEWS_BIND`, `HACKERNEWS_PORT` and `HACKERNEWS_DATABASE_URL`.
pub fn apply_env_overrides(config: HackerNewsConfig) -> HackerNewsConfig {
    apply_overrides_with(config, |name| std::env::var(name).ok())
}

fn apply_overrides_with(
    mut config: HackerNewsConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> HackerNewsConfig {
    if let Some(bind) = lookup("HACKERNEWS_BIND") {
        config.server.bind = bind;
    }
    if let Some(port) = lookup("HACKERNEWS_PORT") {
        match port.parse() {
            Ok(port) => config.server.port = port,
            Err(_) => warn!(value = %port, "ignoring invalid HACKERNEWS_PORT"),
        }
    }
    if let Some(url) = lookup("HACKERNEWS_DATABASE_URL") {
        config.database.url = url;
    }
    config
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, std::io::Write};

    fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_toml_with_partial_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "hackernews.toml",
            "[server]\nport = 9000\n\n[graphql]\ndepth_limit = 8\n",
        );
        let config = load_config(&path).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.bind, "127.0.0.1");
        assert_eq!(config.graphql.depth_limit, Some(8));
        assert!(config.graphql.graphiql);
        assert_eq!(config.database, Default::default());
    }

    #[test]
    fn loads_yaml_and_json() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = write_file(&dir, "hackernews.yaml", "database:\n  url: memory\n");
        assert_eq!(load_config(&yaml).unwrap().database.url, "memory");

        let json = write_file(&dir, "hackernews.json", r#"{"server": {"cors": false}}"#);
        assert!(!load_config(&json).unwrap().server.cors);
    }

    #[test]
    fn rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "hackernews.ini", "port=1");
        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat { ref extension } if extension == "ini"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn env_overrides_win() {
        let lookup = |name: &str| match name {
            "HACKERNEWS_BIND" => Some("0.0.0.0".to_string()),
            "HACKERNEWS_PORT" => Some("8081".to_string()),
            "HACKERNEWS_DATABASE_URL" => Some("memory".to_string()),
            _ => None,
        };
        let config = apply_overrides_with(HackerNewsConfig::default(), lookup);
        assert_eq!(config.server.bind, "0.0.0.0");
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.database.url, "memory");
    }

    #[test]
    fn invalid_port_override_is_ignored() {
        let lookup = |name: &str| (name == "HACKERNEWS_PORT").then(|| "http".to_string());
        let config = apply_overrides_with(HackerNewsConfig::default(), lookup);
        assert_eq!(config.server.port, 4000);
    }
}
