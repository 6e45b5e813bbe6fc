use {anyhow::Result, clap::Subcommand, hackernews_config::HackerNewsConfig};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML.
    Show,
    /// Print where the user-global config file is looked up.
    Path,
}

pub fn handle_config(action: ConfigAction, config: &HackerNewsConfig) -> Result<()> {
    match action {
        ConfigAction::Show => {
            print!("{}", toml::to_string_pretty(config)?);
        },
        ConfigAction::Path => match hackernews_config::config_dir() {
            Some(dir) => println!("{}", dir.join("hackernews.toml").display()),
            None => eprintln!("no home directory; only ./hackernews.toml is searched"),
        },
    }
    Ok(())
}
