use breakbank_core::{Config, ConfigError};
use clap::Subcommand;

use crate::session::CliResult;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one value by dot-path key
    Get {
        /// Config key (e.g. "timer.work_seconds", "stats.custom_keeps_task")
        key: String,
    },
    /// Change one value; it must keep the key's type and valid timer settings
    Set {
        /// Config key
        key: String,
        /// New value
        value: String,
    },
    /// Print the whole config file
    List {
        /// Output as JSON instead of TOML
        #[arg(long)]
        json: bool,
    },
    /// Overwrite the config file with defaults
    Reset,
}

pub fn run(action: ConfigAction) -> CliResult {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            let value = config.get(&key).ok_or(ConfigError::UnknownKey(key))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            let stored = config.get(&key).unwrap_or(value);
            println!("{key} = {stored}");
        }
        ConfigAction::List { json } => {
            let config = Config::load()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                print!("{}", toml::to_string_pretty(&config)?);
            }
        }
        ConfigAction::Reset => {
            let config = Config::default();
            config.save()?;
            println!("config reset to defaults: {}", Config::path()?.display());
        }
    }
    Ok(())
}
