mod config;
pub mod database;

pub use config::{Config, StatsConfig, TimerConfig};
pub use database::{Database, StateStore};

use std::path::PathBuf;

/// Returns the directory holding the config file and database.
///
/// `BREAKBANK_DATA_DIR` wins when set. Otherwise `~/.config/breakbank[-dev]/`
/// depending on `BREAKBANK_ENV`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = match std::env::var_os("BREAKBANK_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("BREAKBANK_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("breakbank-dev")
            } else {
                base_dir.join("breakbank")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
