mod init;
mod schema;

pub use init::write_default_config;
pub use schema::{Config, DataConfig, TrendConfig};

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Get the config directory path (~/.config/okr-pulse/)
pub fn get_config_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Could not determine home directory");
    home.join(".config").join("okr-pulse")
}

/// Get the default config file path (~/.config/okr-pulse/config.yaml)
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.yaml")
}

/// Get the snapshot history directory, honoring a configured override.
pub fn get_history_dir(config: &Config) -> PathBuf {
    config
        .history_dir
        .clone()
        .unwrap_or_else(|| get_config_dir().join("history"))
}

/// Load configuration from a YAML file.
///
/// An explicitly passed path must exist. When no path is given and the
/// default config file is absent, built-in defaults apply (the tool is
/// usable without a config file).
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                anyhow::bail!("Config file not found at {}", p.display());
            }
            p
        }
        None => {
            let default_path = get_config_path();
            if !default_path.exists() {
                return Ok(Config::default());
            }
            default_path
        }
    };

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", config_path.display()))?;

    Ok(config)
}
