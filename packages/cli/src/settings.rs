//! Configuration file lookup
//!
//! The configuration lives at `~/.hellion-explorer/config.json` unless a
//! path is given explicitly. A missing default file means defaults; a
//! missing explicit file is an error. `HELLION_*` environment variables
//! are applied on top and the result is validated.

use anyhow::{Context, Result};
use hellion_core::ExplorerConfig;
use std::path::{Path, PathBuf};

const CONFIG_DIR_NAME: &str = ".hellion-explorer";
const CONFIG_FILE_NAME: &str = "config.json";

/// `~/.hellion-explorer/config.json`, if a home directory is known.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load, override and validate the explorer configuration.
pub fn load_config(path: Option<&Path>) -> Result<ExplorerConfig> {
    let mut config = match path {
        Some(path) => read_config(path)?,
        None => match default_config_path() {
            Some(path) if path.exists() => read_config(&path)?,
            _ => {
                tracing::debug!("No configuration file, using defaults");
                ExplorerConfig::default()
            }
        },
    };

    config
        .apply_env_overrides()
        .context("Failed to apply environment overrides")?;
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn read_config(path: &Path) -> Result<ExplorerConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration {}", path.display()))?;
    let config = ExplorerConfig::from_json(&text)
        .with_context(|| format!("Failed to parse configuration {}", path.display()))?;
    tracing::info!("Loaded configuration from {}", path.display());
    Ok(config)
}
