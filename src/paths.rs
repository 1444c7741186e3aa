//! Path resolution for stagehand
//!
//! # Environment Variables
//!
//! - `STAGEHAND_CONFIG` - Use this config file instead of the default location
//! - `STAGEHAND_CONFIG_DIR` - Override the config directory
//!
//! # Config File Resolution
//!
//! 1. `STAGEHAND_CONFIG` environment variable
//! 2. `<config_dir>/config.toml`, where config_dir is:
//!    - `STAGEHAND_CONFIG_DIR` if set
//!    - `XDG_CONFIG_HOME/stagehand` if set
//!    - `~/.config/stagehand` (Unix) or `%APPDATA%\stagehand` (Windows)

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Environment variable for an explicit config file
pub const ENV_CONFIG: &str = "STAGEHAND_CONFIG";

/// Environment variable for config directory override
pub const ENV_CONFIG_DIR: &str = "STAGEHAND_CONFIG_DIR";

/// Name of the config file inside the config directory
pub const CONFIG_FILE: &str = "config.toml";

/// Get the stagehand config directory path
pub fn config_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(ENV_CONFIG_DIR) {
        let path = expand(&dir);
        log::debug!(
            "Using config dir from {}: {}",
            ENV_CONFIG_DIR,
            path.display()
        );
        return Ok(path);
    }

    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        let path = PathBuf::from(xdg_config).join("stagehand");
        log::debug!("Using XDG_CONFIG_HOME: {}", path.display());
        return Ok(path);
    }

    #[cfg(windows)]
    {
        if let Some(app_data) = dirs::config_dir() {
            return Ok(app_data.join("stagehand"));
        }
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    let path = home.join(".config").join("stagehand");
    log::debug!("Using default config dir: {}", path.display());
    Ok(path)
}

/// Get the config file path (which may not exist)
pub fn config_file() -> Result<PathBuf> {
    if let Ok(file) = std::env::var(ENV_CONFIG) {
        let path = expand(&file);
        log::debug!("Using config file from {}: {}", ENV_CONFIG, path.display());
        return Ok(path);
    }
    Ok(config_dir()?.join(CONFIG_FILE))
}

/// Expand ~ and environment variables in a path string.
pub fn expand(path: &str) -> PathBuf {
    let expanded = shellexpand::full(path).unwrap_or(std::borrow::Cow::Borrowed(path));
    PathBuf::from(expanded.as_ref())
}

// ============================================================================
// Tests
// ============================================================================
