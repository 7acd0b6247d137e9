//! Application configuration.
//!
//! Settings live in `config.toml` under the platform configuration
//! directory and can be overridden with `HOMEDECK_*` environment
//! variables. A commented default file is written on first run.

use std::{
    fs,
    path::{Path, PathBuf},
};

use ::config::{Config, Environment, File};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::DisplayMode;

/// User-tunable settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Optional catalog document replacing the built-in players/games.
    pub catalog_path: Option<PathBuf>,
    /// Theme active at startup.
    pub start_mode: DisplayMode,
    /// Charge level shown by the decorative battery glyph.
    pub battery_percent: u8,
    /// Show the clock as 12-hour instead of 24-hour.
    pub twelve_hour_clock: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog_path: None,
            start_mode: DisplayMode::Day,
            battery_percent: 80,
            twelve_hour_clock: false,
        }
    }
}

const DEFAULT_CONFIG: &str = r#"# homedeck configuration.

# JSON document replacing the built-in players/games. Seeded with the
# factory catalog on first run when set.
# catalog_path = "~/.config/homedeck/catalog.json"

# Theme active at startup: "day" or "night".
start_mode = "day"

# Charge level shown by the decorative battery glyph (0-100).
battery_percent = 80

# Show the clock as 12-hour instead of 24-hour.
twelve_hour_clock = false
"#;

/// Directory holding homedeck's configuration.
pub fn config_root() -> Result<PathBuf> {
    let base = dirs::config_dir().context("no configuration directory available")?;
    Ok(base.join("homedeck"))
}

fn config_file() -> Result<PathBuf> {
    Ok(config_root()?.join("config.toml"))
}

/// Write a commented default configuration when none exists yet.
pub fn ensure_default_config() -> Result<()> {
    let path = config_file()?;
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory {}", parent.display()))?;
    }
    fs::write(&path, DEFAULT_CONFIG)
        .with_context(|| format!("failed to write default config {}", path.display()))
}

impl AppConfig {
    /// Load settings, layering the config file and environment overrides
    /// over the defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(config_file()?)
    }

    /// Load settings from an explicit file path.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref().to_path_buf()).required(false))
            .add_source(Environment::with_prefix("HOMEDECK").try_parsing(true))
            .build()
            .context("failed to assemble configuration")?;
        settings
            .try_deserialize()
            .context("failed to parse configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_values() {
        let config = AppConfig::default();
        assert!(config.catalog_path.is_none());
        assert_eq!(config.start_mode, DisplayMode::Day);
        assert_eq!(config.battery_percent, 80);
        assert!(!config.twelve_hour_clock);
    }

    #[test]
    fn loads_file_with_env_override() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
start_mode = "night"
battery_percent = 55
"#,
        )?;

        std::env::set_var("HOMEDECK_TWELVE_HOUR_CLOCK", "true");
        let config = AppConfig::load_from(&path);
        std::env::remove_var("HOMEDECK_TWELVE_HOUR_CLOCK");

        let config = config?;
        assert_eq!(config.start_mode, DisplayMode::Night);
        assert_eq!(config.battery_percent, 55);
        assert!(config.twelve_hour_clock);
        assert!(config.catalog_path.is_none());
        Ok(())
    }

    #[test]
    fn missing_file_falls_back_to_defaults() -> Result<()> {
        let dir = tempdir()?;
        let config = AppConfig::load_from(dir.path().join("absent.toml"))?;
        // Only fields the env-override test never touches, since tests
        // share the process environment.
        assert!(config.catalog_path.is_none());
        assert_eq!(config.start_mode, DisplayMode::Day);
        assert_eq!(config.battery_percent, 80);
        Ok(())
    }
}
