//! # Howe Configuration
//!
//! Configuration sources (in priority order):
//! 1. CLI arguments (applied by the binary)
//! 2. Environment variables (`HOWE_` prefix, `__` separates sections)
//! 3. User config (~/.config/howe/config.toml)
//! 4. Defaults
//!
//! ```toml
//! [general]
//! fonts_dir = "/usr/share/howe"
//!
//! [[widgets]]
//! type = "banner"
//! text = "hello"
//! color = "rainbow"
//! ```

use anyhow::Context;
use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Get the configuration directory
pub fn config_dir() -> PathBuf {
    ProjectDirs::from("dev", "howe", "howe")
        .map(|d| d.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.config/howe"))
}

/// Default location of the configuration file
pub fn default_config_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,
    /// Widgets to render, in display order
    pub widgets: Vec<WidgetConfig>,
}

/// General settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Directory searched for fonts given by name
    pub fonts_dir: PathBuf,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            fonts_dir: PathBuf::from(howe_core::DEFAULT_FONTS_DIR),
        }
    }
}

/// One widget entry: its type plus the payload handed to the widget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetConfig {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(flatten)]
    pub payload: serde_json::Map<String, serde_json::Value>,
}

impl Config {
    /// Load configuration from `path`, or from the default location.
    ///
    /// A missing default file yields the defaults; a missing explicit file
    /// is an error.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("config file not found: {}", path.display());
                }
                Self::load_from_file(path)
            }
            None => Self::load_from_file(&default_config_path()),
        }
    }

    /// Load configuration from file
    fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("HOWE_").split("__"));

        let config: Config = figment
            .extract()
            .with_context(|| format!("failed to load configuration from {}", path.display()))?;
        tracing::debug!(
            "Loaded {} widget(s) from {}",
            config.widgets.len(),
            path.display()
        );
        Ok(config)
    }

    /// Render the configuration as TOML
    pub fn to_toml(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
