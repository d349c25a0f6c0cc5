//! Configuration loading for the viewer.
//!
//! All viewer settings may be loaded from a TOML configuration file; every
//! section falls back to its defaults when absent.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Complete viewer configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Presentation settings
    #[serde(default)]
    pub display: DisplayConfig,
    /// Type filter settings
    #[serde(default)]
    pub filter: FilterConfig,
}

impl ViewerConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parses configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

/// Zone used to print event timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DisplayZone {
    /// Local time zone of the machine doing the rendering
    #[default]
    Local,
    /// Coordinated universal time
    Utc,
}

/// Presentation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Zone timestamps are shown in
    pub time_zone: DisplayZone,
    /// Left indent of each details level, in pixels
    pub indent_px: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            time_zone: DisplayZone::Local,
            indent_px: 10,
        }
    }
}

/// Type filter settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Text shown for the catch-all option
    pub any_label: String,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            any_label: "------------".to_string(),
        }
    }
}

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Default contents of a viewer settings file, as printed by the
/// `default-config` command.
pub fn default_config_toml() -> String {
    r#"# Viewer Configuration

[display]
time_zone = "local"
indent_px = 10

[filter]
any_label = "------------"
"#
    .to_string()
}
