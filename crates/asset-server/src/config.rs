//! Server configuration.
//!
//! Defaults reproduce the fixed setup: port 3000, `html/index.html` for the
//! root path, and the `static` then `dist/static` asset directories.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use viewer::ViewerConfig;

use crate::ServerError;

/// Complete server configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listening socket settings
    #[serde(default)]
    pub server: ListenConfig,
    /// Asset locations
    #[serde(default)]
    pub assets: AssetsConfig,
    /// Settings passed to the event viewer
    #[serde(default)]
    pub viewer: ViewerConfig,
}

impl ServerConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ServerError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parses configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ServerError> {
        Ok(toml::from_str(content)?)
    }

    /// Address to bind, as `host:port`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Listening socket settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListenConfig {
    pub host: String,
    pub port: u16,
    /// Largest accepted event file, in bytes
    pub max_upload_bytes: usize,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            max_upload_bytes: 64 * 1024 * 1024,
        }
    }
}

/// Where the page and its assets live.
///
/// Relative paths are resolved against `root`. Without a root, the current
/// directory is used if it holds the index page, else the crate directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    pub root: Option<PathBuf>,
    /// Document served for `GET /`
    pub index: PathBuf,
    /// First static root; wins on path collisions
    pub static_dir: PathBuf,
    /// Second static root
    pub fallback_static_dir: PathBuf,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            root: None,
            index: PathBuf::from("html/index.html"),
            static_dir: PathBuf::from("static"),
            fallback_static_dir: PathBuf::from("dist/static"),
        }
    }
}

impl AssetsConfig {
    /// Resolves every path against the asset root.
    pub fn resolve(&self) -> ResolvedAssets {
        let root = self.root.clone().unwrap_or_else(|| detect_root(&self.index));
        ResolvedAssets {
            index: root.join(&self.index),
            static_dir: root.join(&self.static_dir),
            fallback_static_dir: root.join(&self.fallback_static_dir),
        }
    }
}

/// Asset paths after resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAssets {
    pub index: PathBuf,
    pub static_dir: PathBuf,
    pub fallback_static_dir: PathBuf,
}

fn detect_root(index: &Path) -> PathBuf {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    if cwd.join(index).exists() {
        return cwd;
    }

    let crate_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    if crate_dir.join(index).exists() {
        return crate_dir;
    }

    cwd
}

#[cfg(test)]
mod tests {
    use super::*;
    use viewer::DisplayZone;

    #[test]
    fn test_defaults_match_fixed_setup() {
        let config = ServerConfig::default();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.bind_addr(), "127.0.0.1:3000");
        assert_eq!(config.assets.index, PathBuf::from("html/index.html"));
        assert_eq!(config.assets.static_dir, PathBuf::from("static"));
        assert_eq!(config.assets.fallback_static_dir, PathBuf::from("dist/static"));
    }

    #[test]
    fn test_parse_config_from_toml() {
        let toml = r#"
            [server]
            port = 8080

            [assets]
            root = "/srv/viewer"

            [viewer.display]
            time_zone = "utc"
        "#;

        let config = ServerConfig::from_str(toml).unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.viewer.display.time_zone, DisplayZone::Utc);

        let resolved = config.assets.resolve();
        assert_eq!(resolved.index, PathBuf::from("/srv/viewer/html/index.html"));
        assert_eq!(resolved.static_dir, PathBuf::from("/srv/viewer/static"));
        assert_eq!(
            resolved.fallback_static_dir,
            PathBuf::from("/srv/viewer/dist/static")
        );
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            ServerConfig::from_str("[server]\nport = \"high\""),
            Err(ServerError::Config(_))
        ));
    }

    #[test]
    fn test_detect_root_finds_bundled_page() {
        // The crate ships its own page, so resolution never lands on a missing index.
        let resolved = AssetsConfig::default().resolve();
        assert!(resolved.index.exists());
    }
}
