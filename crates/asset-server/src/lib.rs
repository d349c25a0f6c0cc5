//! Asset server for the event viewer page.
//!
//! Serves `html/index.html` at `/`, everything else from two static roots,
//! and a small JSON API that loads, filters and toggles events through a
//! shared [`EventViewer`].
//!
//! # Modules
//!
//! - [`config`]: Server settings loaded from TOML
//! - [`assets`]: Index page and static roots
//! - [`session`]: Viewer API endpoints

pub mod assets;
pub mod config;
pub mod session;

pub use config::{AssetsConfig, ListenConfig, ResolvedAssets, ServerConfig};
pub use session::{AppState, ToggleResult, ViewSnapshot};

use std::path::Path;

use axum::Router;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::info;
use viewer::{ConfigError, EventViewer, ItemState, ViewerConfig, ViewerError, ANY};

/// Errors that can occur starting or running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Config(#[from] toml::de::Error),
    #[error("failed to load viewer settings: {0}")]
    ViewerConfig(#[from] ConfigError),
    #[error(transparent)]
    Viewer(#[from] ViewerError),
}

/// Applies a standalone viewer settings file over `base`, if one is given.
///
/// The file uses the viewer's own layout (`[display]`, `[filter]`) and
/// replaces the `[viewer]` section of the server config entirely.
pub fn load_viewer_config(
    base: ViewerConfig,
    path: Option<&Path>,
) -> Result<ViewerConfig, ServerError> {
    match path {
        Some(path) => Ok(ViewerConfig::from_file(path)?),
        None => Ok(base),
    }
}

/// Options of the `render` command.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub event_type: String,
    pub expand: bool,
    pub html: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            event_type: ANY.to_string(),
            expand: false,
            html: false,
        }
    }
}

/// Loads an event file and renders the selected events as text or HTML.
pub fn render_file(
    config: ViewerConfig,
    path: &Path,
    options: &RenderOptions,
) -> Result<String, ServerError> {
    let raw = std::fs::read_to_string(path)?;

    let mut viewer = EventViewer::new(config);
    viewer.load(&raw)?;
    viewer.filter(&options.event_type);
    if options.expand {
        viewer.set_all(ItemState::Expanded);
    }

    if options.html {
        Ok(viewer.list_html())
    } else {
        Ok(viewer.list_text())
    }
}

/// Builds the full application router.
pub fn app(config: &ServerConfig) -> Router {
    let assets = config.assets.resolve();
    let state = AppState::new(
        EventViewer::new(config.viewer.clone()),
        config.server.max_upload_bytes,
    );

    session::api_router(state)
        .merge(assets::asset_router(&assets))
        .layer(TraceLayer::new_for_http())
}

/// Binds the configured address and serves until the process is stopped.
pub async fn serve(config: ServerConfig) -> Result<(), ServerError> {
    let addr = config.bind_addr();
    let assets = config.assets.resolve();
    let app = app(&config);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(
        "Listening on http://{} (index {}, static {} then {})",
        listener.local_addr()?,
        assets.index.display(),
        assets.static_dir.display(),
        assets.fallback_static_dir.display()
    );

    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use log_events::fixtures;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use viewer::DisplayZone;

    fn sample_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(fixtures::sample_events_json().as_bytes())
            .unwrap();
        file
    }

    fn utc() -> ViewerConfig {
        let mut config = ViewerConfig::default();
        config.display.time_zone = DisplayZone::Utc;
        config
    }

    #[test]
    fn test_render_file_as_text() {
        let file = sample_file();
        let options = RenderOptions {
            event_type: "usb_event".to_string(),
            expand: true,
            html: false,
        };

        let text = render_file(utc(), file.path(), &options).unwrap();
        assert!(text.starts_with("Showing 2 of 8 events\n"));
        assert!(text.contains("[-] "));
        assert!(text.contains("Description: SanDisk Ultra USB 3.0"));
    }

    #[test]
    fn test_render_file_as_html() {
        let file = sample_file();
        let options = RenderOptions {
            html: true,
            ..RenderOptions::default()
        };

        let html = render_file(utc(), file.path(), &options).unwrap();
        assert_eq!(html.matches(r#"class="listItem""#).count(), 8);
        assert_eq!(html.matches(" hidden>").count(), 8);
    }

    #[test]
    fn test_viewer_settings_file_replaces_base() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[display]\ntime_zone = \"utc\"\nindent_px = 4").unwrap();

        let config = load_viewer_config(ViewerConfig::default(), Some(file.path())).unwrap();
        assert_eq!(config.display.time_zone, DisplayZone::Utc);
        assert_eq!(config.display.indent_px, 4);
        assert_eq!(config.filter.any_label, "------------");
    }

    #[test]
    fn test_without_viewer_settings_file_base_is_kept() {
        let config = load_viewer_config(utc(), None).unwrap();
        assert_eq!(config, utc());
    }

    #[test]
    fn test_missing_viewer_settings_file() {
        let err = load_viewer_config(
            ViewerConfig::default(),
            Some(Path::new("/nonexistent/viewer.toml")),
        )
        .unwrap_err();
        assert!(matches!(err, ServerError::ViewerConfig(ConfigError::Io(_))));
    }

    #[test]
    fn test_default_viewer_settings_load_as_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(viewer::default_config_toml().as_bytes())
            .unwrap();

        let config = load_viewer_config(utc(), Some(file.path())).unwrap();
        assert_eq!(config, ViewerConfig::default());
    }

    #[test]
    fn test_render_missing_file() {
        let err = render_file(
            utc(),
            Path::new("/nonexistent/events.json"),
            &RenderOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ServerError::Io(_)));
    }

    #[test]
    fn test_render_invalid_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[{\"id\": 1}]").unwrap();

        let err = render_file(utc(), file.path(), &RenderOptions::default()).unwrap_err();
        assert!(matches!(err, ServerError::Viewer(ViewerError::Parse(_))));
    }
}
