//! Event viewer server and command line renderer.
//!
//! Run with: cargo run -p asset-server
//!
//! Examples:
//!   cargo run -p asset-server -- serve --port 8080
//!   cargo run -p asset-server -- render events.json --type usb_event --expand
//!   cargo run -p asset-server -- default-config > viewer.toml

use asset_server::{RenderOptions, ServerConfig};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;
use viewer::DisplayZone;

/// Event log viewer
#[derive(Parser, Debug)]
#[command(name = "event-viewer")]
#[command(about = "Browse event log files by type")]
struct Args {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the viewer page (default)
    Serve {
        /// Address to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,
    },
    /// Render an event file to stdout
    Render {
        /// Event file to load
        file: PathBuf,

        /// Show only events of this type
        #[arg(long = "type", default_value = "any")]
        event_type: String,

        /// Expand every item
        #[arg(long)]
        expand: bool,

        /// Emit the HTML fragment instead of text
        #[arg(long)]
        html: bool,

        /// Show timestamps in UTC
        #[arg(long)]
        utc: bool,

        /// Viewer settings file (`[display]`, `[filter]`)
        #[arg(long)]
        viewer_config: Option<PathBuf>,
    },
    /// Print a default viewer settings file
    DefaultConfig,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match ServerConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load config {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => ServerConfig::default(),
    };

    let command = args.command.unwrap_or(Command::Serve {
        host: None,
        port: None,
    });

    match command {
        Command::Serve { host, port } => {
            let mut config = config;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }

            if let Err(e) = asset_server::serve(config).await {
                error!("Server stopped: {}", e);
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Command::Render {
            file,
            event_type,
            expand,
            html,
            utc,
            viewer_config,
        } => {
            let mut viewer_config =
                match asset_server::load_viewer_config(config.viewer, viewer_config.as_deref()) {
                    Ok(viewer_config) => viewer_config,
                    Err(e) => {
                        error!("{}", e);
                        return ExitCode::FAILURE;
                    }
                };
            if utc {
                viewer_config.display.time_zone = DisplayZone::Utc;
            }
            let options = RenderOptions {
                event_type,
                expand,
                html,
            };

            match asset_server::render_file(viewer_config, &file, &options) {
                Ok(output) => {
                    print!("{}", output);
                    if html {
                        println!();
                    }
                }
                Err(e) => {
                    error!("Failed to render {}: {}", file.display(), e);
                    return ExitCode::FAILURE;
                }
            }
            ExitCode::SUCCESS
        }
        Command::DefaultConfig => {
            print!("{}", viewer::default_config_toml());
            ExitCode::SUCCESS
        }
    }
}
