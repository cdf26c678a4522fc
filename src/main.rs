//! ColorSense Server Binary
//!
//! Starts the ColorSense backend that adapts visual element colors for
//! users with color-vision deficiencies and manages their profiles.
//!
//! # Usage
//!
//! ```bash
//! # Start with default settings (port 3000, platform config directory)
//! colorsense
//!
//! # Specify port and profile store
//! colorsense --port 8080 --profiles ./profiles.json
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use colorsense::config::Config;
use colorsense::store::ProfileStore;
use colorsense::web;

/// ColorSense Server - semantic color adaptation backend
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on (overrides the config file)
    #[arg(short, long)]
    port: Option<u16>,

    /// Host to bind to (overrides the config file)
    #[arg(long)]
    host: Option<String>,

    /// Profile store file.
    /// Defaults to the platform-specific data location:
    /// - Linux: ~/.config/ColorSense/profiles.json
    /// - macOS: ~/Library/Application Support/ColorSense/profiles.json
    /// - Windows: %APPDATA%\ColorSense\profiles.json
    #[arg(long)]
    profiles: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load or create configuration
    let config = Config::load().unwrap_or_default();

    let host = args.host.unwrap_or(config.server.host);
    let port = args.port.unwrap_or(config.server.port);
    let profiles_path = args.profiles.unwrap_or(config.storage.profiles_path);

    // An unusable profile store is fatal: better to abort startup than to
    // serve traffic that cannot persist anything.
    let store = ProfileStore::open(&profiles_path).with_context(|| {
        format!(
            "Failed to open profile store: {}",
            profiles_path.display()
        )
    })?;

    info!("Profile store: {}", profiles_path.display());

    // Build socket address
    let addr: SocketAddr = format!("{host}:{port}").parse()?;

    // Start the server
    web::run_server(Arc::new(store), addr).await
}
