//! Whiteboard relay server
//!
//! # Usage
//! ```bash
//! whiteboard
//! whiteboard --config whiteboard.toml
//! whiteboard --listen 127.0.0.1:9000
//! whiteboard --config whiteboard.toml --check    # Validate config only
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use whiteboard_rs::config::Config;

/// Collaborative whiteboard relay with shared undo/redo
#[derive(Parser, Debug)]
#[command(name = "whiteboard")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address, overrides the configuration file
    #[arg(short, long)]
    listen: Option<SocketAddr>,

    /// Validate configuration and exit
    #[arg(long)]
    check: bool,

    /// Log level (trace, debug, info, warn, error), overrides the configuration file
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_file(path)
            .with_context(|| format!("Failed to load config from {:?}", path))?,
        None => Config::default(),
    };
    if let Some(listen) = args.listen {
        config.server.listen = listen;
    }
    if let Some(level) = args.log_level {
        config.server.log_level = level;
    }

    init_logging(&config.server.log_level);

    if args.check {
        tracing::info!("Configuration is valid");
        return Ok(());
    }

    let app = whiteboard_rs::app(&config).context("Failed to build router")?;

    let addr = config.server.listen;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("🎨 Whiteboard server running on http://{}", addr);
    tracing::info!("   WebSocket endpoint: ws://{}/ws", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Whiteboard server stopped");
    Ok(())
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("whiteboard_rs={level},whiteboard={level},tower_http={level}"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
