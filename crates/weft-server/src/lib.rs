//! HTTP server for Weft.
//!
//! This crate is the delivery boundary around the element tree and the
//! live-reload pipeline, serving:
//! - A catch-all page route rendering an element tree per request
//! - Static assets under `/static/`
//! - A Server-Sent Events endpoint for live reload during development
//!
//! # Architecture
//!
//! ```text
//! Browser ──HTTP──► axum router (weft-server)
//!                        │
//!                        ├─► Page route ──► weft-markup (build + render)
//!                        │
//!                        ├─► SSE /__weft/events ──► ReloadHub subscriber
//!                        │                              ▲
//!                        │        SnapshotPoller ───────┘ (weft-watch)
//!                        │
//!                        └─► Static files (tower-http ServeDir)
//! ```
//!
//! # Quick Start
//!
//! ```ignore
//! use std::path::PathBuf;
//! use weft_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         host: "127.0.0.1".to_owned(),
//!         port: 8080,
//!         public_dir: PathBuf::from("public"),
//!         live_reload_enabled: true,
//!         poll_interval: std::time::Duration::from_millis(500),
//!         watch_dirs: vec![PathBuf::from(".")],
//!         verbose: false,
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```

mod app;
pub mod db;
mod error;
mod handlers;
mod live_reload;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use weft_watch::{ReloadHub, SnapshotPoller};

use state::AppState;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Directory served under `/static/`.
    pub public_dir: PathBuf,
    /// Enable live reload.
    pub live_reload_enabled: bool,
    /// Poll interval for the filesystem watcher.
    pub poll_interval: Duration,
    /// Directories watched for changes.
    pub watch_dirs: Vec<PathBuf>,
    /// Enable verbose output.
    pub verbose: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8080,
            public_dir: PathBuf::from("public"),
            live_reload_enabled: true,
            poll_interval: weft_watch::DEFAULT_POLL_INTERVAL,
            watch_dirs: vec![PathBuf::from(".")],
            verbose: false,
        }
    }
}

/// Run the server.
///
/// Starts the background snapshot poller when live reload is enabled,
/// then serves until a shutdown signal (Ctrl-C) arrives. The poller is
/// stopped before returning.
///
/// # Errors
///
/// Returns an error if the server fails to bind or serve.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    // Start the live reload pipeline if enabled
    let (hub, poller) = if config.live_reload_enabled {
        let hub = ReloadHub::new();
        let poller = SnapshotPoller::new(config.watch_dirs.clone(), config.poll_interval)
            .spawn(Arc::clone(&hub));
        (Some(hub), Some(poller))
    } else {
        (None, None)
    };

    // Create app state
    let state = Arc::new(AppState {
        hub,
        public_dir: config.public_dir.clone(),
        verbose: config.verbose,
    });

    // Create router
    let app = app::create_router(&state);

    // Bind and run server
    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(poller) = poller {
        poller.stop().await;
    }

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from Weft config.
#[must_use]
pub fn server_config_from_config(config: &weft_config::Config, verbose: bool) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        public_dir: config.pages_resolved.public_dir.clone(),
        live_reload_enabled: config.live_reload_resolved.enabled,
        poll_interval: Duration::from_millis(config.live_reload_resolved.poll_interval_ms),
        watch_dirs: config.live_reload_resolved.watch_dirs.clone(),
        verbose,
    }
}
