//! `weft serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use weft_config::{CliSettings, Config};
use weft_server::{run_server, server_config_from_config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover weft.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Public assets directory (overrides config).
    #[arg(long)]
    public_dir: Option<PathBuf>,

    /// Directory to watch for changes; repeatable (overrides config).
    #[arg(short, long = "watch")]
    watch_dirs: Vec<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Enable live reload (default: enabled).
    #[arg(long)]
    live_reload: Option<bool>,

    /// Disable live reload.
    #[arg(long, conflicts_with = "live_reload")]
    no_live_reload: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, the database cannot be
    /// reached, or the server fails to start.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        // Resolve flags before moving into CliSettings
        let live_reload_enabled = self.resolve_live_reload_enabled();

        // Build CLI settings from args
        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            public_dir: self.public_dir,
            watch_dirs: (!self.watch_dirs.is_empty()).then_some(self.watch_dirs),
            live_reload_enabled,
        };

        // Load config
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        // Print startup info
        output.info(&format!(
            "Starting server on {}:{}",
            config.server.host, config.server.port
        ));
        output.info(&format!(
            "Public directory: {}",
            config.pages_resolved.public_dir.display()
        ));

        if config.live_reload_resolved.enabled {
            let watched = config
                .live_reload_resolved
                .watch_dirs
                .iter()
                .map(|d| d.display().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            output.info(&format!("Live reload: enabled (watching {watched})"));
        } else {
            output.info("Live reload: disabled");
        }

        // Open and ping the database before serving, if configured. The
        // pool itself is dropped; page handlers do not query yet.
        if let Some(database) = &config.database {
            output.info(&format!("Database: {}", database.driver));
            weft_server::db::connect(&database.driver, &database.url).await?;
        }

        // Build server config and run
        let server_config = server_config_from_config(&config, self.verbose);
        run_server(server_config)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }

    /// Resolve `live_reload_enabled` from --live-reload/--no-live-reload flags.
    fn resolve_live_reload_enabled(&self) -> Option<bool> {
        self.no_live_reload.then_some(false).or(self.live_reload)
    }
}
