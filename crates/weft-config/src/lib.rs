//! Configuration management for Weft.
//!
//! Parses `weft.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "weft.toml";

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override public assets directory.
    pub public_dir: Option<PathBuf>,
    /// Override watched directories.
    pub watch_dirs: Option<Vec<PathBuf>>,
    /// Override live reload enabled flag.
    pub live_reload_enabled: Option<bool>,
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Page and asset configuration (paths are relative strings from TOML).
    pages: PagesConfigRaw,
    /// Live reload configuration.
    live_reload: LiveReloadConfigRaw,
    /// Database configuration (optional section).
    pub database: Option<DatabaseConfig>,

    /// Resolved pages configuration (set after loading).
    #[serde(skip)]
    pub pages_resolved: PagesConfig,
    /// Resolved live reload configuration (set after loading).
    #[serde(skip)]
    pub live_reload_resolved: LiveReloadConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8080,
        }
    }
}

/// Raw pages configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct PagesConfigRaw {
    public_dir: Option<String>,
}

/// Resolved page and asset configuration with absolute paths.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PagesConfig {
    /// Directory served under the static route prefix.
    pub public_dir: PathBuf,
}

/// Raw live reload configuration as parsed from TOML.
#[derive(Debug, Deserialize)]
#[serde(default)]
struct LiveReloadConfigRaw {
    enabled: bool,
    poll_interval_ms: u64,
    watch_dirs: Option<Vec<String>>,
}

impl Default for LiveReloadConfigRaw {
    fn default() -> Self {
        Self {
            enabled: true,
            poll_interval_ms: 500,
            watch_dirs: None,
        }
    }
}

/// Resolved live reload configuration with absolute paths.
#[derive(Debug, PartialEq, Eq)]
pub struct LiveReloadConfig {
    /// Whether live reload is enabled.
    pub enabled: bool,
    /// Poll interval in milliseconds.
    pub poll_interval_ms: u64,
    /// Directories watched for changes.
    pub watch_dirs: Vec<PathBuf>,
}

impl Default for LiveReloadConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            poll_interval_ms: 500,
            watch_dirs: Vec::new(),
        }
    }
}

/// Database connection configuration.
#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Driver identifier (postgres, mysql or sqlite).
    pub driver: String,
    /// Connection string.
    pub url: String,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `weft.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing
    /// CLI arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(public_dir) = &settings.public_dir {
            self.pages_resolved.public_dir.clone_from(public_dir);
        }
        if let Some(watch_dirs) = &settings.watch_dirs {
            self.live_reload_resolved.watch_dirs.clone_from(watch_dirs);
        }
        if let Some(enabled) = settings.live_reload_enabled {
            self.live_reload_resolved.enabled = enabled;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            server: ServerConfig::default(),
            pages: PagesConfigRaw::default(),
            live_reload: LiveReloadConfigRaw::default(),
            database: None,
            pages_resolved: PagesConfig {
                public_dir: base.join("public"),
            },
            live_reload_resolved: LiveReloadConfig {
                enabled: true,
                poll_interval_ms: 500,
                watch_dirs: vec![base.to_path_buf()],
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Resolve raw relative paths against the config file's directory.
    fn resolve_paths(&mut self, base: &Path) {
        self.pages_resolved.public_dir = match &self.pages.public_dir {
            Some(dir) => base.join(dir),
            None => base.join("public"),
        };

        let watch_dirs = match &self.live_reload.watch_dirs {
            Some(dirs) if !dirs.is_empty() => dirs.iter().map(|d| base.join(d)).collect(),
            _ => vec![base.to_path_buf()],
        };
        self.live_reload_resolved = LiveReloadConfig {
            enabled: self.live_reload.enabled,
            poll_interval_ms: self.live_reload.poll_interval_ms,
            watch_dirs,
        };
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.host.is_empty() {
            return Err(ConfigError::Validation("server.host cannot be empty".into()));
        }
        if self.live_reload_resolved.poll_interval_ms == 0 {
            return Err(ConfigError::Validation(
                "live_reload.poll_interval_ms must be positive".into(),
            ));
        }
        if let Some(database) = &self.database {
            if database.driver.is_empty() {
                return Err(ConfigError::Validation(
                    "database.driver cannot be empty".into(),
                ));
            }
            if database.url.is_empty() {
                return Err(ConfigError::Validation("database.url cannot be empty".into()));
            }
        }
        Ok(())
    }
}
