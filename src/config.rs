//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub client: ClientConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ServerConfig {
    /// Create config with custom host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Where sets are kept
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Sqlite,
}

impl std::str::FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" => Ok(StorageBackend::Memory),
            "sqlite" => Ok(StorageBackend::Sqlite),
            other => Err(ConfigError::Invalid(format!(
                "unknown storage backend '{}', expected memory or sqlite",
                other
            ))),
        }
    }
}

/// Set store configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// SQLite database file; defaults under the local data directory
    pub path: Option<String>,
}

impl StorageConfig {
    /// Resolved SQLite database path
    pub fn db_path(&self) -> PathBuf {
        match &self.path {
            Some(path) => PathBuf::from(path),
            None => default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|p| p.join("training-notebook").join("notebook.db"))
        .unwrap_or_else(|| PathBuf::from("./notebook.db"))
}

/// Set list client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default = "default_client_timeout")]
    pub request_timeout_ms: u64,
}

fn default_api_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_client_timeout() -> u64 {
    5000
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            request_timeout_ms: default_client_timeout(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Unset means each binary's own default level
    #[serde(default)]
    pub level: Option<String>,

    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Level used when neither the config file nor the environment sets one
pub const DEFAULT_LOG_LEVEL: &str = "info";

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: None,
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    /// Effective level
    pub fn level(&self) -> &str {
        self.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }
}

/// Where configuration came from, kept until logging is up
#[derive(Debug, Default)]
pub struct LoadReport {
    /// File the config was read from; `None` means defaults
    pub source: Option<PathBuf>,
    /// Files that exist but could not be loaded
    pub skipped: Vec<(PathBuf, ConfigError)>,
}

impl LoadReport {
    /// Emit what happened during loading
    pub fn log(&self) {
        for (path, error) in &self.skipped {
            tracing::warn!("Failed to load config from {:?}: {}", path, error);
        }
        match &self.source {
            Some(path) => tracing::info!("Loaded config from {:?}", path),
            None => tracing::info!("Using default config with environment overrides"),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load an explicit file if given, else the first default location found
    ///
    /// Nothing is logged here, since the subscriber usually depends on the
    /// result. Call `LoadReport::log` once logging is initialized.
    pub fn resolve(explicit: Option<&Path>) -> Result<(Self, LoadReport), ConfigError> {
        match explicit {
            Some(path) => {
                let config = Self::load_with_env(path)?;
                let report = LoadReport {
                    source: Some(path.to_path_buf()),
                    ..Default::default()
                };
                Ok((config, report))
            }
            None => Ok(Self::discover_in(&default_paths())),
        }
    }

    /// First of `paths` that exists and loads, else defaults with env overrides
    pub fn discover_in(paths: &[PathBuf]) -> (Self, LoadReport) {
        let mut report = LoadReport::default();

        for path in paths.iter().filter(|p| p.exists()) {
            match Self::load_with_env(path) {
                Ok(config) => {
                    report.source = Some(path.clone());
                    return (config, report);
                }
                Err(e) => report.skipped.push((path.clone(), e)),
            }
        }

        (Self::from_env(), report)
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup (the process environment in practice)
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // Server overrides
        if let Some(host) = lookup("NOTEBOOK_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("NOTEBOOK_PORT") {
            match port.parse() {
                Ok(p) => self.server.port = p,
                Err(_) => tracing::warn!("Ignoring invalid NOTEBOOK_PORT: {}", port),
            }
        }

        // Storage overrides
        if let Some(backend) = lookup("NOTEBOOK_STORAGE") {
            match backend.parse() {
                Ok(b) => self.storage.backend = b,
                Err(e) => tracing::warn!("Ignoring NOTEBOOK_STORAGE: {}", e),
            }
        }
        if let Some(path) = lookup("NOTEBOOK_DB_PATH") {
            self.storage.path = Some(path);
        }

        // Client overrides
        if let Some(url) = lookup("NOTEBOOK_API_URL") {
            self.client.api_url = url;
        }

        // Logging overrides
        if let Some(level) = lookup("NOTEBOOK_LOG_LEVEL") {
            self.logging.level = Some(level);
        }
        if let Some(format) = lookup("NOTEBOOK_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Config file search order
fn default_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("training-notebook").join("config.toml"));
    }
    paths.push(PathBuf::from("/etc/training-notebook/config.toml"));
    paths.push(PathBuf::from("./config.toml"));
    paths
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Training Notebook Configuration
#
# Environment variables override these settings:
# - NOTEBOOK_HOST
# - NOTEBOOK_PORT
# - NOTEBOOK_STORAGE
# - NOTEBOOK_DB_PATH
# - NOTEBOOK_API_URL
# - NOTEBOOK_LOG_LEVEL
# - NOTEBOOK_LOG_FORMAT

[server]
# API server host
host = "0.0.0.0"

# API server port
port = 8080

# Request timeout in seconds
request_timeout_secs = 30

[storage]
# Set store backend: memory or sqlite
backend = "memory"

# SQLite database file (default: <local data dir>/training-notebook/notebook.db)
# path = "/var/lib/training-notebook/notebook.db"

[client]
# Base URL the set list fetches /sets from
api_url = "http://localhost:8080"

# Request timeout in milliseconds
request_timeout_ms = 5000

[logging]
# Log level: trace, debug, info, warn, error
# (default: info for the server, warn for the CLI)
# level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config_parses() {
        let config = Config::parse(&generate_default_config()).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.client.api_url, "http://localhost:8080");
        assert_eq!(config.client.request_timeout_ms, 5000);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = Config::parse(
            r#"
            [storage]
            backend = "sqlite"
            path = "/tmp/sets.db"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.addr(), "0.0.0.0:8080");
        assert_eq!(config.storage.backend, StorageBackend::Sqlite);
        assert_eq!(config.storage.db_path(), PathBuf::from("/tmp/sets.db"));
        assert_eq!(config.logging.level, None);
        assert_eq!(config.logging.level(), "info");
    }

    #[test]
    fn test_log_level_from_file_and_env() {
        let mut config = Config::parse("[logging]\nlevel = \"debug\"").unwrap();
        assert_eq!(config.logging.level(), "debug");

        config.apply_overrides(|key| (key == "NOTEBOOK_LOG_LEVEL").then(|| "trace".to_string()));
        assert_eq!(config.logging.level.as_deref(), Some("trace"));
    }

    #[test]
    fn test_discover_skips_broken_files() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("broken.toml");
        let good = dir.path().join("good.toml");
        std::fs::write(&broken, "[server\nport = ").unwrap();
        std::fs::write(&good, "[server]\nport = 9100").unwrap();

        let paths = vec![dir.path().join("missing.toml"), broken.clone(), good.clone()];
        let (config, report) = Config::discover_in(&paths);

        assert_eq!(config.server.port, 9100);
        assert_eq!(report.source, Some(good));
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].0, broken);
        assert!(matches!(report.skipped[0].1, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_discover_without_files() {
        let dir = tempfile::tempdir().unwrap();
        let (_, report) = Config::discover_in(&[dir.path().join("none.toml")]);
        assert!(report.source.is_none());
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn test_resolve_explicit_missing_file_errors() {
        assert!(Config::resolve(Some(Path::new("/nonexistent/notebook.toml"))).is_err());
    }

    #[test]
    fn test_unknown_backend_rejected() {
        assert!(Config::parse("[storage]\nbackend = \"postgres\"").is_err());
        assert!("postgres".parse::<StorageBackend>().is_err());
        assert_eq!(
            "SQLite".parse::<StorageBackend>().unwrap(),
            StorageBackend::Sqlite
        );
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("NOTEBOOK_PORT", "9000"),
            ("NOTEBOOK_STORAGE", "sqlite"),
            ("NOTEBOOK_API_URL", "http://sets.local"),
            ("NOTEBOOK_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.storage.backend, StorageBackend::Sqlite);
        assert_eq!(config.client.api_url, "http://sets.local");
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn test_invalid_port_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|key| (key == "NOTEBOOK_PORT").then(|| "eighty".to_string()));
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/nonexistent/notebook.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
