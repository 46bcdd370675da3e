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
    pub store: StoreConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

fn default_data_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("jobtrack").to_string_lossy().to_string())
        .unwrap_or_else(|| "./jobtrack_data".to_string())
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl StoreConfig {
    /// Data directory with a leading `~` expanded to the home directory
    pub fn data_path(&self) -> PathBuf {
        expand_home(&self.data_dir)
    }
}

fn expand_home(path: &str) -> PathBuf {
    let rest = if path == "~" {
        Some("")
    } else {
        path.strip_prefix("~/")
    };

    match (rest, dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed CORS origins; empty means permissive
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,

    #[serde(default = "default_max_ws_connections")]
    pub max_ws_connections: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8090
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:8091".to_string(),
        "http://127.0.0.1:8091".to_string(),
    ]
}

fn default_max_body_size() -> usize {
    64 * 1024 // 64 KB
}

fn default_max_ws_connections() -> usize {
    1000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
            max_body_size: default_max_body_size(),
            max_ws_connections: default_max_ws_connections(),
        }
    }
}

impl ApiConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Session configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_session_ttl")]
    pub session_ttl_hours: i64,
}

fn default_session_ttl() -> i64 {
    24 * 7
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_ttl_hours: default_session_ttl(),
        }
    }
}

/// Longest accepted session lifetime (one year)
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 366;

impl AuthConfig {
    /// Session lifetime, clamped to between one hour and one year
    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.session_ttl_hours.clamp(1, MAX_SESSION_TTL_HOURS))
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
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

    /// First config file found in the default locations
    ///
    /// Checked in order: `~/.config/jobtrack/config.toml`,
    /// `/etc/jobtrack/config.toml`, `./config.toml`.
    pub fn find_default_path() -> Option<PathBuf> {
        [
            dirs::config_dir().map(|p| p.join("jobtrack").join("config.toml")),
            Some(PathBuf::from("/etc/jobtrack/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ]
        .into_iter()
        .flatten()
        .find(|path| path.exists())
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(data_dir) = lookup("JOBTRACK_DATA_DIR") {
            self.store.data_dir = data_dir;
        }

        if let Some(host) = lookup("JOBTRACK_API_HOST") {
            self.api.host = host;
        }
        if let Some(port) = lookup("JOBTRACK_API_PORT").and_then(|p| p.parse().ok()) {
            self.api.port = port;
        }

        if let Some(ttl) = lookup("JOBTRACK_SESSION_TTL_HOURS").and_then(|t| t.parse().ok()) {
            self.auth.session_ttl_hours = ttl;
        }

        if let Some(level) = lookup("JOBTRACK_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("JOBTRACK_LOG_FORMAT") {
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
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# jobtrack Configuration
#
# Environment variables override these settings:
# - JOBTRACK_DATA_DIR
# - JOBTRACK_API_HOST
# - JOBTRACK_API_PORT
# - JOBTRACK_SESSION_TTL_HOURS
# - JOBTRACK_LOG_LEVEL
# - JOBTRACK_LOG_FORMAT

[store]
# Directory holding jobtrack.db
data_dir = "~/.local/share/jobtrack"

[api]
# API server host
host = "0.0.0.0"

# API server port
port = 8090

# Allowed CORS origins (the web UI dev server)
cors_origins = ["http://localhost:8091", "http://127.0.0.1:8091"]

# Maximum request body size (bytes)
max_body_size = 65536

# Maximum concurrent WebSocket subscriptions
max_ws_connections = 1000

[auth]
# How long a login session stays valid (hours)
session_ttl_hours = 168

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

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
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.port, 8090);
        assert_eq!(config.api.addr(), "0.0.0.0:8090");
        assert_eq!(config.auth.session_ttl_hours, 168);
        assert!(!config.logging.is_json());
    }

    #[test]
    fn test_session_ttl_is_clamped() {
        let mut auth = AuthConfig {
            session_ttl_hours: 10_000_000_000,
        };
        assert_eq!(auth.session_ttl(), chrono::Duration::hours(MAX_SESSION_TTL_HOURS));
        assert!(chrono::Utc::now().checked_add_signed(auth.session_ttl()).is_some());

        auth.session_ttl_hours = 0;
        assert_eq!(auth.session_ttl(), chrono::Duration::hours(1));
    }

    #[test]
    fn test_generated_config_parses() {
        let config = Config::parse(&generate_default_config()).unwrap();
        assert_eq!(config.api.port, 8090);
        assert_eq!(config.api.cors_origins.len(), 2);
        assert_eq!(config.store.data_dir, "~/.local/share/jobtrack");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config = Config::parse("[api]\nport = 9000\n").unwrap();
        assert_eq!(config.api.port, 9000);
        assert_eq!(config.api.host, "0.0.0.0");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("JOBTRACK_API_PORT", "7001"),
            ("JOBTRACK_LOG_FORMAT", "json"),
            ("JOBTRACK_SESSION_TTL_HOURS", "not-a-number"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.api.port, 7001);
        assert!(config.logging.is_json());
        assert_eq!(config.auth.session_ttl_hours, 168);
    }

    #[test]
    fn test_data_path_expands_home() {
        let store = StoreConfig {
            data_dir: "~/.local/share/jobtrack".to_string(),
        };
        if let Some(home) = dirs::home_dir() {
            assert_eq!(store.data_path(), home.join(".local/share/jobtrack"));
            assert!(!store.data_path().starts_with("~"));
        }

        let store = StoreConfig {
            data_dir: "./jobtrack_data".to_string(),
        };
        assert_eq!(store.data_path(), PathBuf::from("./jobtrack_data"));
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load(Path::new("/nonexistent/jobtrack.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
