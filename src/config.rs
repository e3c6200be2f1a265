//! Server configuration.
//!
//! Values come from three layers, later ones winning: a TOML file, the
//! `CONNECTFOUR_*` environment variables, and command-line flags.

use std::path::Path;
use std::time::Duration;

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Environment variable overriding [`ServerConfig::host`].
pub const ENV_HOST: &str = "CONNECTFOUR_HOST";
/// Environment variable overriding [`ServerConfig::port`].
pub const ENV_PORT: &str = "CONNECTFOUR_PORT";
/// Environment variable overriding [`ServerConfig::db_path`].
pub const ENV_DB: &str = "CONNECTFOUR_DB";
/// Environment variable overriding [`ServerConfig::user_cache_ttl_secs`].
pub const ENV_CACHE_TTL: &str = "CONNECTFOUR_CACHE_TTL";

/// Configuration of the game server.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to.
    #[serde(default = "default_host")]
    host: String,

    /// Port to bind to.
    #[serde(default = "default_port")]
    port: u16,

    /// SQLite database file.
    #[serde(default = "default_db_path")]
    db_path: String,

    /// Seconds a user lookup stays cached. Zero disables the cache.
    #[serde(default = "default_user_cache_ttl_secs")]
    user_cache_ttl_secs: u64,

    /// Upper bound on cached users; unbounded when absent.
    #[serde(default)]
    user_cache_max_entries: Option<usize>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_db_path() -> String {
    "connectfour.db".to_string()
}

fn default_user_cache_ttl_secs() -> u64 {
    300
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            db_path: default_db_path(),
            user_cache_ttl_secs: default_user_cache_ttl_secs(),
            user_cache_max_entries: None,
        }
    }
}

impl ServerConfig {
    /// Loads configuration from a TOML file. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(host = %config.host, port = config.port, db = %config.db_path, "Config loaded");
        Ok(config)
    }

    /// Applies overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a numeric variable does not parse.
    #[instrument(skip(self))]
    pub fn apply_env(self) -> Result<Self, ConfigError> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Applies overrides looked up by variable name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a numeric variable does not parse.
    pub fn apply_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(host) = lookup(ENV_HOST) {
            debug!(host = %host, "Host overridden from environment");
            self.host = host;
        }
        if let Some(port) = lookup(ENV_PORT) {
            self.port = port
                .parse()
                .map_err(|e| ConfigError::new(format!("Invalid {}: {}", ENV_PORT, e)))?;
            debug!(port = self.port, "Port overridden from environment");
        }
        if let Some(db_path) = lookup(ENV_DB) {
            debug!(db = %db_path, "Database path overridden from environment");
            self.db_path = db_path;
        }
        if let Some(ttl) = lookup(ENV_CACHE_TTL) {
            self.user_cache_ttl_secs = ttl
                .parse()
                .map_err(|e| ConfigError::new(format!("Invalid {}: {}", ENV_CACHE_TTL, e)))?;
            debug!(ttl = self.user_cache_ttl_secs, "Cache TTL overridden from environment");
        }
        Ok(self)
    }

    /// Replaces the host.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Replaces the port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Replaces the database path.
    pub fn with_db_path(mut self, db_path: impl Into<String>) -> Self {
        self.db_path = db_path.into();
        self
    }

    /// Returns the user cache TTL as a [`Duration`].
    pub fn user_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.user_cache_ttl_secs)
    }

    /// Returns the `host:port` bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
