//! Server configuration.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Configuration for the gomoku rooms server.
#[derive(Debug, Clone, Getters, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    host: String,

    /// Port to bind to.
    #[serde(default = "default_port")]
    port: u16,

    /// Seconds a room may sit with zero connections before eviction.
    #[serde(default = "default_idle_room_secs")]
    idle_room_secs: u64,

    /// Seconds between eviction sweeps.
    #[serde(default = "default_eviction_interval_secs")]
    eviction_interval_secs: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_idle_room_secs() -> u64 {
    3600
}

fn default_eviction_interval_secs() -> u64 {
    60
}

impl ServerConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(host = %config.host, port = config.port, "Config loaded successfully");
        Ok(config)
    }

    /// Returns the idle-room eviction window.
    pub fn idle_room_ttl(&self) -> Duration {
        Duration::from_secs(self.idle_room_secs)
    }

    /// Returns the interval between eviction sweeps.
    pub fn eviction_interval(&self) -> Duration {
        Duration::from_secs(self.eviction_interval_secs)
    }

    /// Overrides the bind address from CLI flags.
    pub fn with_bind(mut self, host: Option<String>, port: Option<u16>) -> Self {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        self
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            idle_room_secs: default_idle_room_secs(),
            eviction_interval_secs: default_eviction_interval_secs(),
        }
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
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.host(), "127.0.0.1");
        assert_eq!(*config.port(), 3000);
        assert_eq!(config.idle_room_ttl(), Duration::from_secs(3600));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "host = \"0.0.0.0\"\nport = 8080\nidle_room_secs = 120").unwrap();

        let config = ServerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.host(), "0.0.0.0");
        assert_eq!(*config.port(), 8080);
        assert_eq!(config.idle_room_ttl(), Duration::from_secs(120));
        // Unspecified fields fall back to defaults.
        assert_eq!(config.eviction_interval(), Duration::from_secs(60));
    }

    #[test]
    fn test_missing_file_fails() {
        assert!(ServerConfig::from_file("/nonexistent/gomoku.toml").is_err());
    }

    #[test]
    fn test_cli_overrides() {
        let config = ServerConfig::default().with_bind(None, Some(9000));
        assert_eq!(*config.port(), 9000);
        assert_eq!(config.host(), "127.0.0.1");
    }
}
