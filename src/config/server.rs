//! Server configuration

use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use super::error::ValidationError;

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Environment name
    #[serde(default = "default_environment")]
    pub environment: Environment,

    /// Rust log filter directive
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Landing page served at `/`
    #[serde(default = "default_index_path")]
    pub index_path: PathBuf,

    /// How long shutdown waits for open sessions to close, in seconds
    #[serde(default = "default_shutdown_grace")]
    pub shutdown_grace_secs: u64,

    /// Maximum concurrent visitor connections (unbounded when unset)
    pub max_connections: Option<usize>,
}

/// Application environment
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl ServerConfig {
    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> Result<SocketAddr, ValidationError> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|_| ValidationError::InvalidHost(self.host.clone()))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Get the shutdown grace period as Duration
    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }

    /// Validate server configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        self.socket_addr()?;
        if self.shutdown_grace_secs == 0 || self.shutdown_grace_secs > 300 {
            return Err(ValidationError::InvalidShutdownGrace);
        }
        if self.max_connections == Some(0) {
            return Err(ValidationError::InvalidConnectionLimit);
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            environment: default_environment(),
            log_level: default_log_level(),
            index_path: default_index_path(),
            shutdown_grace_secs: default_shutdown_grace(),
            max_connections: None,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_environment() -> Environment {
    Environment::Development
}

fn default_log_level() -> String {
    "info,visitor_counter=debug,sqlx=warn".to_string()
}

fn default_index_path() -> PathBuf {
    PathBuf::from("./index.html")
}

fn default_shutdown_grace() -> u64 {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.index_path, PathBuf::from("./index.html"));
        assert_eq!(config.max_connections, None);
    }

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            ..Default::default()
        };
        let addr = config.socket_addr().unwrap();
        assert_eq!(addr.to_string(), "127.0.0.1:3000");
    }

    #[test]
    fn test_socket_addr_rejects_hostname() {
        let config = ServerConfig {
            host: "not an ip".to_string(),
            ..Default::default()
        };
        let expected = ValidationError::InvalidHost("not an ip".to_string());
        assert_eq!(config.socket_addr(), Err(expected.clone()));
        assert_eq!(config.validate(), Err(expected));
    }

    #[test]
    fn test_is_production() {
        let mut config = ServerConfig::default();
        assert!(!config.is_production());

        config.environment = Environment::Production;
        assert!(config.is_production());
    }

    #[test]
    fn test_validation_invalid_port() {
        let config = ServerConfig {
            port: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidPort));
    }

    #[test]
    fn test_validation_invalid_grace() {
        let config = ServerConfig {
            shutdown_grace_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidShutdownGrace));

        let config = ServerConfig {
            shutdown_grace_secs: 500,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidShutdownGrace));
    }

    #[test]
    fn test_validation_zero_connection_limit() {
        let config = ServerConfig {
            max_connections: Some(0),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidConnectionLimit));
    }

    #[test]
    fn test_shutdown_grace_duration() {
        let config = ServerConfig {
            shutdown_grace_secs: 12,
            ..Default::default()
        };
        assert_eq!(config.shutdown_grace(), Duration::from_secs(12));
    }
}
