//! Visitor counter configuration.
//!
//! Values come from `VISITOR_COUNTER__*` environment variables, with a
//! `.env` file picked up in development. Sections nest with `__`, so
//! `VISITOR_COUNTER__SERVER__PORT` sets `server.port`.
//!
//! Everything has a default. With no variables set the server listens on
//! `0.0.0.0:3000`, keeps its visitor log in an in-memory SQLite database,
//! and serves `./index.html` at `/`.
//!
//! ```no_run
//! use visitor_counter::config::AppConfig;
//!
//! let config = AppConfig::load().expect("configuration should parse");
//! config.validate().expect("configuration should be valid");
//! assert_eq!(config.server.port, 3000);
//! ```

mod database;
mod error;
mod server;

pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// All configuration sections.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    /// Listener, landing page, logging and shutdown settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Visitor log location and pool sizing
    #[serde(default)]
    pub database: DatabaseConfig,
}

impl AppConfig {
    /// Read configuration from the environment.
    ///
    /// | Variable                                  | Field                      |
    /// |-------------------------------------------|----------------------------|
    /// | `VISITOR_COUNTER__SERVER__HOST`           | `server.host`              |
    /// | `VISITOR_COUNTER__SERVER__PORT`           | `server.port`              |
    /// | `VISITOR_COUNTER__SERVER__MAX_CONNECTIONS`| `server.max_connections`   |
    /// | `VISITOR_COUNTER__DATABASE__URL`          | `database.url`             |
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a variable cannot be parsed into its field.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("VISITOR_COUNTER")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Check every section. Run before binding or opening the store.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Process environment is shared by every test thread.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const VARS: [&str; 4] = [
        "VISITOR_COUNTER__SERVER__PORT",
        "VISITOR_COUNTER__SERVER__ENVIRONMENT",
        "VISITOR_COUNTER__SERVER__MAX_CONNECTIONS",
        "VISITOR_COUNTER__DATABASE__URL",
    ];

    /// Load with exactly `vars` set among the variables these tests touch.
    fn load_with(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        for name in VARS {
            env::remove_var(name);
        }
        for (name, value) in vars {
            env::set_var(name, value);
        }
        let loaded = AppConfig::load();
        for (name, _) in vars {
            env::remove_var(name);
        }
        loaded
    }

    #[test]
    fn empty_environment_yields_valid_defaults() {
        let config = load_with(&[]).unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.max_connections, None);
        assert_eq!(config.database.url, "sqlite::memory:");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn nested_variables_override_defaults() {
        let config = load_with(&[
            ("VISITOR_COUNTER__SERVER__PORT", "8080"),
            ("VISITOR_COUNTER__DATABASE__URL", "sqlite://visitors.db"),
        ])
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.url, "sqlite://visitors.db");
    }

    #[test]
    fn production_environment_is_detected() {
        let config = load_with(&[("VISITOR_COUNTER__SERVER__ENVIRONMENT", "production")]).unwrap();

        assert!(config.is_production());
    }

    #[test]
    fn connection_limit_is_read_as_number() {
        let config = load_with(&[("VISITOR_COUNTER__SERVER__MAX_CONNECTIONS", "50")]).unwrap();

        assert_eq!(config.server.max_connections, Some(50));
    }

    #[test]
    fn unparsable_port_fails_to_load() {
        let result = load_with(&[("VISITOR_COUNTER__SERVER__PORT", "not-a-port")]);

        assert!(result.is_err());
    }

    #[test]
    fn validate_reports_first_bad_section() {
        let mut config = AppConfig::default();
        config.database.url = "mysql://localhost".to_string();

        assert_eq!(config.validate(), Err(ValidationError::InvalidDatabaseUrl));
    }
}
