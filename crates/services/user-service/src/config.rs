//! User service configuration.

use std::env;

use common::{DatabaseConfig, ServiceConfig};

/// User service configuration.
#[derive(Debug, Clone)]
pub struct UserServiceConfig {
    /// Service identity and logging
    pub service: ServiceConfig,
    /// Database connection settings
    pub database: DatabaseConfig,
}

impl UserServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let service_defaults = ServiceConfig::default();
        let db_defaults = DatabaseConfig::default();

        Self {
            service: ServiceConfig {
                service_name: env::var("USER_SERVICE_NAME")
                    .unwrap_or_else(|_| "user-service".to_string()),
                log_level: env::var("USER_SERVICE_LOG_LEVEL")
                    .unwrap_or(service_defaults.log_level),
            },
            database: DatabaseConfig {
                url: env::var("USER_SERVICE_DATABASE_URL")
                    .or_else(|_| env::var("DATABASE_URL"))
                    .unwrap_or(db_defaults.url),
                max_connections: env::var("USER_SERVICE_DB_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(db_defaults.max_connections),
                min_connections: env::var("USER_SERVICE_DB_MIN_CONNECTIONS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(db_defaults.min_connections),
            },
        }
    }
}

impl Default for UserServiceConfig {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                service_name: "user-service".to_string(),
                ..ServiceConfig::default()
            },
            database: DatabaseConfig::default(),
        }
    }
}
