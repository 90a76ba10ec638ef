//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `CASE_NOTIFY` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use case_notifications::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Broker: {:?}", config.notifications.broker);
//! ```

mod error;
mod logging;
mod notifications;
mod redis;

pub use error::{ConfigError, ValidationError};
pub use logging::LoggingConfig;
pub use notifications::{BrokerKind, NotificationConfig};
pub use redis::RedisConfig;

use serde::Deserialize;

/// Root configuration
///
/// Every section has defaults, so an empty environment yields an enabled
/// dispatcher on the in-process broker.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Dispatch behaviour and broker selection
    #[serde(default)]
    pub notifications: NotificationConfig,

    /// Redis connection (required when `notifications.broker = redis`)
    #[serde(default)]
    pub redis: RedisConfig,

    /// Log filter and output format
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `CASE_NOTIFY` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `CASE_NOTIFY__NOTIFICATIONS__BROKER=redis` -> `notifications.broker = redis`
    /// - `CASE_NOTIFY__REDIS__URL=...` -> `redis.url = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CASE_NOTIFY")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// Redis settings are only checked when the Redis broker is selected.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.notifications.validate()?;
        if self.notifications.broker == BrokerKind::Redis {
            self.redis.validate()?;
        }
        self.logging.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "CASE_NOTIFY__NOTIFICATIONS__ENABLED",
        "CASE_NOTIFY__NOTIFICATIONS__BROKER",
        "CASE_NOTIFY__NOTIFICATIONS__CHANNEL_CAPACITY",
        "CASE_NOTIFY__REDIS__URL",
        "CASE_NOTIFY__LOGGING__LEVEL",
        "CASE_NOTIFY__LOGGING__JSON",
    ];

    /// Helper to clear environment variables after testing
    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_defaults_from_empty_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert!(config.notifications.enabled);
        assert_eq!(config.notifications.broker, BrokerKind::InProcess);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_redis_broker_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("CASE_NOTIFY__NOTIFICATIONS__BROKER", "redis");
        env::set_var("CASE_NOTIFY__REDIS__URL", "redis://localhost:6379");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.notifications.broker, BrokerKind::Redis);
        assert_eq!(config.redis.url, "redis://localhost:6379");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_redis_broker_without_url_fails_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("CASE_NOTIFY__NOTIFICATIONS__BROKER", "redis");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("REDIS_URL"))
        );
    }

    #[test]
    fn test_disabled_notifications() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("CASE_NOTIFY__NOTIFICATIONS__ENABLED", "false");
        env::set_var("CASE_NOTIFY__NOTIFICATIONS__CHANNEL_CAPACITY", "32");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(!config.notifications.enabled);
        assert_eq!(config.notifications.channel_capacity, 32);
    }

    #[test]
    fn test_in_process_broker_ignores_redis_settings() {
        let config = AppConfig {
            redis: RedisConfig {
                url: "not-a-url".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
