//! Message broker adapters.
//!
//! - `InProcessBroker` - Broadcast fan-out inside this process
//! - `RedisMessageBroker` - Redis pub/sub for multi-server deployments
//! - `InMemoryMessageBroker` - Recording broker for tests

mod in_memory;
mod in_process;
mod redis;

pub use in_memory::{InMemoryMessageBroker, SentMessage};
pub use in_process::InProcessBroker;
pub use redis::RedisMessageBroker;

use std::sync::Arc;

use crate::config::{AppConfig, BrokerKind};
use crate::ports::{BrokerError, MessageBroker};

/// Build the broker selected by `config.notifications.broker`.
///
/// # Errors
///
/// - `Unavailable` if the Redis broker is selected and cannot be reached
pub async fn connect_broker(config: &AppConfig) -> Result<Arc<dyn MessageBroker>, BrokerError> {
    match config.notifications.broker {
        BrokerKind::InProcess => {
            tracing::info!(
                channel_capacity = config.notifications.channel_capacity,
                "Using in-process message broker"
            );
            Ok(Arc::new(InProcessBroker::new(
                config.notifications.channel_capacity,
            )))
        }
        BrokerKind::Redis => {
            let broker = RedisMessageBroker::connect(&config.redis).await?;
            Ok(Arc::new(broker))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RedisConfig;

    #[tokio::test]
    async fn default_config_builds_in_process_broker() {
        let broker = connect_broker(&AppConfig::default()).await;
        assert!(broker.is_ok());
    }

    #[tokio::test]
    async fn redis_config_with_bad_url_is_unavailable() {
        let mut config = AppConfig::default();
        config.notifications.broker = BrokerKind::Redis;
        config.redis = RedisConfig {
            url: "nonsense".to_string(),
            ..Default::default()
        };

        let result = connect_broker(&config).await;

        assert!(matches!(result, Err(BrokerError::Unavailable(_))));
    }
}
