//! Redis pub/sub broker for multi-server deployments.
//!
//! Each envelope is published as JSON on the Redis channel whose name is the
//! destination address, e.g. `PUBLISH /topic/cases {"event":...}`. Gateways
//! holding the WebSocket sessions subscribe to the addresses they serve.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;

use crate::config::RedisConfig;
use crate::domain::notification::NotificationEnvelope;
use crate::ports::{BrokerError, MessageBroker};

/// Redis-backed broker.
///
/// Cheap to clone; all clones share one multiplexed connection.
#[derive(Clone)]
pub struct RedisMessageBroker {
    conn: MultiplexedConnection,
}

impl RedisMessageBroker {
    /// Wrap an existing connection.
    pub fn new(conn: MultiplexedConnection) -> Self {
        Self { conn }
    }

    /// Open a multiplexed connection using `config`.
    ///
    /// # Errors
    ///
    /// - `Unavailable` if the URL is invalid, the server refuses the
    ///   connection, or it does not answer within `timeout_secs`
    pub async fn connect(config: &RedisConfig) -> Result<Self, BrokerError> {
        let client = redis::Client::open(config.url.as_str())
            .map_err(|e| BrokerError::Unavailable(e.to_string()))?;

        let conn = tokio::time::timeout(config.timeout(), client.get_multiplexed_tokio_connection())
            .await
            .map_err(|_| {
                BrokerError::Unavailable(format!(
                    "Redis connection timed out after {}s",
                    config.timeout_secs
                ))
            })?
            .map_err(|e| BrokerError::Unavailable(e.to_string()))?;

        tracing::info!("Connected to Redis message broker");
        Ok(Self::new(conn))
    }
}

/// Encode an envelope for the wire.
fn encode(envelope: &NotificationEnvelope) -> Result<String, BrokerError> {
    serde_json::to_string(envelope).map_err(|e| BrokerError::Rejected(e.to_string()))
}

#[async_trait]
impl MessageBroker for RedisMessageBroker {
    async fn send(&self, destination: &str, envelope: &NotificationEnvelope) -> Result<(), BrokerError> {
        let message = encode(envelope)?;

        let mut conn = self.conn.clone();
        let receivers: i64 = conn
            .publish(destination, message)
            .await
            .map_err(|e: redis::RedisError| BrokerError::Unavailable(e.to_string()))?;

        tracing::trace!(destination, receivers, "Published notification to Redis");
        Ok(())
    }
}
