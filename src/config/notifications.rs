//! Notification dispatch configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Which broker adapter backs the dispatcher.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum BrokerKind {
    /// Fan out to subscribers inside this process.
    #[default]
    InProcess,
    /// Publish on Redis pub/sub channels named after the destination.
    Redis,
}

/// Notification dispatch configuration
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationConfig {
    /// When false every dispatch is a no-op
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Broker adapter selection
    #[serde(default)]
    pub broker: BrokerKind,

    /// Per-destination buffer for the in-process broker
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl NotificationConfig {
    /// Validate notification configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.channel_capacity == 0 {
            return Err(ValidationError::InvalidChannelCapacity);
        }
        Ok(())
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            broker: BrokerKind::default(),
            channel_capacity: default_channel_capacity(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_channel_capacity() -> usize {
    128
}
