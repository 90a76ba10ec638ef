//! MessageBroker port - Interface for handing envelopes to the messaging layer.
//!
//! The broker owns everything after the hand-off: subscription matching,
//! connection lifecycle, framing, and delivery guarantees. The dispatcher
//! only needs a way to put one envelope on one destination.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::notification::NotificationEnvelope;

/// Errors surfaced by a broker send.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BrokerError {
    /// Broker unreachable or connection dropped.
    #[error("Broker unavailable: {0}")]
    Unavailable(String),

    /// Broker refused the message.
    #[error("Broker rejected message: {0}")]
    Rejected(String),
}

impl From<BrokerError> for DomainError {
    fn from(err: BrokerError) -> Self {
        let code = match &err {
            BrokerError::Unavailable(_) => ErrorCode::BrokerUnavailable,
            BrokerError::Rejected(_) => ErrorCode::BrokerRejected,
        };
        DomainError::new(code, err.to_string())
    }
}

/// Port for delivering a notification envelope to a destination.
///
/// `destination` is the wire address (see `Destination::address`), passed
/// through unchanged so existing subscribers keep matching.
///
/// # Example
///
/// ```ignore
/// let envelope = NotificationEnvelope::new("case.created", payload);
/// broker.send("/topic/cases", &envelope).await?;
/// ```
#[async_trait]
pub trait MessageBroker: Send + Sync {
    /// Deliver one envelope to one destination.
    async fn send(&self, destination: &str, envelope: &NotificationEnvelope) -> Result<(), BrokerError>;
}
