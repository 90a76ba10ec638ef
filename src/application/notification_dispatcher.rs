//! NotificationDispatcher - Best-effort delivery of case notifications.
//!
//! Business services call the dispatcher after the case record is already
//! persisted. A failed notification must never fail the triggering action,
//! so every public operation returns `()`: serialization and transport
//! errors are logged and dropped. Nothing is retried or queued.

use std::sync::Arc;

use serde::Serialize;
use tracing::Instrument;

use crate::adapters::JsonPayloadSerializer;
use crate::config::NotificationConfig;
use crate::domain::case::NotifiableCase;
use crate::domain::foundation::{DomainError, UserId};
use crate::domain::notification::events::{CASES_CHANNEL, CASE_ASSIGNED, CASE_CREATED, CASE_UPDATED};
use crate::domain::notification::{Destination, NotificationEnvelope};
use crate::ports::{BrokerError, MessageBroker, PayloadSerializer, SerializationError};

/// Why a single dispatch did not reach the broker.
///
/// Only ever logged; it does not leave the dispatcher.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error(transparent)]
    Serialization(#[from] SerializationError),

    #[error(transparent)]
    Broker(#[from] BrokerError),
}

impl From<NotificationError> for DomainError {
    fn from(err: NotificationError) -> Self {
        match err {
            NotificationError::Serialization(e) => e.into(),
            NotificationError::Broker(e) => e.into(),
        }
    }
}

/// Translates domain events into broker sends.
///
/// Stateless apart from its injected collaborators, so one instance can be
/// shared behind an `Arc` by any number of concurrent callers.
///
/// # Example
///
/// ```ignore
/// let dispatcher = NotificationDispatcher::new(broker);
///
/// repository.save(&case).await?;
/// dispatcher.notify_new_case(&case).await;
/// ```
pub struct NotificationDispatcher<S = JsonPayloadSerializer> {
    broker: Arc<dyn MessageBroker>,
    serializer: S,
    enabled: bool,
}

impl NotificationDispatcher<JsonPayloadSerializer> {
    /// Create an enabled dispatcher that serializes payloads as JSON.
    pub fn new(broker: Arc<dyn MessageBroker>) -> Self {
        Self::with_serializer(broker, JsonPayloadSerializer::new())
    }

    /// Create a JSON dispatcher honouring `config.enabled`.
    pub fn from_config(broker: Arc<dyn MessageBroker>, config: &NotificationConfig) -> Self {
        Self::new(broker).with_enabled(config.enabled)
    }
}

impl<S: PayloadSerializer> NotificationDispatcher<S> {
    /// Create an enabled dispatcher with a custom serializer.
    pub fn with_serializer(broker: Arc<dyn MessageBroker>, serializer: S) -> Self {
        Self {
            broker,
            serializer,
            enabled: true,
        }
    }

    /// Turn dispatch on or off. A disabled dispatcher never touches the
    /// serializer or the broker.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Addressing
    // ─────────────────────────────────────────────────────────────────────────

    /// Send to one user's private queue, `/user/{userId}/queue/notifications`.
    ///
    /// The user is not checked for existence.
    pub async fn send_to_user<T>(&self, user_id: UserId, event: &str, payload: &T)
    where
        T: Serialize + ?Sized + Sync,
    {
        self.dispatch(Destination::user(user_id), event, payload).await;
    }

    /// Send to every subscriber of `/topic/notifications`.
    pub async fn broadcast<T>(&self, event: &str, payload: &T)
    where
        T: Serialize + ?Sized + Sync,
    {
        self.dispatch(Destination::Broadcast, event, payload).await;
    }

    /// Send to the named topic, `/topic/{channel}`.
    pub async fn send_to_channel<T>(&self, channel: &str, event: &str, payload: &T)
    where
        T: Serialize + ?Sized + Sync,
    {
        self.dispatch(Destination::channel(channel), event, payload).await;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Case events
    // ─────────────────────────────────────────────────────────────────────────

    /// Announce a new case on the `cases` channel, then tell the assignee.
    ///
    /// The assignee send happens even if the channel send failed.
    pub async fn notify_new_case<C: NotifiableCase>(&self, case: &C) {
        let span = tracing::debug_span!("notify_new_case", case_number = case.case_number());

        async {
            tracing::debug!("Dispatching new case notifications");
            self.send_to_channel(CASES_CHANNEL, CASE_CREATED, case).await;
            if let Some(user_id) = case.assigned_user_id() {
                self.send_to_user(user_id, CASE_ASSIGNED, case).await;
            }
        }
        .instrument(span)
        .await
    }

    /// Announce a case update on the `cases` channel, then tell the assignee.
    pub async fn notify_case_update<C: NotifiableCase>(&self, case: &C) {
        let span = tracing::debug_span!("notify_case_update", case_number = case.case_number());

        async {
            tracing::debug!("Dispatching case update notifications");
            self.send_to_channel(CASES_CHANNEL, CASE_UPDATED, case).await;
            if let Some(user_id) = case.assigned_user_id() {
                self.send_to_user(user_id, CASE_UPDATED, case).await;
            }
        }
        .instrument(span)
        .await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Private helpers
    // ─────────────────────────────────────────────────────────────────────────

    /// Catch boundary: every failure ends here.
    async fn dispatch<T>(&self, destination: Destination, event: &str, payload: &T)
    where
        T: Serialize + ?Sized + Sync,
    {
        if !self.enabled {
            tracing::debug!(
                destination = %destination,
                event,
                "Notifications disabled, skipping dispatch"
            );
            return;
        }

        match self.try_dispatch(&destination, event, payload).await {
            Ok(()) => {
                tracing::debug!(destination = %destination, event, "Notification sent");
            }
            Err(NotificationError::Serialization(e)) => {
                tracing::warn!(
                    recipient = %destination.target(),
                    event,
                    error = %e,
                    "Failed to serialize notification payload, not sending"
                );
            }
            Err(NotificationError::Broker(e)) => {
                tracing::warn!(
                    recipient = %destination.target(),
                    destination = %destination,
                    event,
                    error = %e,
                    "Failed to send notification"
                );
            }
        }
    }

    async fn try_dispatch<T>(
        &self,
        destination: &Destination,
        event: &str,
        payload: &T,
    ) -> Result<(), NotificationError>
    where
        T: Serialize + ?Sized + Sync,
    {
        let payload = self.serializer.serialize(payload)?;
        let envelope = NotificationEnvelope::new(event, payload);
        self.broker.send(&destination.address(), &envelope).await?;
        Ok(())
    }
}
