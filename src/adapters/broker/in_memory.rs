//! In-memory message broker for testing.
//!
//! Records every envelope handed to it so tests can assert on destinations,
//! events, and ordering. Failures can be injected globally or per destination.
//!
//! # Security Note
//!
//! This adapter is for **testing only** and should not be used in production.
//! It uses `.expect()` on lock operations which will panic if locks are poisoned.
//! Production code should use the in-process or Redis broker.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use crate::domain::notification::NotificationEnvelope;
use crate::ports::{BrokerError, MessageBroker};

/// One successful send captured by [`InMemoryMessageBroker`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub destination: String,
    pub envelope: NotificationEnvelope,
}

/// Recording broker for tests.
///
/// Features:
/// - Captures successful sends in order
/// - Counts every send attempt, including failed ones
/// - Injectable failures for all destinations or a single one
///
/// # Panics
///
/// Methods may panic if internal locks are poisoned. This is acceptable
/// for test code but this adapter should NOT be used in production.
///
/// # Example
///
/// ```ignore
/// let broker = Arc::new(InMemoryMessageBroker::new());
/// let dispatcher = NotificationDispatcher::new(broker.clone());
///
/// dispatcher.broadcast("maintenance", &notice).await;
///
/// assert_eq!(broker.send_count(), 1);
/// assert!(broker.has_destination("/topic/notifications"));
/// ```
pub struct InMemoryMessageBroker {
    sent: RwLock<Vec<SentMessage>>,
    attempts: AtomicUsize,
    fail_all: RwLock<Option<BrokerError>>,
    fail_destinations: RwLock<HashMap<String, BrokerError>>,
}

impl InMemoryMessageBroker {
    /// Creates a broker that accepts every send.
    pub fn new() -> Self {
        Self {
            sent: RwLock::new(Vec::new()),
            attempts: AtomicUsize::new(0),
            fail_all: RwLock::new(None),
            fail_destinations: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a broker that rejects every send with `error`.
    pub fn failing(error: BrokerError) -> Self {
        let broker = Self::new();
        broker.fail_all_with(Some(error));
        broker
    }

    // === Failure Injection ===

    /// Sets or clears the failure returned for every destination.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn fail_all_with(&self, error: Option<BrokerError>) {
        *self
            .fail_all
            .write()
            .expect("InMemoryMessageBroker: fail_all write lock poisoned") = error;
    }

    /// Makes sends to one destination fail with `error`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn fail_destination(&self, destination: impl Into<String>, error: BrokerError) {
        self.fail_destinations
            .write()
            .expect("InMemoryMessageBroker: fail_destinations write lock poisoned")
            .insert(destination.into(), error);
    }

    // === Test Helpers ===

    /// Returns all successful sends in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn sent_messages(&self) -> Vec<SentMessage> {
        self.sent
            .read()
            .expect("InMemoryMessageBroker: sent lock poisoned")
            .clone()
    }

    /// Returns successful sends to one destination.
    pub fn sent_to(&self, destination: &str) -> Vec<SentMessage> {
        self.sent_messages()
            .into_iter()
            .filter(|m| m.destination == destination)
            .collect()
    }

    /// Returns the destinations of successful sends, in order.
    pub fn destinations(&self) -> Vec<String> {
        self.sent_messages()
            .into_iter()
            .map(|m| m.destination)
            .collect()
    }

    /// Checks whether anything was delivered to `destination`.
    pub fn has_destination(&self, destination: &str) -> bool {
        !self.sent_to(destination).is_empty()
    }

    /// Returns count of successful sends.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn send_count(&self) -> usize {
        self.sent
            .read()
            .expect("InMemoryMessageBroker: sent lock poisoned")
            .len()
    }

    /// Returns count of send calls, failed ones included.
    pub fn attempt_count(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Clears captured sends and the attempt counter (for test isolation).
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn clear(&self) {
        self.sent
            .write()
            .expect("InMemoryMessageBroker: sent write lock poisoned")
            .clear();
        self.attempts.store(0, Ordering::SeqCst);
    }

    fn injected_failure(&self, destination: &str) -> Option<BrokerError> {
        if let Some(error) = self
            .fail_all
            .read()
            .expect("InMemoryMessageBroker: fail_all lock poisoned")
            .clone()
        {
            return Some(error);
        }
        self.fail_destinations
            .read()
            .expect("InMemoryMessageBroker: fail_destinations lock poisoned")
            .get(destination)
            .cloned()
    }
}

impl Default for InMemoryMessageBroker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageBroker for InMemoryMessageBroker {
    async fn send(&self, destination: &str, envelope: &NotificationEnvelope) -> Result<(), BrokerError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        if let Some(error) = self.injected_failure(destination) {
            return Err(error);
        }

        self.sent
            .write()
            .expect("InMemoryMessageBroker: sent write lock poisoned")
            .push(SentMessage {
                destination: destination.to_string(),
                envelope: envelope.clone(),
            });
        Ok(())
    }
}
