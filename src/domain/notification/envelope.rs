//! Notification envelope and the clock that stamps it.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicI64, Ordering};

use crate::domain::foundation::Timestamp;

/// Issues millisecond timestamps that never go below one already issued.
#[derive(Debug)]
pub struct EnvelopeClock {
    last_issued: AtomicI64,
}

impl EnvelopeClock {
    pub const fn new() -> Self {
        Self {
            last_issued: AtomicI64::new(i64::MIN),
        }
    }

    /// Stamps a wall-clock reading. A reading older than the last issued
    /// value yields the last issued value again.
    pub fn issue(&self, now_millis: i64) -> i64 {
        let previous = self.last_issued.fetch_max(now_millis, Ordering::AcqRel);
        previous.max(now_millis)
    }
}

impl Default for EnvelopeClock {
    fn default() -> Self {
        Self::new()
    }
}

static ENVELOPE_CLOCK: EnvelopeClock = EnvelopeClock::new();

/// Returns the current Unix time in milliseconds, never lower than any value
/// previously returned in this process.
pub fn next_envelope_millis() -> i64 {
    ENVELOPE_CLOCK.issue(Timestamp::now().as_unix_millis())
}

/// Message handed to the broker for a single dispatch.
///
/// Built per call and dropped once the send returns. `payload` already holds
/// the serialized domain object, so subscribers decode it a second time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationEnvelope {
    /// Notification type, e.g. `case.created`.
    pub event: String,

    /// Serialized domain object.
    pub payload: String,

    /// Milliseconds since the Unix epoch at construction time.
    pub timestamp: i64,
}

impl NotificationEnvelope {
    /// Wraps an already serialized payload, stamping it with the envelope clock.
    pub fn new(event: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            payload: payload.into(),
            timestamp: next_envelope_millis(),
        }
    }

    /// Returns the construction time as a [`Timestamp`].
    pub fn occurred_at(&self) -> Option<Timestamp> {
        Timestamp::from_unix_millis(self.timestamp)
    }
}
