//! Notification domain module.
//!
//! Value types shared by the dispatcher and the broker adapters:
//!
//! - `NotificationEnvelope` - event name, serialized payload, timestamp
//! - `Destination` - user queue, broadcast topic, or named channel
//! - event and channel names for case notifications

mod destination;
mod envelope;
pub mod events;

pub use destination::{Destination, BROADCAST_TOPIC};
pub use envelope::{next_envelope_millis, EnvelopeClock, NotificationEnvelope};
