//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `MessageBroker` - Delivers an envelope to a destination
//! - `PayloadSerializer` - Turns a domain object into the envelope payload

mod message_broker;
mod payload_serializer;

pub use message_broker::{BrokerError, MessageBroker};
pub use payload_serializer::{PayloadSerializer, SerializationError};
