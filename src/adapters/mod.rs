//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the dispatcher to external systems:
//! - `broker` - Message broker implementations (in-process, Redis, in-memory)
//! - `serialization` - Payload serializers (JSON)

pub mod broker;
pub mod serialization;

pub use broker::{
    connect_broker, InMemoryMessageBroker, InProcessBroker, RedisMessageBroker, SentMessage,
};
pub use serialization::JsonPayloadSerializer;
