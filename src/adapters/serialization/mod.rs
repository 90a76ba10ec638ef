//! Payload serializer adapters.

mod json;

pub use json::JsonPayloadSerializer;
