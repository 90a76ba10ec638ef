//! PayloadSerializer port - Converts domain objects into envelope payloads.

use serde::Serialize;

use crate::domain::foundation::{DomainError, ErrorCode};

/// The payload could not be represented in wire form
/// (unsupported type, non-string map key, failing `Serialize` impl).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Payload serialization failed: {reason}")]
pub struct SerializationError {
    pub reason: String,
}

impl SerializationError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl From<SerializationError> for DomainError {
    fn from(err: SerializationError) -> Self {
        DomainError::new(ErrorCode::SerializationFailed, err.to_string())
    }
}

/// Port for serializing arbitrary payloads to their wire string.
///
/// Generic over the payload, so the dispatcher takes it as a type parameter
/// rather than a trait object.
pub trait PayloadSerializer: Send + Sync {
    fn serialize<T: Serialize + ?Sized>(&self, payload: &T) -> Result<String, SerializationError>;
}
