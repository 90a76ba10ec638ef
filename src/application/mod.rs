//! Application layer - Services invoked by the case-management backend.
//!
//! Coordinates the domain with the broker and serializer ports.

mod notification_dispatcher;

pub use notification_dispatcher::{NotificationDispatcher, NotificationError};
