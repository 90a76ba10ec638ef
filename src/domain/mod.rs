//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors)
//! - `case` - Case records as consumed by the notification layer
//! - `notification` - Envelopes, destinations, and event names

pub mod case;
pub mod foundation;
pub mod notification;
