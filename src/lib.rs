//! Case Notifications - Best-effort notification dispatch for case records
//!
//! Serializes payloads into small envelopes and hands them to a message
//! broker addressed by user queue, broadcast topic, or named channel.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
