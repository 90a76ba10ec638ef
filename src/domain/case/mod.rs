//! Case domain module.
//!
//! Case records are created and updated by the case service; this crate
//! consumes them only to announce those changes to subscribers.

mod aggregate;
mod status;

pub use aggregate::{AssignedUser, Case, NotifiableCase};
pub use status::CaseStatus;
