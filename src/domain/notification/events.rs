//! Event and channel names published for case records.

/// Channel that receives every case lifecycle notification.
pub const CASES_CHANNEL: &str = "cases";

/// A case was created.
pub const CASE_CREATED: &str = "case.created";

/// A newly created case was assigned to the receiving user.
pub const CASE_ASSIGNED: &str = "case.assigned";

/// A case was updated. Used for both the channel and the assignee.
pub const CASE_UPDATED: &str = "case.updated";
