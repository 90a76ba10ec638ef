//! CaseStatus enum for the lifecycle of a case record.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a case record as reported by the case service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    #[default]
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl CaseStatus {
    /// Returns true once no further work is expected on the case.
    pub fn is_terminal(&self) -> bool {
        matches!(self, CaseStatus::Resolved | CaseStatus::Closed)
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CaseStatus::Open => "Open",
            CaseStatus::InProgress => "In Progress",
            CaseStatus::Resolved => "Resolved",
            CaseStatus::Closed => "Closed",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_open() {
        assert_eq!(CaseStatus::default(), CaseStatus::Open);
    }

    #[test]
    fn terminal_statuses() {
        assert!(!CaseStatus::Open.is_terminal());
        assert!(!CaseStatus::InProgress.is_terminal());
        assert!(CaseStatus::Resolved.is_terminal());
        assert!(CaseStatus::Closed.is_terminal());
    }

    #[test]
    fn serializes_as_snake_case() {
        let json = serde_json::to_string(&CaseStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
    }
}
