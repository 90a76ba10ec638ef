//! Case record as seen by the notification layer.
//!
//! Cases are owned and persisted by the case service. This module only
//! describes what the dispatcher reads from them: the case number for log
//! correlation, the optional assignee for per-user routing, and the
//! serialized form that travels as the notification payload.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, UserId, ValidationError};

use super::CaseStatus;

/// Read-only view of a case that can be announced to subscribers.
///
/// The case itself is the payload, so implementors must be serializable.
pub trait NotifiableCase: Serialize + Send + Sync {
    /// Human-facing case number, e.g. `C-1001`.
    fn case_number(&self) -> &str;

    /// User the case is assigned to, if any.
    fn assigned_user_id(&self) -> Option<UserId>;
}

/// Reference to the user a case is assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedUser {
    pub id: UserId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl AssignedUser {
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            display_name: None,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }
}

/// Case record snapshot.
///
/// # Invariants
///
/// - `case_number` is non-empty
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Case {
    case_number: String,
    title: String,
    status: CaseStatus,
    assigned_to: Option<AssignedUser>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Case {
    /// Create a new open, unassigned case.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the case number is blank
    pub fn new(case_number: impl Into<String>, title: impl Into<String>) -> Result<Self, ValidationError> {
        let case_number = case_number.into();
        if case_number.trim().is_empty() {
            return Err(ValidationError::empty_field("case_number"));
        }

        let now = Timestamp::now();
        Ok(Self {
            case_number,
            title: title.into(),
            status: CaseStatus::Open,
            assigned_to: None,
            created_at: now,
            updated_at: now,
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn status(&self) -> CaseStatus {
        self.status
    }

    pub fn assigned_to(&self) -> Option<&AssignedUser> {
        self.assigned_to.as_ref()
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Assign the case, returning the previous assignee.
    pub fn assign(&mut self, user: AssignedUser) -> Option<AssignedUser> {
        self.updated_at = Timestamp::now();
        self.assigned_to.replace(user)
    }

    /// Remove the assignee, returning it.
    pub fn unassign(&mut self) -> Option<AssignedUser> {
        self.updated_at = Timestamp::now();
        self.assigned_to.take()
    }

    /// Move the case to a new status.
    pub fn set_status(&mut self, status: CaseStatus) {
        self.status = status;
        self.updated_at = Timestamp::now();
    }
}

impl NotifiableCase for Case {
    fn case_number(&self) -> &str {
        &self.case_number
    }

    fn assigned_user_id(&self) -> Option<UserId> {
        self.assigned_to.as_ref().map(|user| user.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_case_is_open_and_unassigned() {
        let case = Case::new("C-1001", "Broken login").unwrap();

        assert_eq!(case.case_number(), "C-1001");
        assert_eq!(case.status(), CaseStatus::Open);
        assert!(case.assigned_user_id().is_none());
        assert_eq!(case.created_at(), case.updated_at());
    }

    #[test]
    fn new_case_rejects_blank_case_number() {
        let err = Case::new("   ", "Untitled").unwrap_err();
        assert_eq!(err, ValidationError::empty_field("case_number"));
    }

    #[test]
    fn assign_sets_assigned_user_id() {
        let mut case = Case::new("C-1002", "Refund request").unwrap();

        let previous = case.assign(AssignedUser::new(UserId::new(7)));

        assert!(previous.is_none());
        assert_eq!(case.assigned_user_id(), Some(UserId::new(7)));
    }

    #[test]
    fn reassign_returns_previous_assignee() {
        let mut case = Case::new("C-1003", "Escalation").unwrap();
        case.assign(AssignedUser::new(UserId::new(7)));

        let previous = case.assign(AssignedUser::new(UserId::new(42)));

        assert_eq!(previous.map(|u| u.id), Some(UserId::new(7)));
        assert_eq!(case.assigned_user_id(), Some(UserId::new(42)));
    }

    #[test]
    fn unassign_clears_assignee() {
        let mut case = Case::new("C-1004", "Follow-up").unwrap();
        case.assign(AssignedUser::new(UserId::new(7)));

        case.unassign();

        assert!(case.assigned_to().is_none());
    }

    #[test]
    fn set_status_updates_status() {
        let mut case = Case::new("C-1005", "Duplicate charge").unwrap();
        case.set_status(CaseStatus::Resolved);
        assert_eq!(case.status(), CaseStatus::Resolved);
    }

    #[test]
    fn serializes_in_camel_case_with_nested_assignee() {
        let mut case = Case::new("C-1002", "Refund request").unwrap();
        case.assign(AssignedUser::new(UserId::new(7)).with_display_name("Dana"));

        let json: serde_json::Value = serde_json::to_value(&case).unwrap();

        assert_eq!(json["caseNumber"], "C-1002");
        assert_eq!(json["assignedTo"]["id"], 7);
        assert_eq!(json["assignedTo"]["displayName"], "Dana");
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn unassigned_case_serializes_null_assignee() {
        let case = Case::new("C-1001", "Broken login").unwrap();

        let json: serde_json::Value = serde_json::to_value(&case).unwrap();

        assert!(json["assignedTo"].is_null());
    }
}
