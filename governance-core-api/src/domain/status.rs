use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of change proposed against a governed entity table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "mutation_action", rename_all = "lowercase"))]
pub enum MutationAction {
    Create,
    Update,
    Delete,
}

impl MutationAction {
    /// Checks which snapshots must be present for this action.
    ///
    /// create: only `new_value`; update: both; delete: only `old_value`.
    pub fn check_snapshots(&self, has_old: bool, has_new: bool) -> Result<(), String> {
        let (old_expected, new_expected) = match self {
            MutationAction::Create => (false, true),
            MutationAction::Update => (true, true),
            MutationAction::Delete => (true, false),
        };
        if has_old != old_expected {
            return Err(format!(
                "{self} requires old_value to be {}",
                if old_expected { "present" } else { "null" }
            ));
        }
        if has_new != new_expected {
            return Err(format!(
                "{self} requires new_value to be {}",
                if new_expected { "present" } else { "null" }
            ));
        }
        Ok(())
    }
}

impl fmt::Display for MutationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MutationAction::Create => write!(f, "create"),
            MutationAction::Update => write!(f, "update"),
            MutationAction::Delete => write!(f, "delete"),
        }
    }
}

impl FromStr for MutationAction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(MutationAction::Create),
            "update" => Ok(MutationAction::Update),
            "delete" => Ok(MutationAction::Delete),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "approval_status", rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ApprovalStatus::Pending)
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApprovalStatus::Pending => write!(f, "PENDING"),
            ApprovalStatus::Approved => write!(f, "APPROVED"),
            ApprovalStatus::Rejected => write!(f, "REJECTED"),
        }
    }
}

impl FromStr for ApprovalStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(ApprovalStatus::Pending),
            "APPROVED" => Ok(ApprovalStatus::Approved),
            "REJECTED" => Ok(ApprovalStatus::Rejected),
            _ => Err(()),
        }
    }
}

/// Status of one per-application task of an access request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "task_status", rename_all = "PascalCase"))]
pub enum TaskStatus {
    /// Waiting on the approver at the current slot.
    Pending,
    /// Chain complete, handed to the fulfilment group.
    Assigned,
    InProgress,
    Resolved,
    Closed,
    Rejected,
}

impl TaskStatus {
    /// Still waiting on an approver or on fulfilment.
    pub fn is_open(&self) -> bool {
        matches!(
            self,
            TaskStatus::Pending | TaskStatus::Assigned | TaskStatus::InProgress
        )
    }

    pub fn is_granted(&self) -> bool {
        matches!(self, TaskStatus::Resolved | TaskStatus::Closed)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Pending => write!(f, "Pending"),
            TaskStatus::Assigned => write!(f, "Assigned"),
            TaskStatus::InProgress => write!(f, "InProgress"),
            TaskStatus::Resolved => write!(f, "Resolved"),
            TaskStatus::Closed => write!(f, "Closed"),
            TaskStatus::Rejected => write!(f, "Rejected"),
        }
    }
}

impl FromStr for TaskStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(TaskStatus::Pending),
            "Assigned" => Ok(TaskStatus::Assigned),
            "InProgress" => Ok(TaskStatus::InProgress),
            "Resolved" => Ok(TaskStatus::Resolved),
            "Closed" => Ok(TaskStatus::Closed),
            "Rejected" => Ok(TaskStatus::Rejected),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "user_request_status", rename_all = "PascalCase"))]
pub enum UserRequestStatus {
    Pending,
    Approved,
    Rejected,
    Partial,
}

impl UserRequestStatus {
    /// Aggregate status of an access request, a pure function of its task statuses.
    ///
    /// Any open task keeps the request Pending. Once every task is terminal the
    /// request is Approved (all granted), Rejected (all rejected) or Partial.
    pub fn from_task_statuses<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = TaskStatus>,
    {
        let mut granted = 0usize;
        let mut rejected = 0usize;
        for status in statuses {
            if status.is_open() {
                return UserRequestStatus::Pending;
            }
            if status.is_granted() {
                granted += 1;
            } else {
                rejected += 1;
            }
        }
        match (granted, rejected) {
            (0, 0) => UserRequestStatus::Pending,
            (_, 0) => UserRequestStatus::Approved,
            (0, _) => UserRequestStatus::Rejected,
            _ => UserRequestStatus::Partial,
        }
    }
}

impl fmt::Display for UserRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRequestStatus::Pending => write!(f, "Pending"),
            UserRequestStatus::Approved => write!(f, "Approved"),
            UserRequestStatus::Rejected => write!(f, "Rejected"),
            UserRequestStatus::Partial => write!(f, "Partial"),
        }
    }
}

/// Verb recorded on an activity log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "activity_action", rename_all = "lowercase"))]
pub enum ActivityAction {
    Create,
    Update,
    Delete,
    Approve,
    Reject,
    Transition,
}

impl From<MutationAction> for ActivityAction {
    fn from(action: MutationAction) -> Self {
        match action {
            MutationAction::Create => ActivityAction::Create,
            MutationAction::Update => ActivityAction::Update,
            MutationAction::Delete => ActivityAction::Delete,
        }
    }
}

impl fmt::Display for ActivityAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivityAction::Create => write!(f, "create"),
            ActivityAction::Update => write!(f, "update"),
            ActivityAction::Delete => write!(f, "delete"),
            ActivityAction::Approve => write!(f, "approve"),
            ActivityAction::Reject => write!(f, "reject"),
            ActivityAction::Transition => write!(f, "transition"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_invariant() {
        assert!(MutationAction::Create.check_snapshots(false, true).is_ok());
        assert!(MutationAction::Create.check_snapshots(true, true).is_err());
        assert!(MutationAction::Update.check_snapshots(true, true).is_ok());
        assert!(MutationAction::Update.check_snapshots(false, true).is_err());
        assert!(MutationAction::Delete.check_snapshots(true, false).is_ok());
        assert!(MutationAction::Delete.check_snapshots(true, true).is_err());
        assert!(MutationAction::Delete.check_snapshots(false, false).is_err());
    }

    #[test]
    fn test_aggregate_status() {
        use TaskStatus::*;
        assert_eq!(
            UserRequestStatus::from_task_statuses([Closed, Resolved]),
            UserRequestStatus::Approved
        );
        assert_eq!(
            UserRequestStatus::from_task_statuses([Rejected, Rejected]),
            UserRequestStatus::Rejected
        );
        assert_eq!(
            UserRequestStatus::from_task_statuses([Closed, Rejected]),
            UserRequestStatus::Partial
        );
        assert_eq!(
            UserRequestStatus::from_task_statuses([Rejected, Assigned]),
            UserRequestStatus::Pending
        );
        assert_eq!(
            UserRequestStatus::from_task_statuses([InProgress, Closed]),
            UserRequestStatus::Pending
        );
    }

    #[test]
    fn test_approval_status_wire_format() {
        assert_eq!(serde_json::to_string(&ApprovalStatus::Pending).unwrap(), "\"PENDING\"");
        assert_eq!("REJECTED".parse::<ApprovalStatus>(), Ok(ApprovalStatus::Rejected));
        assert_eq!(serde_json::to_string(&MutationAction::Delete).unwrap(), "\"delete\"");
    }
}
