use governance_core_api::{ActorId, EntityChange};
use governance_core_db::models::access::{TaskModel, UserRequestModel};
use governance_core_db::models::approval::ApprovalRequestModel;

/// Result of a successful `approve`.
#[derive(Debug, Clone, PartialEq)]
pub enum ApprovalOutcome {
    /// Chain pointer moved on; the request is still PENDING.
    Advanced {
        request: ApprovalRequestModel,
        next_approver: ActorId,
    },
    /// Last slot approved; the staged diff was applied.
    Committed {
        request: ApprovalRequestModel,
        changes: Vec<EntityChange>,
    },
}

impl ApprovalOutcome {
    pub fn request(&self) -> &ApprovalRequestModel {
        match self {
            ApprovalOutcome::Advanced { request, .. } | ApprovalOutcome::Committed { request, .. } => {
                request
            }
        }
    }

    /// Entity rows touched by this call, empty unless committed.
    pub fn changes(&self) -> &[EntityChange] {
        match self {
            ApprovalOutcome::Advanced { .. } => &[],
            ApprovalOutcome::Committed { changes, .. } => changes,
        }
    }
}

/// A user request together with its tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessRequestView {
    pub user_request: UserRequestModel,
    pub tasks: Vec<TaskModel>,
}

/// A task after a transition, with the recomputed parent request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskTransition {
    pub task: TaskModel,
    pub user_request: UserRequestModel,
}
