use chrono::{DateTime, Utc};
use governance_core_api::{
    ActorId, ApplicationId, DepartmentId, PlantId, RoleId, TaskStatus,
};
use heapless::String as HeaplessString;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::auditable::Auditable;
use crate::models::identifiable::Identifiable;
use crate::utils::hash_as_i64;

/// # Documentation
/// One (application, role, plant) line of an access request.
///
/// - Routed through its own approver chain, resolved from the task's plant scope.
/// - After the last approval the task is handed to `fulfilment_role_id` and moves
///   through Assigned -> InProgress -> Resolved -> Closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskModel {
    pub id: Uuid,
    pub user_request_id: Uuid,

    pub application_id: ApplicationId,
    pub access_role_id: RoleId,
    pub plant_id: PlantId,
    pub department_id: Option<DepartmentId>,

    pub workflow_id: Uuid,
    pub approver_chain: Vec<ActorId>,
    pub current_slot: i16,
    pub fulfilment_role_id: Option<RoleId>,

    pub task_status: TaskStatus,
    pub justification: Option<HeaplessString<500>>,

    /// Actor behind the most recent transition
    pub last_actor: Option<ActorId>,
    pub comments: Option<HeaplessString<500>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub hash: i64,
}

impl TaskModel {
    pub fn current_approver(&self) -> Option<ActorId> {
        usize::try_from(self.current_slot)
            .ok()
            .and_then(|slot| self.approver_chain.get(slot).copied())
    }

    pub fn remaining_chain(&self) -> &[ActorId] {
        let start = usize::try_from(self.current_slot)
            .unwrap_or(0)
            .min(self.approver_chain.len());
        &self.approver_chain[start..]
    }

    pub fn is_last_slot(&self) -> bool {
        self.remaining_chain().len() == 1
    }

    pub fn rehash(&mut self) -> Result<i64, String> {
        self.hash = 0;
        self.hash = hash_as_i64(self)?;
        Ok(self.hash)
    }
}

impl Identifiable for TaskModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}

impl Auditable for TaskModel {
    fn audit_table_name(&self) -> &'static str {
        "task"
    }

    fn get_hash(&self) -> i64 {
        self.hash
    }
}
