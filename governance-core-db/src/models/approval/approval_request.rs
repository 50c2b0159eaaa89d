use chrono::{DateTime, Utc};
use governance_core_api::{
    ActorId, ApprovalStatus, DepartmentId, MutationAction, PlantId, RecordId,
};
use heapless::String as HeaplessString;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::models::auditable::Auditable;
use crate::models::identifiable::Identifiable;
use crate::utils::hash_as_i64;

/// # Documentation
/// A staged create/update/delete against a governed entity table.
///
/// - Holds the before/after snapshots instead of writing the entity row.
/// - The approver chain is resolved once, at staging time, and stored with the
///   request so later workflow edits do not reroute it.
/// - Status only moves PENDING -> APPROVED or PENDING -> REJECTED. Rows are never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalRequestModel {
    pub id: Uuid,

    /// Governed entity category, e.g. `plant`, `system`, `vendor`
    pub module: HeaplessString<50>,
    pub table_name: HeaplessString<50>,
    pub action: MutationAction,

    /// Target row; None for create until the commit assigns one
    pub record_id: Option<RecordId>,
    /// Snapshot before the change; None for create
    pub old_value: Option<Value>,
    /// Snapshot after the change; None for delete
    pub new_value: Option<Value>,

    pub requested_by: ActorId,
    pub status: ApprovalStatus,
    pub comments: Option<HeaplessString<500>>,
    pub created_at: DateTime<Utc>,

    /// Actor who took the final decision (approval or rejection)
    pub approved_by: Option<ActorId>,
    pub approved_at: Option<DateTime<Utc>>,
    pub approval_comments: Option<HeaplessString<500>>,

    pub workflow_id: Uuid,
    pub plant_id: Option<PlantId>,
    pub department_id: Option<DepartmentId>,

    /// Ordered approver identities, 1..=5 entries
    pub approver_chain: Vec<ActorId>,
    /// 0-based index of the approver whose decision is awaited
    pub current_slot: i16,

    /// Hash of the row with this field set to 0, used as the compare-and-swap token
    pub hash: i64,
}

impl ApprovalRequestModel {
    /// Approver whose decision is awaited, None once the chain is consumed.
    pub fn current_approver(&self) -> Option<ActorId> {
        usize::try_from(self.current_slot)
            .ok()
            .and_then(|slot| self.approver_chain.get(slot).copied())
    }

    /// Approvers that have not acted yet, current slot included.
    pub fn remaining_chain(&self) -> &[ActorId] {
        let start = usize::try_from(self.current_slot)
            .unwrap_or(0)
            .min(self.approver_chain.len());
        &self.approver_chain[start..]
    }

    pub fn is_last_slot(&self) -> bool {
        self.remaining_chain().len() == 1
    }

    /// Recomputes `hash` over the current field values.
    pub fn rehash(&mut self) -> Result<i64, String> {
        self.hash = 0;
        self.hash = hash_as_i64(self)?;
        Ok(self.hash)
    }
}

impl Identifiable for ApprovalRequestModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}

impl Auditable for ApprovalRequestModel {
    fn audit_table_name(&self) -> &'static str {
        "approval_request"
    }

    fn get_hash(&self) -> i64 {
        self.hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample(chain: Vec<ActorId>) -> ApprovalRequestModel {
        ApprovalRequestModel {
            id: Uuid::new_v4(),
            module: HeaplessString::try_from("plant").unwrap(),
            table_name: HeaplessString::try_from("plant").unwrap(),
            action: MutationAction::Create,
            record_id: None,
            old_value: None,
            new_value: Some(json!({"plant_name": "GOA-2"})),
            requested_by: 7,
            status: ApprovalStatus::Pending,
            comments: None,
            created_at: Utc::now(),
            approved_by: None,
            approved_at: None,
            approval_comments: None,
            workflow_id: Uuid::new_v4(),
            plant_id: None,
            department_id: None,
            approver_chain: chain,
            current_slot: 0,
            hash: 0,
        }
    }

    #[test]
    fn test_chain_pointer() {
        let mut request = sample(vec![11, 12]);
        assert_eq!(request.current_approver(), Some(11));
        assert_eq!(request.remaining_chain(), &[11, 12]);
        assert!(!request.is_last_slot());

        request.current_slot = 1;
        assert_eq!(request.current_approver(), Some(12));
        assert!(request.is_last_slot());

        request.current_slot = 2;
        assert_eq!(request.current_approver(), None);
        assert!(request.remaining_chain().is_empty());
    }

    #[test]
    fn test_rehash_tracks_content() {
        let mut request = sample(vec![3]);
        let first = request.rehash().unwrap();
        assert_ne!(first, 0);
        assert_eq!(request.clone().rehash().unwrap(), first);

        request.status = ApprovalStatus::Approved;
        assert_ne!(request.rehash().unwrap(), first);
    }
}
