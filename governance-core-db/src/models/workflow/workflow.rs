use governance_core_api::{ActorId, DepartmentId, PlantId, RoleId, Scope};
use heapless::String as HeaplessString;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::identifiable::Identifiable;

pub const MAX_APPROVER_SLOTS: usize = 5;

/// # Documentation
/// Approval routing configuration for one organizational scope.
///
/// - Scope is either plant (+ optional department) or a corporate category; exactly
///   one of `plant_id` / `category` is set.
/// - Administered outside the engine; the engine only reads it.
/// - At most one active workflow may match a scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowModel {
    pub id: Uuid,
    pub name: HeaplessString<100>,

    pub plant_id: Option<PlantId>,
    pub department_id: Option<DepartmentId>,
    pub category: Option<HeaplessString<50>>,

    pub approver_1: Option<ActorId>,
    pub approver_2: Option<ActorId>,
    pub approver_3: Option<ActorId>,
    pub approver_4: Option<ActorId>,
    pub approver_5: Option<ActorId>,

    /// Number of leading slots that take part in the chain
    pub max_approvers: i16,
    pub is_active: bool,

    /// Operator group that fulfils access-request tasks routed by this workflow
    pub fulfilment_role_id: Option<RoleId>,
}

impl WorkflowModel {
    pub fn approver_slots(&self) -> [Option<ActorId>; MAX_APPROVER_SLOTS] {
        [
            self.approver_1,
            self.approver_2,
            self.approver_3,
            self.approver_4,
            self.approver_5,
        ]
    }

    /// Ordered approver chain: the first `max_approvers` slots, empty slots skipped.
    pub fn chain(&self) -> Vec<ActorId> {
        let take = usize::try_from(self.max_approvers)
            .unwrap_or(0)
            .min(MAX_APPROVER_SLOTS);
        self.approver_slots()
            .into_iter()
            .take(take)
            .flatten()
            .collect()
    }

    pub fn matches(&self, scope: &Scope) -> bool {
        match scope {
            Scope::Plant {
                plant_id,
                department_id,
            } => {
                self.category.is_none()
                    && self.plant_id == Some(*plant_id)
                    && self.department_id == *department_id
            }
            Scope::Corporate { category } => {
                self.plant_id.is_none()
                    && self
                        .category
                        .as_ref()
                        .is_some_and(|c| c.as_str() == category.as_str())
            }
        }
    }
}

impl Identifiable for WorkflowModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plant_workflow(plant_id: PlantId, department_id: Option<DepartmentId>) -> WorkflowModel {
        WorkflowModel {
            id: Uuid::new_v4(),
            name: HeaplessString::try_from("Plant IT").unwrap(),
            plant_id: Some(plant_id),
            department_id,
            category: None,
            approver_1: Some(21),
            approver_2: None,
            approver_3: Some(23),
            approver_4: Some(24),
            approver_5: Some(25),
            max_approvers: 3,
            is_active: true,
            fulfilment_role_id: None,
        }
    }

    #[test]
    fn test_chain_respects_max_approvers_and_skips_empty_slots() {
        let workflow = plant_workflow(1, None);
        assert_eq!(workflow.chain(), vec![21, 23]);

        let mut all = workflow.clone();
        all.max_approvers = 5;
        assert_eq!(all.chain(), vec![21, 23, 24, 25]);

        let mut none = workflow;
        none.max_approvers = 0;
        assert!(none.chain().is_empty());
    }

    #[test]
    fn test_scope_matching() {
        let workflow = plant_workflow(1, Some(4));
        assert!(workflow.matches(&Scope::Plant { plant_id: 1, department_id: Some(4) }));
        assert!(!workflow.matches(&Scope::Plant { plant_id: 1, department_id: None }));
        assert!(!workflow.matches(&Scope::Plant { plant_id: 2, department_id: Some(4) }));
        assert!(!workflow.matches(&Scope::Corporate { category: "master_data".to_string() }));

        let mut corporate = plant_workflow(1, None);
        corporate.plant_id = None;
        corporate.category = Some(HeaplessString::try_from("master_data").unwrap());
        assert!(corporate.matches(&Scope::Corporate { category: "master_data".to_string() }));
        assert!(!corporate.matches(&Scope::Corporate { category: "vendor".to_string() }));
    }
}
