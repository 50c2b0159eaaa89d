use std::sync::Arc;

use chrono::Utc;
use governance_core_api::{
    ActorContext, ActorId, ApprovalStatus, DepartmentId, MutationAction, PermissionAction,
    PermissionExpression, PlantId, RoleId,
};
use governance_core_db::models::approval::ApprovalRequestModel;
use governance_core_db::models::entity::{DependencyRule, EntityRow};
use governance_core_db::models::permission::RoleGrantModel;
use governance_core_db::models::workflow::WorkflowModel;
use heapless::String as HeaplessString;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::config::{DirectTable, GovernanceConfig, GovernedModule, ScopeRule};
use crate::governance_service::GovernanceService;
use crate::testing::memory::MemoryUnitOfWork;

pub const PLANT_GOA: PlantId = 1;
pub const PLANT_PUNE: PlantId = 2;

pub const REQUESTER: ActorId = 7;
pub const MASTER_DATA_APPROVER: ActorId = 3;
pub const MGR_1: ActorId = 11;
pub const MGR_2: ActorId = 12;
pub const MGR_3: ActorId = 13;
pub const OPERATOR: ActorId = 40;

pub const EDITOR_ROLE: RoleId = 100;
pub const OPERATOR_ROLE: RoleId = 200;

pub fn actor(actor_id: ActorId, role_ids: Vec<RoleId>, plants: Vec<PlantId>) -> ActorContext {
    ActorContext::new(actor_id, role_ids, plants)
}

pub fn requester() -> ActorContext {
    actor(REQUESTER, vec![EDITOR_ROLE], vec![PLANT_GOA, PLANT_PUNE])
}

/// Approver with no grants and every plant.
pub fn approver(actor_id: ActorId) -> ActorContext {
    actor(actor_id, vec![], vec![PLANT_GOA, PLANT_PUNE])
}

pub fn operator() -> ActorContext {
    actor(OPERATOR, vec![OPERATOR_ROLE], vec![PLANT_GOA, PLANT_PUNE])
}

pub fn grant(role_id: RoleId, module: &str, action: PermissionAction) -> RoleGrantModel {
    RoleGrantModel::new(role_id, PermissionExpression::module_action(module, action))
}

pub fn plant_workflow(
    plant_id: PlantId,
    department_id: Option<DepartmentId>,
    approvers: &[ActorId],
) -> WorkflowModel {
    let slot = |i: usize| approvers.get(i).copied();
    WorkflowModel {
        id: Uuid::new_v4(),
        name: HeaplessString::try_from("Plant workflow").unwrap(),
        plant_id: Some(plant_id),
        department_id,
        category: None,
        approver_1: slot(0),
        approver_2: slot(1),
        approver_3: slot(2),
        approver_4: slot(3),
        approver_5: slot(4),
        max_approvers: approvers.len() as i16,
        is_active: true,
        fulfilment_role_id: Some(OPERATOR_ROLE),
    }
}

pub fn corporate_workflow(category: &str, approvers: &[ActorId]) -> WorkflowModel {
    let mut workflow = plant_workflow(0, None, approvers);
    workflow.name = HeaplessString::try_from("Corporate workflow").unwrap();
    workflow.plant_id = None;
    workflow.category = Some(HeaplessString::try_from(category).unwrap());
    workflow.fulfilment_role_id = None;
    workflow
}

/// `plant` (corporate master data), `system` (per plant and department), direct
/// `user_note`, and a rule keeping referenced systems active.
pub fn sample_config() -> GovernanceConfig {
    let mut config = GovernanceConfig::new(vec![
        GovernedModule {
            module: "plant".to_string(),
            table_name: "plant".to_string(),
            scope: ScopeRule::Corporate {
                category: "master_data".to_string(),
                plant_field: None,
            },
        },
        GovernedModule {
            module: "system".to_string(),
            table_name: "system_inventory".to_string(),
            scope: ScopeRule::PlantDepartment {
                plant_field: "plant_id".to_string(),
                department_field: Some("department_id".to_string()),
            },
        },
    ]);
    config.direct_tables.push(DirectTable {
        module: "notes".to_string(),
        table_name: "user_note".to_string(),
        plant_field: Some("plant_id".to_string()),
    });
    config.dependency_rules.push(DependencyRule {
        table_name: "system_inventory".to_string(),
        status_field: "status".to_string(),
        inactive_values: vec!["INACTIVE".to_string()],
        dependent_table: "application".to_string(),
        foreign_key: "system_id".to_string(),
        dependent_status_field: "status".to_string(),
        active_values: vec!["ACTIVE".to_string()],
    });
    config
}

pub fn row(value: Value) -> EntityRow {
    value.as_object().cloned().unwrap_or_default()
}

pub fn pending_request(chain: Vec<ActorId>) -> ApprovalRequestModel {
    let mut request = ApprovalRequestModel {
        id: Uuid::new_v4(),
        module: HeaplessString::try_from("plant").unwrap(),
        table_name: HeaplessString::try_from("plant").unwrap(),
        action: MutationAction::Create,
        record_id: None,
        old_value: None,
        new_value: Some(json!({"plant_name": "GOA-2"})),
        requested_by: REQUESTER,
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
    };
    request.rehash().unwrap();
    request
}

/// Memory-backed service seeded with workflows, grants and entity rows:
///
/// - master data chain `[3]`
/// - plant GOA chain `[11, 12]`, plant PUNE chain `[13]`, both fulfilled by role 200
/// - role 100 may create/update/delete plants, systems, notes and access requests
/// - system 10 (ACTIVE, GOA) referenced by an ACTIVE application
pub struct Harness {
    pub uow: MemoryUnitOfWork,
    pub service: GovernanceService<MemoryUnitOfWork>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(sample_config())
    }

    pub fn with_config(config: GovernanceConfig) -> Self {
        let uow = MemoryUnitOfWork::new();
        uow.seed(|state| {
            state.workflows.push(corporate_workflow("master_data", &[MASTER_DATA_APPROVER]));
            state.workflows.push(plant_workflow(PLANT_GOA, None, &[MGR_1, MGR_2]));
            state.workflows.push(plant_workflow(PLANT_PUNE, None, &[MGR_3]));

            for module in ["plant", "system", "notes"] {
                for action in [
                    PermissionAction::Create,
                    PermissionAction::Update,
                    PermissionAction::Delete,
                ] {
                    state.role_grants.push(grant(EDITOR_ROLE, module, action));
                }
            }
            state
                .role_grants
                .push(grant(EDITOR_ROLE, "user_request", PermissionAction::Create));

            state.put_row(
                "system_inventory",
                10,
                row(json!({"system_name": "SAP-GOA", "status": "ACTIVE", "plant_id": PLANT_GOA})),
            );
            state.put_row(
                "application",
                1,
                row(json!({"application_name": "Payroll", "system_id": 10, "status": "ACTIVE"})),
            );
        });
        let service = GovernanceService::new(Arc::new(uow.clone()), Arc::new(config));
        Self { uow, service }
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}
