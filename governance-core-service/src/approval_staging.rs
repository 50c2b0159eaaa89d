use governance_core_api::{
    ActivityAction, ActorContext, ApprovalStatus, GovernanceError, GovernanceResult,
    MutationAction, PermissionAction, PlantId, Scope, StageMutationCommand,
};
use governance_core_db::models::approval::ApprovalRequestModel;
use governance_core_db::models::entity::{row_department_id, row_plant_id};
use governance_core_db::repository::UnitOfWorkSession;
use governance_core_db::utils::{bounded, bounded_opt, now_micros};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::audit_logger::{ActivityEntry, AuditLogger};
use crate::config::{GovernanceConfig, GovernedModule, ScopeRule};
use crate::governance_service::load_row;
use crate::permission_scope_filter::PermissionScopeFilter;
use crate::workflow_resolver::WorkflowResolver;

/// Turns a proposed mutation into a PENDING approval request. Never touches the
/// target entity table.
pub struct ApprovalStaging<'a> {
    config: &'a GovernanceConfig,
}

impl<'a> ApprovalStaging<'a> {
    pub fn new(config: &'a GovernanceConfig) -> Self {
        Self { config }
    }

    pub async fn stage<S: UnitOfWorkSession>(
        &self,
        session: &S,
        actor: &ActorContext,
        command: StageMutationCommand,
    ) -> GovernanceResult<ApprovalRequestModel> {
        command.validate()?;
        command.check_shape().map_err(GovernanceError::Validation)?;

        let governed = self.config.governed_module(&command.module).ok_or_else(|| {
            GovernanceError::Validation(format!("Module '{}' is not governed", command.module))
        })?;
        if governed.table_name != command.table_name {
            return Err(GovernanceError::Validation(format!(
                "Module '{}' governs table '{}', not '{}'",
                governed.module, governed.table_name, command.table_name
            )));
        }

        // Updates and deletes are scoped by the stored row, not by the caller's snapshot.
        let stored = match (command.action, command.record_id) {
            (MutationAction::Update | MutationAction::Delete, Some(record_id)) => {
                Some(load_row(session.entity_rows(), &command.table_name, record_id).await?)
            }
            _ => None,
        };

        // Every plant the change touches must be in scope: both sides of a move.
        let filter = PermissionScopeFilter::load(session.role_grants(), actor).await?;
        let permission_action = PermissionAction::from(command.action);
        let plants = touched_plants(governed, stored.as_ref(), &command);
        if plants.is_empty() {
            filter.require(&governed.module, permission_action, None)?;
        }
        for plant_id in &plants {
            filter.require(&governed.module, permission_action, Some(*plant_id))?;
        }
        if let Some(stored) = &stored {
            check_old_value(governed, stored, &command)?;
        }

        let snapshot = match command.action {
            MutationAction::Delete => stored.as_ref(),
            MutationAction::Create | MutationAction::Update => command.new_value.as_ref(),
        };
        let scope = derive_scope(governed, snapshot)?;
        let chain = WorkflowResolver::resolve(session.workflows(), &scope).await?;

        let plant_id = scope.plant_id().or_else(|| {
            snapshot.and_then(|row| governed.plant_field().and_then(|field| row_plant_id(row, field)))
        });

        let mut request = ApprovalRequestModel {
            id: Uuid::new_v4(),
            module: bounded("module", &command.module).map_err(GovernanceError::Validation)?,
            table_name: bounded("table_name", &command.table_name).map_err(GovernanceError::Validation)?,
            action: command.action,
            record_id: command.record_id,
            old_value: command.old_value,
            new_value: command.new_value,
            requested_by: actor.actor_id,
            status: ApprovalStatus::Pending,
            comments: bounded_opt("comments", command.comments.as_deref())
                .map_err(GovernanceError::Validation)?,
            created_at: now_micros(),
            approved_by: None,
            approved_at: None,
            approval_comments: None,
            workflow_id: chain.workflow_id,
            plant_id,
            department_id: scope.department_id(),
            approver_chain: chain.approvers,
            current_slot: 0,
            hash: 0,
        };
        request.rehash().map_err(GovernanceError::Storage)?;

        let mut saved = session
            .approval_requests()
            .create_batch(vec![request])
            .await?;
        let request = saved
            .pop()
            .ok_or_else(|| GovernanceError::Storage("Approval request insert returned no row".to_string()))?;

        AuditLogger::record(
            session.activity_logs(),
            ActivityEntry::new(request.table_name.as_str(), ActivityAction::from(request.action), actor.actor_id)
                .record(request.record_id)
                .subject(request.id)
                .plant(request.plant_id)
                .values(request.old_value.clone(), request.new_value.clone())
                .status(request.status)
                .comments(request.comments.as_deref()),
        )
        .await?;

        info!(
            request_id = %request.id,
            actor_id = actor.actor_id,
            table_name = %request.table_name,
            action = %request.action,
            approvers = request.approver_chain.len(),
            "Staged mutation"
        );
        Ok(request)
    }
}

/// Plants of the stored row and of both snapshots, without duplicates.
fn touched_plants(
    governed: &GovernedModule,
    stored: Option<&Value>,
    command: &StageMutationCommand,
) -> Vec<PlantId> {
    let Some(plant_field) = governed.plant_field() else {
        return Vec::new();
    };
    let mut plants = Vec::new();
    for snapshot in [stored, command.old_value.as_ref(), command.new_value.as_ref()]
        .into_iter()
        .flatten()
    {
        if let Some(plant_id) = row_plant_id(snapshot, plant_field) {
            if !plants.contains(&plant_id) {
                plants.push(plant_id);
            }
        }
    }
    plants
}

/// `old_value` must describe the stored row's plant.
fn check_old_value(
    governed: &GovernedModule,
    stored: &Value,
    command: &StageMutationCommand,
) -> GovernanceResult<()> {
    let (Some(plant_field), Some(old_value)) = (governed.plant_field(), command.old_value.as_ref()) else {
        return Ok(());
    };
    let stored_plant = row_plant_id(stored, plant_field);
    let claimed_plant = row_plant_id(old_value, plant_field);
    if stored_plant != claimed_plant {
        return Err(GovernanceError::Validation(format!(
            "old_value '{plant_field}' {claimed_plant:?} does not match the stored row ({stored_plant:?})"
        )));
    }
    Ok(())
}

fn derive_scope(governed: &GovernedModule, snapshot: Option<&Value>) -> GovernanceResult<Scope> {
    match &governed.scope {
        ScopeRule::Corporate { category, .. } => Ok(Scope::Corporate {
            category: category.clone(),
        }),
        ScopeRule::PlantDepartment {
            plant_field,
            department_field,
        } => {
            let snapshot = snapshot.ok_or_else(|| {
                GovernanceError::Validation("Snapshot required to derive the scope".to_string())
            })?;
            let plant_id = row_plant_id(snapshot, plant_field).ok_or_else(|| {
                GovernanceError::Validation(format!(
                    "Snapshot for module '{}' has no '{plant_field}'",
                    governed.module
                ))
            })?;
            let department_id = department_field
                .as_deref()
                .and_then(|field| row_department_id(snapshot, field));
            Ok(Scope::Plant {
                plant_id,
                department_id,
            })
        }
    }
}
