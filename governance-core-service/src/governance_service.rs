use std::sync::Arc;

use governance_core_api::{
    ActivityAction, ActorContext, ApprovalQuery, CreateAccessRequestCommand,
    DirectMutationCommand, EntityChange, GovernanceError, GovernanceResult, MutationAction,
    PermissionAction, PlantId, RecordId, RejectCommand, StageMutationCommand,
};
use governance_core_db::models::approval::ApprovalRequestModel;
use governance_core_db::models::audit::ActivityLogModel;
use governance_core_db::models::entity::{row_plant_id, writable_columns};
use governance_core_db::repository::{
    EntityRowRepository, Page, PageRequest, UnitOfWork, UnitOfWorkSession,
};
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::approval_commit::ApprovalCommitEngine;
use crate::approval_staging::ApprovalStaging;
use crate::audit_logger::{ActivityEntry, AuditLogger};
use crate::config::{DirectTable, GovernanceConfig};
use crate::outcome::{AccessRequestView, ApprovalOutcome, TaskTransition};
use crate::permission_scope_filter::PermissionScopeFilter;
use crate::task_fanout::{FulfilmentStep, TaskFanoutEngine};

/// Entry point for every operation of the engine.
///
/// Each call runs in its own unit of work: committed when the call succeeds,
/// rolled back on any error.
pub struct GovernanceService<U: UnitOfWork> {
    uow: Arc<U>,
    config: Arc<GovernanceConfig>,
}

impl<U: UnitOfWork> Clone for GovernanceService<U> {
    fn clone(&self) -> Self {
        Self {
            uow: self.uow.clone(),
            config: self.config.clone(),
        }
    }
}

impl<U: UnitOfWork> GovernanceService<U> {
    pub fn new(uow: Arc<U>, config: Arc<GovernanceConfig>) -> Self {
        Self { uow, config }
    }

    pub fn config(&self) -> &GovernanceConfig {
        &self.config
    }

    pub async fn stage_mutation(
        &self,
        actor: &ActorContext,
        command: StageMutationCommand,
    ) -> GovernanceResult<ApprovalRequestModel> {
        let session = self.uow.begin().await?;
        let result = ApprovalStaging::new(&self.config)
            .stage(&session, actor, command)
            .await;
        finish(session, result).await
    }

    pub async fn approve(
        &self,
        actor: &ActorContext,
        id: Uuid,
        comments: Option<String>,
    ) -> GovernanceResult<ApprovalOutcome> {
        let session = self.uow.begin().await?;
        let result = ApprovalCommitEngine::new(&self.config)
            .approve(&session, actor, id, comments)
            .await;
        finish(session, result).await
    }

    pub async fn reject(
        &self,
        actor: &ActorContext,
        id: Uuid,
        command: RejectCommand,
    ) -> GovernanceResult<ApprovalRequestModel> {
        let session = self.uow.begin().await?;
        let result = ApprovalCommitEngine::new(&self.config)
            .reject(&session, actor, id, command)
            .await;
        finish(session, result).await
    }

    pub async fn create_access_request(
        &self,
        actor: &ActorContext,
        command: CreateAccessRequestCommand,
    ) -> GovernanceResult<AccessRequestView> {
        let session = self.uow.begin().await?;
        let result = TaskFanoutEngine::new(&self.config)
            .create_request(&session, actor, command)
            .await;
        finish(session, result).await
    }

    pub async fn approve_task(
        &self,
        actor: &ActorContext,
        task_id: Uuid,
        comments: Option<String>,
    ) -> GovernanceResult<TaskTransition> {
        let session = self.uow.begin().await?;
        let result = TaskFanoutEngine::new(&self.config)
            .approve_task(&session, actor, task_id, comments)
            .await;
        finish(session, result).await
    }

    pub async fn reject_task(
        &self,
        actor: &ActorContext,
        task_id: Uuid,
        command: RejectCommand,
    ) -> GovernanceResult<TaskTransition> {
        let session = self.uow.begin().await?;
        let result = TaskFanoutEngine::new(&self.config)
            .reject_task(&session, actor, task_id, command)
            .await;
        finish(session, result).await
    }

    pub async fn start_task(
        &self,
        actor: &ActorContext,
        task_id: Uuid,
        comments: Option<String>,
    ) -> GovernanceResult<TaskTransition> {
        self.fulfil(actor, task_id, FulfilmentStep::Start, comments).await
    }

    pub async fn resolve_task(
        &self,
        actor: &ActorContext,
        task_id: Uuid,
        comments: Option<String>,
    ) -> GovernanceResult<TaskTransition> {
        self.fulfil(actor, task_id, FulfilmentStep::Resolve, comments).await
    }

    pub async fn close_task(
        &self,
        actor: &ActorContext,
        task_id: Uuid,
        comments: Option<String>,
    ) -> GovernanceResult<TaskTransition> {
        self.fulfil(actor, task_id, FulfilmentStep::Close, comments).await
    }

    async fn fulfil(
        &self,
        actor: &ActorContext,
        task_id: Uuid,
        step: FulfilmentStep,
        comments: Option<String>,
    ) -> GovernanceResult<TaskTransition> {
        let session = self.uow.begin().await?;
        let result = TaskFanoutEngine::new(&self.config)
            .fulfil(&session, actor, task_id, step, comments)
            .await;
        finish(session, result).await
    }

    /// Immediate write to a table configured for direct writes. Governed tables
    /// are refused: their only write path is an approved staged mutation.
    pub async fn apply_direct_mutation(
        &self,
        actor: &ActorContext,
        command: DirectMutationCommand,
    ) -> GovernanceResult<EntityChange> {
        command.validate()?;
        if self.config.is_governed_table(&command.table_name) {
            warn!(
                actor_id = actor.actor_id,
                table_name = %command.table_name,
                "Direct write to governed table refused"
            );
            return Err(GovernanceError::permission(
                actor.actor_id,
                format!(
                    "table '{}' is governed; stage a mutation instead",
                    command.table_name
                ),
            ));
        }
        let direct = self
            .config
            .direct_table(&command.table_name)
            .filter(|t| t.module == command.module)
            .ok_or_else(|| {
                GovernanceError::Configuration(format!(
                    "Table '{}' is not configured for direct writes in module '{}'",
                    command.table_name, command.module
                ))
            })?;

        let session = self.uow.begin().await?;
        let result = self.write_direct(&session, actor, &command, direct).await;
        finish(session, result).await
    }

    async fn write_direct<S: UnitOfWorkSession>(
        &self,
        session: &S,
        actor: &ActorContext,
        command: &DirectMutationCommand,
        direct: &DirectTable,
    ) -> GovernanceResult<EntityChange> {
        let filter = PermissionScopeFilter::load(session.role_grants(), actor).await?;
        let rows = session.entity_rows();
        let plant_of = |row: &Value| -> Option<PlantId> {
            direct
                .plant_field
                .as_deref()
                .and_then(|field| row_plant_id(row, field))
        };
        let permission_action = PermissionAction::from(command.action);

        let (record_id, old_value, new_value): (RecordId, Option<Value>, Option<Value>) =
            match (command.action, command.record_id, command.values.as_ref()) {
                (MutationAction::Create, None, Some(values)) if values.is_object() => {
                    filter.require(&direct.module, permission_action, plant_of(values))?;
                    let record_id = rows
                        .insert_row(&direct.table_name, &writable_columns(values))
                        .await?;
                    (record_id, None, Some(values.clone()))
                }
                (MutationAction::Update, Some(record_id), Some(values)) if values.is_object() => {
                    let existing = load_row(rows, &direct.table_name, record_id).await?;
                    filter.require(&direct.module, permission_action, plant_of(&existing))?;
                    filter.require(&direct.module, permission_action, plant_of(values))?;
                    rows.update_row(&direct.table_name, record_id, &writable_columns(values))
                        .await?;
                    (record_id, Some(existing), Some(values.clone()))
                }
                (MutationAction::Delete, Some(record_id), None) => {
                    let existing = load_row(rows, &direct.table_name, record_id).await?;
                    filter.require(&direct.module, permission_action, plant_of(&existing))?;
                    rows.delete_row(&direct.table_name, record_id).await?;
                    (record_id, Some(existing), None)
                }
                (action, _, _) => {
                    return Err(GovernanceError::Validation(format!(
                        "Malformed direct {action}: check record_id and values"
                    )))
                }
            };

        let plant_id = new_value
            .as_ref()
            .or(old_value.as_ref())
            .and_then(plant_of);
        AuditLogger::record(
            session.activity_logs(),
            ActivityEntry::new(direct.table_name.as_str(), ActivityAction::from(command.action), actor.actor_id)
                .record(Some(record_id))
                .plant(plant_id)
                .values(old_value, new_value),
        )
        .await?;

        info!(
            actor_id = actor.actor_id,
            table_name = %direct.table_name,
            record_id,
            action = %command.action,
            "Applied direct mutation"
        );
        Ok(EntityChange {
            table_name: direct.table_name.clone(),
            record_id,
            action: command.action,
        })
    }

    /// Requests matching `query`, restricted to the actor's plants.
    pub async fn query_approvals(
        &self,
        actor: &ActorContext,
        query: &ApprovalQuery,
        page: PageRequest,
    ) -> GovernanceResult<Page<ApprovalRequestModel>> {
        let session = self.uow.begin().await?;
        let plants = actor.plant_filter();
        let result = session
            .approval_requests()
            .find_page(query, &plants, page)
            .await
            .map_err(GovernanceError::from);
        finish(session, result).await
    }

    /// One request; requests outside the actor's plants read as missing.
    pub async fn query_approval(
        &self,
        actor: &ActorContext,
        id: Uuid,
    ) -> GovernanceResult<ApprovalRequestModel> {
        let session = self.uow.begin().await?;
        let result = session
            .approval_requests()
            .load(id)
            .await
            .map_err(GovernanceError::from)
            .and_then(|request| {
                request
                    .filter(|r| actor.plant_filter().admits(r.plant_id))
                    .ok_or_else(|| GovernanceError::NotFound(format!("approval_request {id}")))
            });
        finish(session, result).await
    }

    /// Audit trail of one entity-table row, oldest first.
    pub async fn query_activity_log(
        &self,
        actor: &ActorContext,
        table_name: &str,
        record_id: RecordId,
        page: PageRequest,
    ) -> GovernanceResult<Page<ActivityLogModel>> {
        let session = self.uow.begin().await?;
        let plants = actor.plant_filter();
        let result = session
            .activity_logs()
            .find_by_record(table_name, record_id, &plants, page)
            .await
            .map_err(GovernanceError::from);
        finish(session, result).await
    }

    /// Audit trail of one approval request, oldest first.
    pub async fn query_approval_history(
        &self,
        actor: &ActorContext,
        id: Uuid,
        page: PageRequest,
    ) -> GovernanceResult<Page<ActivityLogModel>> {
        self.query_subject_history(actor, id, page).await
    }

    /// Audit trail of one task, oldest first.
    pub async fn query_task_history(
        &self,
        actor: &ActorContext,
        task_id: Uuid,
        page: PageRequest,
    ) -> GovernanceResult<Page<ActivityLogModel>> {
        self.query_subject_history(actor, task_id, page).await
    }

    async fn query_subject_history(
        &self,
        actor: &ActorContext,
        subject_id: Uuid,
        page: PageRequest,
    ) -> GovernanceResult<Page<ActivityLogModel>> {
        let session = self.uow.begin().await?;
        let plants = actor.plant_filter();
        let result = session
            .activity_logs()
            .find_by_subject(subject_id, &plants, page)
            .await
            .map_err(GovernanceError::from);
        finish(session, result).await
    }

    /// A user request with the tasks the actor may see. The requester sees all of
    /// them; anyone else only those in permitted plants, and nothing if none is.
    pub async fn query_user_request(
        &self,
        actor: &ActorContext,
        id: Uuid,
    ) -> GovernanceResult<AccessRequestView> {
        let session = self.uow.begin().await?;
        let result = self.read_user_request(&session, actor, id).await;
        finish(session, result).await
    }

    async fn read_user_request<S: UnitOfWorkSession>(
        &self,
        session: &S,
        actor: &ActorContext,
        id: Uuid,
    ) -> GovernanceResult<AccessRequestView> {
        let user_request = session
            .user_requests()
            .load(id)
            .await?
            .ok_or_else(|| GovernanceError::NotFound(format!("user_request {id}")))?;
        let tasks = session.tasks().find_by_user_request_id(id).await?;
        if user_request.requested_by == actor.actor_id {
            return Ok(AccessRequestView {
                user_request,
                tasks,
            });
        }
        let tasks: Vec<_> = tasks
            .into_iter()
            .filter(|t| actor.is_permitted_plant(t.plant_id))
            .collect();
        if tasks.is_empty() {
            return Err(GovernanceError::NotFound(format!("user_request {id}")));
        }
        Ok(AccessRequestView {
            user_request,
            tasks,
        })
    }
}

/// Stored row as a JSON object, `NotFound` when it is missing.
pub(crate) async fn load_row(
    rows: &dyn EntityRowRepository,
    table_name: &str,
    record_id: RecordId,
) -> GovernanceResult<Value> {
    rows.get_row(table_name, record_id)
        .await?
        .map(Value::Object)
        .ok_or_else(|| GovernanceError::NotFound(format!("{table_name} {record_id}")))
}

/// Commits on success, rolls back on failure and hands the result through.
async fn finish<S: UnitOfWorkSession, T>(
    session: S,
    result: GovernanceResult<T>,
) -> GovernanceResult<T> {
    match result {
        Ok(value) => {
            session.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = session.rollback().await {
                warn!(error = %rollback_err, "Rollback failed");
            }
            Err(err)
        }
    }
}
