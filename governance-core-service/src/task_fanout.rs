use governance_core_api::{
    ActivityAction, ActorContext, CreateAccessRequestCommand, GovernanceError, GovernanceResult,
    PermissionAction, RejectCommand, Scope, TaskStatus, UserRequestStatus,
};
use governance_core_db::models::access::{TaskModel, UserRequestModel};
use governance_core_db::repository::UnitOfWorkSession;
use governance_core_db::utils::{bounded_opt, now_micros};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::approval_commit::normalize_comments;
use crate::audit_logger::{ActivityEntry, AuditLogger};
use crate::config::GovernanceConfig;
use crate::outcome::{AccessRequestView, TaskTransition};
use crate::permission_scope_filter::PermissionScopeFilter;
use crate::workflow_resolver::WorkflowResolver;

const TASK: &str = "task";
const USER_REQUEST: &str = "user_request";

/// Fulfilment steps an operator may take on an approved task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FulfilmentStep {
    Start,
    Resolve,
    Close,
}

impl FulfilmentStep {
    fn target(&self) -> TaskStatus {
        match self {
            FulfilmentStep::Start => TaskStatus::InProgress,
            FulfilmentStep::Resolve => TaskStatus::Resolved,
            FulfilmentStep::Close => TaskStatus::Closed,
        }
    }

    fn allowed_from(&self, status: TaskStatus) -> bool {
        match self {
            FulfilmentStep::Start => status == TaskStatus::Assigned,
            FulfilmentStep::Resolve => {
                matches!(status, TaskStatus::Assigned | TaskStatus::InProgress)
            }
            FulfilmentStep::Close => matches!(
                status,
                TaskStatus::Assigned | TaskStatus::InProgress | TaskStatus::Resolved
            ),
        }
    }
}

/// Expands one access request into independently routed tasks and keeps the
/// parent's aggregate status in step with them.
pub struct TaskFanoutEngine<'a> {
    config: &'a GovernanceConfig,
}

impl<'a> TaskFanoutEngine<'a> {
    pub fn new(config: &'a GovernanceConfig) -> Self {
        Self { config }
    }

    /// All-or-nothing: one unauthorized or unroutable item fails the whole request.
    pub async fn create_request<S: UnitOfWorkSession>(
        &self,
        session: &S,
        actor: &ActorContext,
        command: CreateAccessRequestCommand,
    ) -> GovernanceResult<AccessRequestView> {
        command.validate()?;

        let filter = PermissionScopeFilter::load(session.role_grants(), actor).await?;
        for item in &command.items {
            filter.require(
                &self.config.access_request_module,
                PermissionAction::Create,
                Some(item.plant_id),
            )?;
        }

        let now = now_micros();
        let mut user_request = UserRequestModel {
            id: Uuid::new_v4(),
            requested_by: actor.actor_id,
            description: bounded_opt("description", command.description.as_deref())
                .map_err(GovernanceError::Validation)?,
            status: UserRequestStatus::Pending,
            created_at: now,
            updated_at: now,
            hash: 0,
        };
        user_request.rehash().map_err(GovernanceError::Storage)?;

        let mut tasks = Vec::with_capacity(command.items.len());
        for item in &command.items {
            let scope = Scope::Plant {
                plant_id: item.plant_id,
                department_id: item.department_id,
            };
            let chain = WorkflowResolver::resolve(session.workflows(), &scope).await?;
            let mut task = TaskModel {
                id: Uuid::new_v4(),
                user_request_id: user_request.id,
                application_id: item.application_id,
                access_role_id: item.access_role_id,
                plant_id: item.plant_id,
                department_id: item.department_id,
                workflow_id: chain.workflow_id,
                approver_chain: chain.approvers,
                current_slot: 0,
                fulfilment_role_id: chain.fulfilment_role_id,
                task_status: TaskStatus::Pending,
                justification: bounded_opt("justification", item.justification.as_deref())
                    .map_err(GovernanceError::Validation)?,
                last_actor: Some(actor.actor_id),
                comments: None,
                created_at: now,
                updated_at: now,
                hash: 0,
            };
            task.rehash().map_err(GovernanceError::Storage)?;
            tasks.push(task);
        }

        let user_request = session
            .user_requests()
            .create_batch(vec![user_request])
            .await?
            .pop()
            .ok_or_else(|| GovernanceError::Storage("User request insert returned no row".to_string()))?;
        let tasks = session.tasks().create_batch(tasks).await?;

        AuditLogger::record(
            session.activity_logs(),
            ActivityEntry::new(USER_REQUEST, ActivityAction::Create, actor.actor_id)
                .subject(user_request.id)
                .values(None, Some(json!({"description": user_request.description, "tasks": tasks.len()})))
                .status(user_request.status),
        )
        .await?;
        for task in &tasks {
            AuditLogger::record(
                session.activity_logs(),
                ActivityEntry::new(TASK, ActivityAction::Create, actor.actor_id)
                    .subject(task.id)
                    .plant(Some(task.plant_id))
                    .values(None, Some(task_snapshot(task)))
                    .status(task.task_status),
            )
            .await?;
        }

        info!(
            user_request_id = %user_request.id,
            actor_id = actor.actor_id,
            tasks = tasks.len(),
            "Created access request"
        );
        Ok(AccessRequestView {
            user_request,
            tasks,
        })
    }

    pub async fn approve_task<S: UnitOfWorkSession>(
        &self,
        session: &S,
        actor: &ActorContext,
        task_id: Uuid,
        comments: Option<String>,
    ) -> GovernanceResult<TaskTransition> {
        let comments = normalize_comments(comments)?;
        let mut task = load_task(session, task_id).await?;
        if task.task_status != TaskStatus::Pending {
            return Err(GovernanceError::conflict(TASK, task_id, task.task_status, "already processed"));
        }
        if task.current_approver() != Some(actor.actor_id) {
            return Err(GovernanceError::permission(
                actor.actor_id,
                format!("not the approver at slot {} of task {task_id}", task.current_slot + 1),
            ));
        }
        require_plant(actor, &task)?;

        let next_status = if task.is_last_slot() {
            TaskStatus::Assigned
        } else {
            TaskStatus::Pending
        };
        task.current_slot += 1;
        self.transition(session, actor, task, next_status, ActivityAction::Approve, comments)
            .await
    }

    pub async fn reject_task<S: UnitOfWorkSession>(
        &self,
        session: &S,
        actor: &ActorContext,
        task_id: Uuid,
        command: RejectCommand,
    ) -> GovernanceResult<TaskTransition> {
        let command = RejectCommand::new(command.comments);
        command.validate()?;

        let task = load_task(session, task_id).await?;
        let allowed = match task.task_status {
            TaskStatus::Pending => task.remaining_chain().contains(&actor.actor_id),
            TaskStatus::Assigned | TaskStatus::InProgress => {
                self.is_operator(session, actor, &task).await?
            }
            status => {
                return Err(GovernanceError::conflict(TASK, task_id, status, "already processed"))
            }
        };
        if !allowed {
            return Err(GovernanceError::permission(
                actor.actor_id,
                format!("may not reject task {task_id} in status {}", task.task_status),
            ));
        }
        require_plant(actor, &task)?;

        self.transition(
            session,
            actor,
            task,
            TaskStatus::Rejected,
            ActivityAction::Reject,
            Some(command.comments),
        )
        .await
    }

    /// Operator step on an approved task: start, resolve or close.
    pub async fn fulfil<S: UnitOfWorkSession>(
        &self,
        session: &S,
        actor: &ActorContext,
        task_id: Uuid,
        step: FulfilmentStep,
        comments: Option<String>,
    ) -> GovernanceResult<TaskTransition> {
        let comments = normalize_comments(comments)?;
        let task = load_task(session, task_id).await?;
        if !step.allowed_from(task.task_status) {
            return Err(GovernanceError::conflict(
                TASK,
                task_id,
                task.task_status,
                format!("cannot move to {}", step.target()),
            ));
        }
        if !self.is_operator(session, actor, &task).await? {
            return Err(GovernanceError::permission(
                actor.actor_id,
                format!("not in the fulfilment group of task {task_id}"),
            ));
        }
        self.transition(session, actor, task, step.target(), ActivityAction::Transition, comments)
            .await
    }

    /// Member of the workflow's fulfilment role, or, when the workflow names none,
    /// holder of the update grant on access requests. Always within plant scope.
    async fn is_operator<S: UnitOfWorkSession>(
        &self,
        session: &S,
        actor: &ActorContext,
        task: &TaskModel,
    ) -> GovernanceResult<bool> {
        if !actor.is_permitted_plant(task.plant_id) {
            return Ok(false);
        }
        match task.fulfilment_role_id {
            Some(role_id) => Ok(actor.has_role(role_id)),
            None => {
                let filter = PermissionScopeFilter::load(session.role_grants(), actor).await?;
                Ok(filter.can_act(
                    &self.config.access_request_module,
                    PermissionAction::Update,
                    Some(task.plant_id),
                ))
            }
        }
    }

    async fn transition<S: UnitOfWorkSession>(
        &self,
        session: &S,
        actor: &ActorContext,
        mut task: TaskModel,
        next_status: TaskStatus,
        activity: ActivityAction,
        comments: Option<String>,
    ) -> GovernanceResult<TaskTransition> {
        let previous_hash = task.hash;
        let previous_status = task.task_status;
        task.task_status = next_status;
        task.last_actor = Some(actor.actor_id);
        task.comments = bounded_opt("comments", comments.as_deref()).map_err(GovernanceError::Validation)?;
        task.updated_at = now_micros();
        task.rehash().map_err(GovernanceError::Storage)?;

        if !session.tasks().update_guarded(&task, previous_hash).await? {
            let observed = session
                .tasks()
                .load(task.id)
                .await?
                .map(|current| current.task_status.to_string())
                .unwrap_or_else(|| "MISSING".to_string());
            warn!(task_id = %task.id, observed = %observed, "Lost task race");
            return Err(GovernanceError::conflict(TASK, task.id, observed, "changed concurrently"));
        }

        let user_request = self.refresh_aggregate(session, task.user_request_id).await?;

        AuditLogger::record(
            session.activity_logs(),
            ActivityEntry::new(TASK, activity, actor.actor_id)
                .subject(task.id)
                .plant(Some(task.plant_id))
                .values(
                    Some(json!({"task_status": previous_status})),
                    Some(json!({"task_status": task.task_status, "current_slot": task.current_slot})),
                )
                .status(task.task_status)
                .comments(comments.as_deref()),
        )
        .await?;

        info!(
            task_id = %task.id,
            actor_id = actor.actor_id,
            from = %previous_status,
            to = %task.task_status,
            user_request_status = %user_request.status,
            "Task transitioned"
        );
        Ok(TaskTransition { task, user_request })
    }

    /// Recomputes the parent status under a row lock, after the task write.
    async fn refresh_aggregate<S: UnitOfWorkSession>(
        &self,
        session: &S,
        user_request_id: Uuid,
    ) -> GovernanceResult<UserRequestModel> {
        let mut user_request = session
            .user_requests()
            .lock_for_update(user_request_id)
            .await?
            .ok_or_else(|| GovernanceError::NotFound(format!("{USER_REQUEST} {user_request_id}")))?;
        let tasks = session.tasks().find_by_user_request_id(user_request_id).await?;
        let status = UserRequestStatus::from_task_statuses(tasks.iter().map(|t| t.task_status));
        if status == user_request.status {
            return Ok(user_request);
        }

        let previous_hash = user_request.hash;
        user_request.status = status;
        user_request.updated_at = now_micros();
        user_request.rehash().map_err(GovernanceError::Storage)?;
        if !session
            .user_requests()
            .update_guarded(&user_request, previous_hash)
            .await?
        {
            return Err(GovernanceError::conflict(
                USER_REQUEST,
                user_request_id,
                user_request.status,
                "changed concurrently",
            ));
        }
        Ok(user_request)
    }
}

async fn load_task<S: UnitOfWorkSession>(session: &S, task_id: Uuid) -> GovernanceResult<TaskModel> {
    session
        .tasks()
        .load(task_id)
        .await?
        .ok_or_else(|| GovernanceError::NotFound(format!("{TASK} {task_id}")))
}

fn require_plant(actor: &ActorContext, task: &TaskModel) -> GovernanceResult<()> {
    if actor.is_permitted_plant(task.plant_id) {
        Ok(())
    } else {
        Err(GovernanceError::permission(
            actor.actor_id,
            format!("plant {} is outside the actor's plant scope", task.plant_id),
        ))
    }
}

fn task_snapshot(task: &TaskModel) -> serde_json::Value {
    json!({
        "user_request_id": task.user_request_id,
        "application_id": task.application_id,
        "access_role_id": task.access_role_id,
        "plant_id": task.plant_id,
        "department_id": task.department_id,
        "approver_chain": task.approver_chain,
        "task_status": task.task_status,
    })
}
