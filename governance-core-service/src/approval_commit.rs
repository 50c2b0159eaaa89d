use governance_core_api::{
    ActivityAction, ActorContext, ApprovalStatus, EntityChange, GovernanceError,
    GovernanceResult, MutationAction, RecordId, RejectCommand, MAX_COMMENT_LENGTH,
};
use governance_core_db::models::approval::ApprovalRequestModel;
use governance_core_db::models::entity::writable_columns;
use governance_core_db::repository::UnitOfWorkSession;
use governance_core_db::utils::{bounded_opt, now_micros};
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::audit_logger::{ActivityEntry, AuditLogger};
use crate::config::GovernanceConfig;
use crate::outcome::ApprovalOutcome;

const ENTITY: &str = "approval_request";

/// Drives approval requests through their chain and applies the staged diff on
/// the last approval.
///
/// Every state change is a compare-and-swap on the request hash; the caller runs
/// each call inside one unit of work and rolls it back on error, so a lost race,
/// an integrity violation or a missing target row leaves storage untouched.
pub struct ApprovalCommitEngine<'a> {
    config: &'a GovernanceConfig,
}

impl<'a> ApprovalCommitEngine<'a> {
    pub fn new(config: &'a GovernanceConfig) -> Self {
        Self { config }
    }

    pub async fn approve<S: UnitOfWorkSession>(
        &self,
        session: &S,
        actor: &ActorContext,
        id: Uuid,
        comments: Option<String>,
    ) -> GovernanceResult<ApprovalOutcome> {
        let comments = normalize_comments(comments)?;
        let mut request = load_pending(session, id).await?;

        if request.current_approver() != Some(actor.actor_id) {
            return Err(GovernanceError::permission(
                actor.actor_id,
                format!(
                    "not the approver at slot {} of request {id}",
                    request.current_slot + 1
                ),
            ));
        }
        require_plant(actor, &request)?;

        let previous_hash = request.hash;

        if !request.is_last_slot() {
            request.current_slot += 1;
            let next_approver = request.current_approver().ok_or_else(|| {
                GovernanceError::Storage(format!("Approver chain of request {id} is inconsistent"))
            })?;
            swap(session, &mut request, previous_hash).await?;

            AuditLogger::record(
                session.activity_logs(),
                ActivityEntry::new(request.table_name.as_str(), ActivityAction::Approve, actor.actor_id)
                    .record(request.record_id)
                    .subject(request.id)
                    .plant(request.plant_id)
                    .status(request.status)
                    .comments(comments.as_deref()),
            )
            .await?;

            info!(
                request_id = %id,
                actor_id = actor.actor_id,
                next_approver,
                "Approval advanced to next slot"
            );
            return Ok(ApprovalOutcome::Advanced {
                request,
                next_approver,
            });
        }

        self.check_integrity(session, &request).await?;

        // A created row needs its id before the request is sealed as APPROVED.
        let record_id = match request.action {
            MutationAction::Create => {
                let values = request
                    .new_value
                    .as_ref()
                    .map(writable_columns)
                    .unwrap_or_default();
                let record_id = session
                    .entity_rows()
                    .insert_row(&request.table_name, &values)
                    .await?;
                request.record_id = Some(record_id);
                record_id
            }
            MutationAction::Update | MutationAction::Delete => request.record_id.ok_or_else(|| {
                GovernanceError::Validation(format!("Request {id} has no record_id"))
            })?,
        };

        request.status = ApprovalStatus::Approved;
        request.current_slot += 1;
        request.approved_by = Some(actor.actor_id);
        request.approved_at = Some(now_micros());
        request.approval_comments =
            bounded_opt("approval_comments", comments.as_deref()).map_err(GovernanceError::Validation)?;
        swap(session, &mut request, previous_hash).await?;

        self.apply_diff(session, &request, record_id).await?;

        AuditLogger::record(
            session.activity_logs(),
            ActivityEntry::new(request.table_name.as_str(), ActivityAction::Approve, actor.actor_id)
                .record(Some(record_id))
                .subject(request.id)
                .plant(request.plant_id)
                .values(request.old_value.clone(), request.new_value.clone())
                .status(request.status)
                .comments(comments.as_deref()),
        )
        .await?;

        info!(
            request_id = %id,
            actor_id = actor.actor_id,
            table_name = %request.table_name,
            record_id,
            action = %request.action,
            "Committed staged mutation"
        );
        let changes = vec![EntityChange {
            table_name: request.table_name.to_string(),
            record_id,
            action: request.action,
        }];
        Ok(ApprovalOutcome::Committed { request, changes })
    }

    pub async fn reject<S: UnitOfWorkSession>(
        &self,
        session: &S,
        actor: &ActorContext,
        id: Uuid,
        command: RejectCommand,
    ) -> GovernanceResult<ApprovalRequestModel> {
        let command = RejectCommand::new(command.comments);
        command.validate()?;

        let mut request = load_pending(session, id).await?;
        if !request.remaining_chain().contains(&actor.actor_id) {
            return Err(GovernanceError::permission(
                actor.actor_id,
                format!("not among the remaining approvers of request {id}"),
            ));
        }
        require_plant(actor, &request)?;

        let previous_hash = request.hash;
        request.status = ApprovalStatus::Rejected;
        request.approved_by = Some(actor.actor_id);
        request.approved_at = Some(now_micros());
        request.approval_comments = bounded_opt("approval_comments", Some(command.comments.as_str()))
            .map_err(GovernanceError::Validation)?;
        swap(session, &mut request, previous_hash).await?;

        AuditLogger::record(
            session.activity_logs(),
            ActivityEntry::new(request.table_name.as_str(), ActivityAction::Reject, actor.actor_id)
                .record(request.record_id)
                .subject(request.id)
                .plant(request.plant_id)
                .values(request.old_value.clone(), request.new_value.clone())
                .status(request.status)
                .comments(Some(command.comments.as_str())),
        )
        .await?;

        info!(request_id = %id, actor_id = actor.actor_id, "Rejected staged mutation");
        Ok(request)
    }

    /// Blocks a delete, or an update into an inactive status, of a record that
    /// active dependents still reference.
    async fn check_integrity<S: UnitOfWorkSession>(
        &self,
        session: &S,
        request: &ApprovalRequestModel,
    ) -> GovernanceResult<()> {
        let Some(record_id) = request.record_id else {
            return Ok(());
        };
        let rules: Vec<_> = self.config.rules_for(&request.table_name).collect();
        if rules.is_empty() || request.action == MutationAction::Create {
            return Ok(());
        }
        // The stored row decides whether an update deactivates; old_value may be stale.
        let current = session
            .entity_rows()
            .get_row(&request.table_name, record_id)
            .await?
            .map(Value::Object);
        for rule in rules {
            let applies = match request.action {
                MutationAction::Create => false,
                MutationAction::Delete => true,
                MutationAction::Update => {
                    let deactivates = request.new_value.as_ref().is_some_and(|v| rule.deactivates(v));
                    let already_inactive = current.as_ref().is_some_and(|v| rule.deactivates(v));
                    deactivates && !already_inactive
                }
            };
            if !applies {
                continue;
            }
            let dependents = session
                .integrity()
                .count_active_dependents(rule, record_id)
                .await?;
            if dependents > 0 {
                warn!(
                    request_id = %request.id,
                    table_name = %request.table_name,
                    record_id,
                    dependent_table = %rule.dependent_table,
                    dependents,
                    "Commit blocked by active dependents"
                );
                return Err(GovernanceError::Integrity {
                    table_name: request.table_name.to_string(),
                    record_id,
                    reason: format!(
                        "{dependents} active row(s) in '{}' still reference it through '{}'",
                        rule.dependent_table, rule.foreign_key
                    ),
                });
            }
        }
        Ok(())
    }

    async fn apply_diff<S: UnitOfWorkSession>(
        &self,
        session: &S,
        request: &ApprovalRequestModel,
        record_id: RecordId,
    ) -> GovernanceResult<()> {
        let rows = session.entity_rows();
        let applied = match request.action {
            MutationAction::Create => true,
            MutationAction::Update => {
                let values = request
                    .new_value
                    .as_ref()
                    .map(writable_columns)
                    .unwrap_or_default();
                rows.update_row(&request.table_name, record_id, &values).await?
            }
            MutationAction::Delete => rows.delete_row(&request.table_name, record_id).await?,
        };
        if applied {
            Ok(())
        } else {
            Err(GovernanceError::NotFound(format!(
                "{} {record_id}",
                request.table_name
            )))
        }
    }
}

/// Trims optional decision comments; blank becomes None.
pub(crate) fn normalize_comments(comments: Option<String>) -> GovernanceResult<Option<String>> {
    let comments = comments
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());
    if let Some(c) = &comments {
        if c.chars().count() as u64 > MAX_COMMENT_LENGTH {
            return Err(GovernanceError::Validation(format!(
                "comments exceed {MAX_COMMENT_LENGTH} characters"
            )));
        }
    }
    Ok(comments)
}

async fn load_pending<S: UnitOfWorkSession>(
    session: &S,
    id: Uuid,
) -> GovernanceResult<ApprovalRequestModel> {
    let request = session
        .approval_requests()
        .load(id)
        .await?
        .ok_or_else(|| GovernanceError::NotFound(format!("{ENTITY} {id}")))?;
    if request.status.is_terminal() {
        return Err(GovernanceError::conflict(
            ENTITY,
            id,
            request.status,
            "already processed",
        ));
    }
    Ok(request)
}

fn require_plant(actor: &ActorContext, request: &ApprovalRequestModel) -> GovernanceResult<()> {
    match request.plant_id {
        Some(plant_id) if !actor.is_permitted_plant(plant_id) => Err(GovernanceError::permission(
            actor.actor_id,
            format!("plant {plant_id} is outside the actor's plant scope"),
        )),
        _ => Ok(()),
    }
}

/// Writes `request` over the stored row if nobody changed it since it was read.
async fn swap<S: UnitOfWorkSession>(
    session: &S,
    request: &mut ApprovalRequestModel,
    previous_hash: i64,
) -> GovernanceResult<()> {
    request.rehash().map_err(GovernanceError::Storage)?;
    if session
        .approval_requests()
        .update_guarded(request, previous_hash)
        .await?
    {
        return Ok(());
    }

    let observed = session
        .approval_requests()
        .load(request.id)
        .await?
        .map(|current| current.status.to_string())
        .unwrap_or_else(|| "MISSING".to_string());
    warn!(request_id = %request.id, observed = %observed, "Lost approval race");
    Err(GovernanceError::conflict(
        ENTITY,
        request.id,
        observed,
        "changed concurrently",
    ))
}
