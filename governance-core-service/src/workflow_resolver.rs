use governance_core_api::{ActorId, GovernanceError, GovernanceResult, RoleId, Scope};
use governance_core_db::repository::WorkflowRepository;
use tracing::debug;
use uuid::Uuid;

/// Approver chain selected for a scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedChain {
    pub workflow_id: Uuid,
    pub approvers: Vec<ActorId>,
    pub fulfilment_role_id: Option<RoleId>,
}

/// Maps an organizational scope to its ordered approver chain. Read-only.
pub struct WorkflowResolver;

impl WorkflowResolver {
    /// Fails with `Configuration` when no active workflow or more than one matches,
    /// or when the matching workflow has no approver in its active slots.
    pub async fn resolve(
        workflows: &dyn WorkflowRepository,
        scope: &Scope,
    ) -> GovernanceResult<ResolvedChain> {
        let mut matches: Vec<_> = workflows
            .find_active_by_scope(scope)
            .await?
            .into_iter()
            .filter(|w| w.is_active && w.matches(scope))
            .collect();

        let workflow = match matches.len() {
            0 => {
                return Err(GovernanceError::Configuration(format!(
                    "No active workflow for {scope}"
                )))
            }
            1 => matches.remove(0),
            n => {
                return Err(GovernanceError::Configuration(format!(
                    "{n} active workflows match {scope}"
                )))
            }
        };

        let approvers = workflow.chain();
        if approvers.is_empty() {
            return Err(GovernanceError::Configuration(format!(
                "Workflow '{}' for {scope} has no approvers",
                workflow.name
            )));
        }
        debug!(workflow_id = %workflow.id, %scope, chain = ?approvers, "Resolved approver chain");

        Ok(ResolvedChain {
            workflow_id: workflow.id,
            approvers,
            fulfilment_role_id: workflow.fulfilment_role_id,
        })
    }
}
