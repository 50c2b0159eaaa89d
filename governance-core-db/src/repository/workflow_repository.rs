use async_trait::async_trait;
use governance_core_api::Scope;

use crate::models::workflow::WorkflowModel;
use crate::repository::load::Load;

#[async_trait]
pub trait WorkflowRepository: Load<WorkflowModel> {
    /// Every active workflow whose scope equals `scope`. More than one row means
    /// the configuration is ambiguous; the caller decides how to report it.
    async fn find_active_by_scope(
        &self,
        scope: &Scope,
    ) -> Result<Vec<WorkflowModel>, Box<dyn std::error::Error + Send + Sync>>;
}
