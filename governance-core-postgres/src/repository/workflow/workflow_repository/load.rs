use async_trait::async_trait;
use governance_core_db::models::workflow::WorkflowModel;
use governance_core_db::repository::load::Load;
use crate::utils::TryFromRow;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::WorkflowRepositoryImpl;

#[async_trait]
impl Load<WorkflowModel> for WorkflowRepositoryImpl {
    async fn load(&self, id: Uuid) -> Result<Option<WorkflowModel>, Box<dyn Error + Send + Sync>> {
        let row = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
            sqlx::query("SELECT * FROM workflow WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut **transaction)
                .await?
        };
        row.as_ref().map(WorkflowModel::try_from_row).transpose()
    }
}
