use async_trait::async_trait;
use governance_core_db::models::approval::ApprovalRequestModel;
use governance_core_db::repository::load::Load;
use crate::utils::TryFromRow;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::ApprovalRequestRepositoryImpl;

impl ApprovalRequestRepositoryImpl {
    pub(super) async fn load_impl(
        repo: &ApprovalRequestRepositoryImpl,
        id: Uuid,
    ) -> Result<Option<ApprovalRequestModel>, Box<dyn Error + Send + Sync>> {
        let query = r#"SELECT * FROM approval_request WHERE id = $1"#;
        let row = {
            let mut tx = repo.executor.tx.lock().await;
            if let Some(transaction) = tx.as_mut() {
                sqlx::query(query).bind(id).fetch_optional(&mut **transaction).await?
            } else {
                return Err("Transaction has been consumed".into());
            }
        };

        row.as_ref().map(ApprovalRequestModel::try_from_row).transpose()
    }
}

#[async_trait]
impl Load<ApprovalRequestModel> for ApprovalRequestRepositoryImpl {
    async fn load(&self, id: Uuid) -> Result<Option<ApprovalRequestModel>, Box<dyn Error + Send + Sync>> {
        Self::load_impl(self, id).await
    }
}
