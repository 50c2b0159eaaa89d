use async_trait::async_trait;
use governance_core_api::RoleId;
use governance_core_db::models::permission::RoleGrantModel;
use governance_core_db::repository::RoleGrantRepository;
use std::error::Error;

use super::repo_impl::RoleGrantRepositoryImpl;
use crate::utils::TryFromRow;

#[async_trait]
impl RoleGrantRepository for RoleGrantRepositoryImpl {
    async fn find_by_role_ids(
        &self,
        role_ids: &[RoleId],
    ) -> Result<Vec<RoleGrantModel>, Box<dyn Error + Send + Sync>> {
        if role_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
        let rows = sqlx::query("SELECT * FROM role_grant WHERE role_id = ANY($1) ORDER BY role_id, id")
            .bind(role_ids)
            .fetch_all(&mut **transaction)
            .await?;

        rows.iter().map(RoleGrantModel::try_from_row).collect()
    }
}
