use async_trait::async_trait;
use governance_core_db::models::access::UserRequestModel;
use governance_core_db::repository::load::Load;
use crate::utils::TryFromRow;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::UserRequestRepositoryImpl;

impl UserRequestRepositoryImpl {
    /// Shared by `load` and `lock_for_update`; `locking` appends FOR UPDATE.
    pub(super) async fn fetch_one_impl(
        &self,
        id: Uuid,
        locking: bool,
    ) -> Result<Option<UserRequestModel>, Box<dyn Error + Send + Sync>> {
        let query = if locking {
            "SELECT * FROM user_request WHERE id = $1 FOR UPDATE"
        } else {
            "SELECT * FROM user_request WHERE id = $1"
        };
        let row = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
            sqlx::query(query)
                .bind(id)
                .fetch_optional(&mut **transaction)
                .await?
        };
        row.as_ref().map(UserRequestModel::try_from_row).transpose()
    }
}

#[async_trait]
impl Load<UserRequestModel> for UserRequestRepositoryImpl {
    async fn load(&self, id: Uuid) -> Result<Option<UserRequestModel>, Box<dyn Error + Send + Sync>> {
        self.fetch_one_impl(id, false).await
    }
}
