use async_trait::async_trait;
use governance_core_db::models::access::TaskModel;
use governance_core_db::repository::TaskRepository;
use crate::utils::TryFromRow;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::TaskRepositoryImpl;

#[async_trait]
impl TaskRepository for TaskRepositoryImpl {
    async fn find_by_user_request_id(
        &self,
        user_request_id: Uuid,
    ) -> Result<Vec<TaskModel>, Box<dyn Error + Send + Sync>> {
        let rows = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
            sqlx::query("SELECT * FROM task WHERE user_request_id = $1 ORDER BY seq")
                .bind(user_request_id)
                .fetch_all(&mut **transaction)
                .await?
        };
        rows.iter().map(TaskModel::try_from_row).collect()
    }
}
