use async_trait::async_trait;
use governance_core_db::models::access::UserRequestModel;
use governance_core_db::repository::create_batch::CreateBatch;
use std::error::Error;

use super::repo_impl::UserRequestRepositoryImpl;

#[async_trait]
impl CreateBatch<UserRequestModel> for UserRequestRepositoryImpl {
    async fn create_batch(
        &self,
        items: Vec<UserRequestModel>,
    ) -> Result<Vec<UserRequestModel>, Box<dyn Error + Send + Sync>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
        for item in &items {
            sqlx::query(
                r#"
                INSERT INTO user_request (id, requested_by, description, status, created_at, updated_at, hash)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(item.id)
            .bind(item.requested_by)
            .bind(item.description.as_ref().map(|s| s.as_str()))
            .bind(item.status)
            .bind(item.created_at)
            .bind(item.updated_at)
            .bind(item.hash)
            .execute(&mut **transaction)
            .await?;
        }
        Ok(items)
    }
}
