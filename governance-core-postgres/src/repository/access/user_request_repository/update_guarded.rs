use async_trait::async_trait;
use governance_core_db::models::access::UserRequestModel;
use governance_core_db::repository::guarded_update::GuardedUpdate;
use std::error::Error;

use super::repo_impl::UserRequestRepositoryImpl;

#[async_trait]
impl GuardedUpdate<UserRequestModel> for UserRequestRepositoryImpl {
    async fn update_guarded(
        &self,
        item: &UserRequestModel,
        expected_hash: i64,
    ) -> Result<bool, Box<dyn Error + Send + Sync>> {
        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

        let result = sqlx::query(
            r#"
            UPDATE user_request
            SET status = $2, updated_at = $3, hash = $4
            WHERE id = $1 AND hash = $5
            "#,
        )
        .bind(item.id)
        .bind(item.status)
        .bind(item.updated_at)
        .bind(item.hash)
        .bind(expected_hash)
        .execute(&mut **transaction)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_utils::test_utils::create_test_user_request;
    use crate::test_helper::setup_test_context;
    use governance_core_api::UserRequestStatus;
    use governance_core_db::repository::create_batch::CreateBatch;
    use governance_core_db::repository::guarded_update::GuardedUpdate;

    #[tokio::test]
    #[ignore = "requires PostgreSQL at DATABASE_URL"]
    async fn test_update_guarded() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let repo = &ctx.access_repos().user_request_repository;

        let request = create_test_user_request();
        repo.create_batch(vec![request.clone()]).await?;

        let mut partial = request.clone();
        partial.status = UserRequestStatus::Partial;
        partial.rehash()?;
        assert!(repo.update_guarded(&partial, request.hash).await?);
        assert!(!repo.update_guarded(&partial, request.hash).await?);
        Ok(())
    }
}
