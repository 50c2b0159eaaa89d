use async_trait::async_trait;
use governance_core_db::models::approval::ApprovalRequestModel;
use governance_core_db::repository::guarded_update::GuardedUpdate;
use std::error::Error;

use super::repo_impl::ApprovalRequestRepositoryImpl;

impl ApprovalRequestRepositoryImpl {
    /// Single conditional UPDATE: the row changes only if it is still PENDING and
    /// its hash is the one the caller read.
    pub(super) async fn update_guarded_impl(
        repo: &ApprovalRequestRepositoryImpl,
        item: &ApprovalRequestModel,
        expected_hash: i64,
    ) -> Result<bool, Box<dyn Error + Send + Sync>> {
        let mut tx = repo.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

        let result = sqlx::query(
            r#"
            UPDATE approval_request
            SET record_id = $2, status = $3,
                approved_by = $4, approved_at = $5, approval_comments = $6,
                current_slot = $7, hash = $8
            WHERE id = $1 AND hash = $9 AND status = 'PENDING'
            "#,
        )
        .bind(item.id)
        .bind(item.record_id)
        .bind(item.status)
        .bind(item.approved_by)
        .bind(item.approved_at)
        .bind(item.approval_comments.as_ref().map(|s| s.as_str()))
        .bind(item.current_slot)
        .bind(item.hash)
        .bind(expected_hash)
        .execute(&mut **transaction)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}

#[async_trait]
impl GuardedUpdate<ApprovalRequestModel> for ApprovalRequestRepositoryImpl {
    async fn update_guarded(
        &self,
        item: &ApprovalRequestModel,
        expected_hash: i64,
    ) -> Result<bool, Box<dyn Error + Send + Sync>> {
        Self::update_guarded_impl(self, item, expected_hash).await
    }
}
