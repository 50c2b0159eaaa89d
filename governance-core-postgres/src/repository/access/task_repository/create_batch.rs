use async_trait::async_trait;
use governance_core_db::models::access::TaskModel;
use governance_core_db::repository::create_batch::CreateBatch;
use std::error::Error;

use super::repo_impl::TaskRepositoryImpl;

impl TaskRepositoryImpl {
    pub(super) async fn create_batch_impl(
        repo: &TaskRepositoryImpl,
        items: Vec<TaskModel>,
    ) -> Result<Vec<TaskModel>, Box<dyn Error + Send + Sync>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = repo.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

        // Inserted one by one so `seq` follows the order of `items`.
        for item in &items {
            sqlx::query(
                r#"
                INSERT INTO task (
                    id, user_request_id, application_id, access_role_id, plant_id, department_id,
                    workflow_id, approver_chain, current_slot, fulfilment_role_id, task_status,
                    justification, last_actor, comments, created_at, updated_at, hash
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
                "#,
            )
            .bind(item.id)
            .bind(item.user_request_id)
            .bind(item.application_id)
            .bind(item.access_role_id)
            .bind(item.plant_id)
            .bind(item.department_id)
            .bind(item.workflow_id)
            .bind(&item.approver_chain)
            .bind(item.current_slot)
            .bind(item.fulfilment_role_id)
            .bind(item.task_status)
            .bind(item.justification.as_ref().map(|s| s.as_str()))
            .bind(item.last_actor)
            .bind(item.comments.as_ref().map(|s| s.as_str()))
            .bind(item.created_at)
            .bind(item.updated_at)
            .bind(item.hash)
            .execute(&mut **transaction)
            .await?;
        }

        Ok(items)
    }
}

#[async_trait]
impl CreateBatch<TaskModel> for TaskRepositoryImpl {
    async fn create_batch(
        &self,
        items: Vec<TaskModel>,
    ) -> Result<Vec<TaskModel>, Box<dyn Error + Send + Sync>> {
        Self::create_batch_impl(self, items).await
    }
}
