use async_trait::async_trait;
use governance_core_db::models::approval::ApprovalRequestModel;
use governance_core_db::repository::create_batch::CreateBatch;
use std::error::Error;

use super::repo_impl::ApprovalRequestRepositoryImpl;

impl ApprovalRequestRepositoryImpl {
    pub(super) async fn create_batch_impl(
        repo: &ApprovalRequestRepositoryImpl,
        items: Vec<ApprovalRequestModel>,
    ) -> Result<Vec<ApprovalRequestModel>, Box<dyn Error + Send + Sync>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let mut saved_items = Vec::with_capacity(items.len());
        let mut tx = repo.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

        for item in items {
            sqlx::query(
                r#"
                INSERT INTO approval_request (
                    id, module, table_name, action, record_id, old_value, new_value,
                    requested_by, status, comments, created_at,
                    approved_by, approved_at, approval_comments,
                    workflow_id, plant_id, department_id, approver_chain, current_slot, hash
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20)
                "#,
            )
            .bind(item.id)
            .bind(item.module.as_str())
            .bind(item.table_name.as_str())
            .bind(item.action)
            .bind(item.record_id)
            .bind(&item.old_value)
            .bind(&item.new_value)
            .bind(item.requested_by)
            .bind(item.status)
            .bind(item.comments.as_ref().map(|s| s.as_str()))
            .bind(item.created_at)
            .bind(item.approved_by)
            .bind(item.approved_at)
            .bind(item.approval_comments.as_ref().map(|s| s.as_str()))
            .bind(item.workflow_id)
            .bind(item.plant_id)
            .bind(item.department_id)
            .bind(&item.approver_chain)
            .bind(item.current_slot)
            .bind(item.hash)
            .execute(&mut **transaction)
            .await?;

            saved_items.push(item);
        }

        Ok(saved_items)
    }
}

#[async_trait]
impl CreateBatch<ApprovalRequestModel> for ApprovalRequestRepositoryImpl {
    async fn create_batch(
        &self,
        items: Vec<ApprovalRequestModel>,
    ) -> Result<Vec<ApprovalRequestModel>, Box<dyn Error + Send + Sync>> {
        Self::create_batch_impl(self, items).await
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_utils::test_utils::{create_test_request, insert_test_workflow};
    use crate::test_helper::setup_test_context;
    use governance_core_db::repository::create_batch::CreateBatch;
    use governance_core_db::repository::load::Load;

    #[tokio::test]
    #[ignore = "requires PostgreSQL at DATABASE_URL"]
    async fn test_create_batch() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let workflow_id = insert_test_workflow(&ctx.session.executor).await?;
        let repo = &ctx.approval_repos().approval_request_repository;

        let requests = vec![
            create_test_request(workflow_id, vec![11, 12]),
            create_test_request(workflow_id, vec![3]),
        ];
        let saved = repo.create_batch(requests.clone()).await?;
        assert_eq!(saved.len(), 2);

        for request in &requests {
            let loaded = repo.load(request.id).await?.expect("request should exist");
            assert_eq!(&loaded, request);
        }
        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires PostgreSQL at DATABASE_URL"]
    async fn test_create_batch_empty() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let repo = &ctx.approval_repos().approval_request_repository;

        let saved = repo.create_batch(Vec::new()).await?;
        assert!(saved.is_empty());
        Ok(())
    }
}
