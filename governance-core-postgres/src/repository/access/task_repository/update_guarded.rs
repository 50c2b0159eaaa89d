use async_trait::async_trait;
use governance_core_db::models::access::TaskModel;
use governance_core_db::repository::guarded_update::GuardedUpdate;
use std::error::Error;

use super::repo_impl::TaskRepositoryImpl;

#[async_trait]
impl GuardedUpdate<TaskModel> for TaskRepositoryImpl {
    async fn update_guarded(
        &self,
        item: &TaskModel,
        expected_hash: i64,
    ) -> Result<bool, Box<dyn Error + Send + Sync>> {
        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

        let result = sqlx::query(
            r#"
            UPDATE task
            SET current_slot = $2, task_status = $3, last_actor = $4, comments = $5,
                updated_at = $6, hash = $7
            WHERE id = $1 AND hash = $8
            "#,
        )
        .bind(item.id)
        .bind(item.current_slot)
        .bind(item.task_status)
        .bind(item.last_actor)
        .bind(item.comments.as_ref().map(|s| s.as_str()))
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
    use super::super::test_utils::test_utils::setup_test_tasks;
    use crate::test_helper::setup_test_context;
    use governance_core_api::TaskStatus;
    use governance_core_db::repository::guarded_update::GuardedUpdate;
    use governance_core_db::repository::load::Load;

    #[tokio::test]
    #[ignore = "requires PostgreSQL at DATABASE_URL"]
    async fn test_update_guarded() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let (_, tasks) = setup_test_tasks(&ctx, 1).await?;
        let repo = &ctx.access_repos().task_repository;
        let task = tasks[0].clone();

        let mut assigned = task.clone();
        assigned.current_slot = 1;
        assigned.task_status = TaskStatus::Assigned;
        assigned.last_actor = Some(11);
        assigned.rehash()?;
        assert!(repo.update_guarded(&assigned, task.hash).await?);

        let mut late = task.clone();
        late.task_status = TaskStatus::Rejected;
        late.rehash()?;
        assert!(!repo.update_guarded(&late, task.hash).await?);

        assert_eq!(repo.load(task.id).await?, Some(assigned));
        Ok(())
    }
}
