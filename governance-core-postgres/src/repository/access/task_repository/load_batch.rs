use async_trait::async_trait;
use governance_core_db::models::access::TaskModel;
use governance_core_db::repository::load::Load;
use governance_core_db::repository::load_batch::LoadBatch;
use crate::utils::TryFromRow;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::TaskRepositoryImpl;

impl TaskRepositoryImpl {
    pub(super) async fn load_batch_impl(
        repo: &TaskRepositoryImpl,
        ids: &[Uuid],
    ) -> Result<Vec<Option<TaskModel>>, Box<dyn Error + Send + Sync>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = r#"SELECT * FROM task WHERE id = ANY($1)"#;
        let rows = {
            let mut tx = repo.executor.tx.lock().await;
            if let Some(transaction) = tx.as_mut() {
                sqlx::query(query).bind(ids).fetch_all(&mut **transaction).await?
            } else {
                return Err("Transaction has been consumed".into());
            }
        };

        let mut item_map = std::collections::HashMap::new();
        for row in rows {
            let item = TaskModel::try_from_row(&row)?;
            item_map.insert(item.id, item);
        }

        let mut result = Vec::with_capacity(ids.len());
        for id in ids {
            result.push(item_map.remove(id));
        }
        Ok(result)
    }
}

#[async_trait]
impl LoadBatch<TaskModel> for TaskRepositoryImpl {
    async fn load_batch(&self, ids: &[Uuid]) -> Result<Vec<Option<TaskModel>>, Box<dyn Error + Send + Sync>> {
        Self::load_batch_impl(self, ids).await
    }
}

#[async_trait]
impl Load<TaskModel> for TaskRepositoryImpl {
    async fn load(&self, id: Uuid) -> Result<Option<TaskModel>, Box<dyn Error + Send + Sync>> {
        Ok(Self::load_batch_impl(self, &[id]).await?.pop().flatten())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_utils::test_utils::setup_test_tasks;
    use crate::test_helper::setup_test_context;
    use governance_core_db::repository::load_batch::LoadBatch;
    use uuid::Uuid;

    #[tokio::test]
    #[ignore = "requires PostgreSQL at DATABASE_URL"]
    async fn test_load_batch_keeps_order_and_gaps() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let (_, tasks) = setup_test_tasks(&ctx, 2).await?;
        let repo = &ctx.access_repos().task_repository;

        let missing = Uuid::new_v4();
        let loaded = repo.load_batch(&[tasks[1].id, missing, tasks[0].id]).await?;
        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded[0].as_ref(), Some(&tasks[1]));
        assert!(loaded[1].is_none());
        assert_eq!(loaded[2].as_ref(), Some(&tasks[0]));
        Ok(())
    }
}
