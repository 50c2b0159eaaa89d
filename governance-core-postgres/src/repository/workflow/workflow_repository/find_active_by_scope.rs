use async_trait::async_trait;
use governance_core_api::Scope;
use governance_core_db::models::workflow::WorkflowModel;
use governance_core_db::repository::WorkflowRepository;
use crate::utils::TryFromRow;
use std::error::Error;

use super::repo_impl::WorkflowRepositoryImpl;

impl WorkflowRepositoryImpl {
    pub(super) async fn find_active_by_scope_impl(
        repo: &WorkflowRepositoryImpl,
        scope: &Scope,
    ) -> Result<Vec<WorkflowModel>, Box<dyn Error + Send + Sync>> {
        let mut tx = repo.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

        let rows = match scope {
            Scope::Plant {
                plant_id,
                department_id,
            } => {
                sqlx::query(
                    r#"
                    SELECT * FROM workflow
                    WHERE is_active AND category IS NULL
                      AND plant_id = $1 AND department_id IS NOT DISTINCT FROM $2
                    ORDER BY id
                    "#,
                )
                .bind(plant_id)
                .bind(department_id)
                .fetch_all(&mut **transaction)
                .await?
            }
            Scope::Corporate { category } => {
                sqlx::query(
                    r#"
                    SELECT * FROM workflow
                    WHERE is_active AND plant_id IS NULL AND category = $1
                    ORDER BY id
                    "#,
                )
                .bind(category.as_str())
                .fetch_all(&mut **transaction)
                .await?
            }
        };

        rows.iter().map(WorkflowModel::try_from_row).collect()
    }
}

#[async_trait]
impl WorkflowRepository for WorkflowRepositoryImpl {
    async fn find_active_by_scope(
        &self,
        scope: &Scope,
    ) -> Result<Vec<WorkflowModel>, Box<dyn Error + Send + Sync>> {
        Self::find_active_by_scope_impl(self, scope).await
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_utils::test_utils::{create_test_workflow, insert_workflow};
    use crate::test_helper::setup_test_context;
    use governance_core_api::Scope;
    use governance_core_db::repository::load::Load;
    use governance_core_db::repository::WorkflowRepository;

    #[tokio::test]
    #[ignore = "requires PostgreSQL at DATABASE_URL"]
    async fn test_scope_matching() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let executor = &ctx.session.executor;
        let repo = &ctx.workflow_repos().workflow_repository;

        let plant_level = create_test_workflow(Some(8101), None, &[11, 12]);
        let department_level = create_test_workflow(Some(8101), Some(4), &[13]);
        let mut retired = create_test_workflow(Some(8101), None, &[14]);
        retired.is_active = false;
        for workflow in [&plant_level, &department_level, &retired] {
            insert_workflow(executor, workflow).await?;
        }

        let found = repo
            .find_active_by_scope(&Scope::Plant { plant_id: 8101, department_id: None })
            .await?;
        assert_eq!(found, vec![plant_level.clone()]);

        let found = repo
            .find_active_by_scope(&Scope::Plant { plant_id: 8101, department_id: Some(4) })
            .await?;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].chain(), vec![13]);

        assert_eq!(repo.load(retired.id).await?, Some(retired));
        Ok(())
    }
}
