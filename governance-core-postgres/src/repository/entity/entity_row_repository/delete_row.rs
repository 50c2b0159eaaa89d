use governance_core_api::RecordId;
use governance_core_db::models::entity::ENTITY_ID_COLUMN;
use std::error::Error;

use super::repo_impl::EntityRowRepositoryImpl;
use crate::utils::quote_ident;

impl EntityRowRepositoryImpl {
    pub(super) async fn delete_row_impl(
        &self,
        table_name: &str,
        record_id: RecordId,
    ) -> Result<bool, Box<dyn Error + Send + Sync>> {
        let sql = format!(
            "DELETE FROM {} WHERE {} = $1",
            quote_ident(table_name)?,
            quote_ident(ENTITY_ID_COLUMN)?
        );

        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
        let result = sqlx::query(&sql)
            .bind(record_id)
            .execute(&mut **transaction)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_utils::test_utils::{create_temp_tables, object};
    use crate::test_helper::setup_test_context;
    use governance_core_db::repository::EntityRowRepository;
    use serde_json::json;

    #[tokio::test]
    #[ignore = "requires PostgreSQL at DATABASE_URL"]
    async fn test_delete_row() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        create_temp_tables(&ctx.session.executor).await?;
        let repo = &ctx.entity_repos().entity_row_repository;

        let id = repo
            .insert_row("gov_test_plant", &object(json!({"plant_name": "GOA"})))
            .await?;
        assert!(repo.delete_row("gov_test_plant", id).await?);
        assert!(!repo.delete_row("gov_test_plant", id).await?);
        assert!(repo.get_row("gov_test_plant", id).await?.is_none());
        Ok(())
    }
}
