use async_trait::async_trait;
use governance_core_api::RecordId;
use governance_core_db::models::entity::DependencyRule;
use governance_core_db::repository::IntegrityCheck;
use sqlx::Row;
use std::error::Error;

use super::repo_impl::EntityRowRepositoryImpl;
use crate::utils::quote_ident;

#[async_trait]
impl IntegrityCheck for EntityRowRepositoryImpl {
    async fn count_active_dependents(
        &self,
        rule: &DependencyRule,
        record_id: RecordId,
    ) -> Result<i64, Box<dyn Error + Send + Sync>> {
        let sql = format!(
            "SELECT COUNT(*) AS total FROM {} WHERE {} = $1 AND {}::text = ANY($2)",
            quote_ident(&rule.dependent_table)?,
            quote_ident(&rule.foreign_key)?,
            quote_ident(&rule.dependent_status_field)?
        );

        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
        let row = sqlx::query(&sql)
            .bind(record_id)
            .bind(&rule.active_values)
            .fetch_one(&mut **transaction)
            .await?;
        Ok(row.try_get("total")?)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_utils::test_utils::{create_temp_tables, object};
    use crate::test_helper::setup_test_context;
    use governance_core_db::models::entity::DependencyRule;
    use governance_core_db::repository::{EntityRowRepository, IntegrityCheck};
    use serde_json::json;

    #[tokio::test]
    #[ignore = "requires PostgreSQL at DATABASE_URL"]
    async fn test_count_active_dependents() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        create_temp_tables(&ctx.session.executor).await?;
        let repo = &ctx.entity_repos().entity_row_repository;

        let plant = repo
            .insert_row("gov_test_plant", &object(json!({"plant_name": "GOA"})))
            .await?;
        for status in ["ACTIVE", "ACTIVE", "INACTIVE"] {
            repo.insert_row(
                "gov_test_department",
                &object(json!({"plant_id": plant, "status": status})),
            )
            .await?;
        }

        let rule = DependencyRule {
            table_name: "gov_test_plant".to_string(),
            status_field: "status".to_string(),
            inactive_values: vec!["INACTIVE".to_string()],
            dependent_table: "gov_test_department".to_string(),
            foreign_key: "plant_id".to_string(),
            dependent_status_field: "status".to_string(),
            active_values: vec!["ACTIVE".to_string()],
        };
        assert_eq!(repo.count_active_dependents(&rule, plant).await?, 2);
        assert_eq!(repo.count_active_dependents(&rule, plant + 1000).await?, 0);
        Ok(())
    }
}
