use governance_core_api::RecordId;
use governance_core_db::models::entity::{EntityRow, ENTITY_ID_COLUMN};
use serde_json::Value;
use sqlx::Row;
use std::error::Error;

use super::repo_impl::{writable_column_names, EntityRowRepositoryImpl};
use crate::utils::{quote_columns, quote_ident};

impl EntityRowRepositoryImpl {
    /// Inserts `values` (the primary key is ignored) and returns the new row id.
    pub(super) async fn insert_row_impl(
        &self,
        table_name: &str,
        values: &EntityRow,
    ) -> Result<RecordId, Box<dyn Error + Send + Sync>> {
        let table = quote_ident(table_name)?;
        let id_column = quote_ident(ENTITY_ID_COLUMN)?;
        let columns = writable_column_names(values);

        let sql = if columns.is_empty() {
            format!("INSERT INTO {table} DEFAULT VALUES RETURNING {id_column}")
        } else {
            let columns = quote_columns(columns)?;
            format!(
                "INSERT INTO {table} ({columns}) \
                 SELECT {columns} FROM jsonb_populate_record(NULL::{table}, $1) \
                 RETURNING {id_column}"
            )
        };

        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
        let row = sqlx::query(&sql)
            .bind(Value::Object(values.clone()))
            .fetch_one(&mut **transaction)
            .await?;
        Ok(row.try_get(ENTITY_ID_COLUMN)?)
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
    async fn test_insert_row_assigns_id_and_coerces_types() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        create_temp_tables(&ctx.session.executor).await?;
        let repo = &ctx.entity_repos().entity_row_repository;

        let first = repo
            .insert_row("gov_test_plant", &object(json!({"id": 999, "plant_name": "GOA"})))
            .await?;
        let second = repo
            .insert_row("gov_test_plant", &object(json!({"plant_name": "PUNE"})))
            .await?;
        assert_ne!(first, 999);
        assert!(second > first);

        let dependent = repo
            .insert_row(
                "gov_test_department",
                &object(json!({"plant_id": first.to_string(), "status": "ACTIVE"})),
            )
            .await?;
        let row = repo
            .get_row("gov_test_department", dependent)
            .await?
            .ok_or("row missing")?;
        assert_eq!(row.get("plant_id"), Some(&json!(first)));
        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires PostgreSQL at DATABASE_URL"]
    async fn test_insert_row_rejects_unknown_identifier() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        create_temp_tables(&ctx.session.executor).await?;
        let repo = &ctx.entity_repos().entity_row_repository;

        let result = repo
            .insert_row("gov_test_plant", &object(json!({"Plant Name": "GOA"})))
            .await;
        assert!(result.is_err());
        Ok(())
    }
}
