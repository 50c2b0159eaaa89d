use governance_core_api::RecordId;
use governance_core_db::models::entity::{EntityRow, ENTITY_ID_COLUMN};
use serde_json::Value;
use std::error::Error;

use super::repo_impl::{writable_column_names, EntityRowRepositoryImpl};
use crate::utils::{quote_columns, quote_ident};

impl EntityRowRepositoryImpl {
    /// Overwrites the columns present in `values`. Returns false when the row
    /// does not exist.
    pub(super) async fn update_row_impl(
        &self,
        table_name: &str,
        record_id: RecordId,
        values: &EntityRow,
    ) -> Result<bool, Box<dyn Error + Send + Sync>> {
        let table = quote_ident(table_name)?;
        let id_column = quote_ident(ENTITY_ID_COLUMN)?;
        let columns = writable_column_names(values);

        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

        if columns.is_empty() {
            let sql = format!("SELECT 1 FROM {table} WHERE {id_column} = $1");
            let row = sqlx::query(&sql)
                .bind(record_id)
                .fetch_optional(&mut **transaction)
                .await?;
            return Ok(row.is_some());
        }

        let columns = quote_columns(columns)?;
        let sql = format!(
            "UPDATE {table} SET ({columns}) = \
             (SELECT {columns} FROM jsonb_populate_record(NULL::{table}, $2)) \
             WHERE {id_column} = $1"
        );
        let result = sqlx::query(&sql)
            .bind(record_id)
            .bind(Value::Object(values.clone()))
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
    async fn test_update_row() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        create_temp_tables(&ctx.session.executor).await?;
        let repo = &ctx.entity_repos().entity_row_repository;

        let id = repo
            .insert_row("gov_test_plant", &object(json!({"plant_name": "GOA", "status": "ACTIVE"})))
            .await?;

        let changed = repo
            .update_row("gov_test_plant", id, &object(json!({"id": id, "status": "INACTIVE"})))
            .await?;
        assert!(changed);

        let row = repo.get_row("gov_test_plant", id).await?.ok_or("row missing")?;
        assert_eq!(row.get("status"), Some(&json!("INACTIVE")));
        assert_eq!(row.get("plant_name"), Some(&json!("GOA")));

        assert!(repo.update_row("gov_test_plant", id, &object(json!({}))).await?);
        assert!(
            !repo
                .update_row("gov_test_plant", id + 1000, &object(json!({"status": "ACTIVE"})))
                .await?
        );
        assert!(!repo.update_row("gov_test_plant", id + 1000, &object(json!({}))).await?);
        Ok(())
    }
}
