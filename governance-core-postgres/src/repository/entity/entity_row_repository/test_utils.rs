#[cfg(test)]
pub mod test_utils {
    use crate::executor::Executor;
    use governance_core_db::models::entity::EntityRow;
    use serde_json::Value;

    /// Session-local stand-ins for host entity tables, dropped with the transaction.
    pub async fn create_temp_tables(
        executor: &Executor,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut tx = executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
        sqlx::query(
            r#"
            CREATE TEMP TABLE gov_test_plant (
                id BIGSERIAL PRIMARY KEY,
                plant_name TEXT,
                status TEXT NOT NULL DEFAULT 'ACTIVE'
            ) ON COMMIT DROP
            "#,
        )
        .execute(&mut **transaction)
        .await?;
        sqlx::query(
            r#"
            CREATE TEMP TABLE gov_test_department (
                id BIGSERIAL PRIMARY KEY,
                plant_id BIGINT,
                status TEXT NOT NULL DEFAULT 'ACTIVE'
            ) ON COMMIT DROP
            "#,
        )
        .execute(&mut **transaction)
        .await?;
        Ok(())
    }

    pub fn object(value: Value) -> EntityRow {
        match value {
            Value::Object(fields) => fields,
            other => panic!("expected a JSON object, got {other}"),
        }
    }
}
