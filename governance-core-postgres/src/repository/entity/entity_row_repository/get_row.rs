use governance_core_api::RecordId;
use governance_core_db::models::entity::{EntityRow, ENTITY_ID_COLUMN};
use serde_json::Value;
use sqlx::Row;
use std::error::Error;

use super::repo_impl::EntityRowRepositoryImpl;
use crate::utils::quote_ident;

impl EntityRowRepositoryImpl {
    pub(super) async fn get_row_impl(
        &self,
        table_name: &str,
        record_id: RecordId,
    ) -> Result<Option<EntityRow>, Box<dyn Error + Send + Sync>> {
        let sql = format!(
            "SELECT to_jsonb(t) AS entity FROM {} t WHERE {} = $1",
            quote_ident(table_name)?,
            quote_ident(ENTITY_ID_COLUMN)?
        );

        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
        let row = sqlx::query(&sql)
            .bind(record_id)
            .fetch_optional(&mut **transaction)
            .await?;

        match row {
            Some(row) => match row.try_get::<Value, _>("entity")? {
                Value::Object(fields) => Ok(Some(fields)),
                other => Err(format!("Row of '{table_name}' is not an object: {other}").into()),
            },
            None => Ok(None),
        }
    }
}
