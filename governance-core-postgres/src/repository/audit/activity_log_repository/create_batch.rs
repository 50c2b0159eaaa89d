use async_trait::async_trait;
use governance_core_db::models::audit::ActivityLogModel;
use governance_core_db::repository::create_batch::CreateBatch;
use std::error::Error;

use super::repo_impl::ActivityLogRepositoryImpl;

#[async_trait]
impl CreateBatch<ActivityLogModel> for ActivityLogRepositoryImpl {
    async fn create_batch(
        &self,
        items: Vec<ActivityLogModel>,
    ) -> Result<Vec<ActivityLogModel>, Box<dyn Error + Send + Sync>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
        for item in &items {
            sqlx::query(
                r#"
                INSERT INTO activity_log (
                    id, table_name, record_id, subject_id, plant_id, action, old_value, new_value,
                    performed_by, approve_status, comments, "timestamp", antecedent_hash, hash
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
                "#,
            )
            .bind(item.id)
            .bind(item.table_name.as_str())
            .bind(item.record_id)
            .bind(item.subject_id)
            .bind(item.plant_id)
            .bind(item.action)
            .bind(&item.old_value)
            .bind(&item.new_value)
            .bind(item.performed_by)
            .bind(item.approve_status.as_ref().map(|s| s.as_str()))
            .bind(item.comments.as_ref().map(|s| s.as_str()))
            .bind(item.timestamp)
            .bind(item.antecedent_hash)
            .bind(item.hash)
            .execute(&mut **transaction)
            .await?;
        }
        Ok(items)
    }
}
