#[cfg(test)]
pub mod test_utils {
    use crate::executor::Executor;
    use governance_core_db::models::permission::RoleGrantModel;

    pub async fn insert_grant(
        executor: &Executor,
        grant: &RoleGrantModel,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut tx = executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
        sqlx::query("INSERT INTO role_grant (id, role_id, expression) VALUES ($1, $2, $3)")
            .bind(grant.id)
            .bind(grant.role_id)
            .bind(serde_json::to_value(&grant.expression)?)
            .execute(&mut **transaction)
            .await?;
        Ok(())
    }
}
