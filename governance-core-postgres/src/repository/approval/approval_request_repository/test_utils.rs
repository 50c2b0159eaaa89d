#[cfg(test)]
pub mod test_utils {
    use crate::executor::Executor;
    use chrono::{SubsecRound, Utc};
    use governance_core_api::{ActorId, ApprovalStatus, MutationAction};
    use governance_core_db::models::approval::ApprovalRequestModel;
    use heapless::String as HeaplessString;
    use serde_json::json;
    use uuid::Uuid;

    pub fn create_test_request(workflow_id: Uuid, approver_chain: Vec<ActorId>) -> ApprovalRequestModel {
        let mut request = ApprovalRequestModel {
            id: Uuid::new_v4(),
            module: HeaplessString::try_from("system").unwrap(),
            table_name: HeaplessString::try_from("system_inventory").unwrap(),
            action: MutationAction::Create,
            record_id: None,
            old_value: None,
            new_value: Some(json!({"system_name": "MES", "plant_id": 9001})),
            requested_by: 7,
            status: ApprovalStatus::Pending,
            comments: Some(HeaplessString::try_from("new line").unwrap()),
            created_at: Utc::now().trunc_subsecs(6),
            approved_by: None,
            approved_at: None,
            approval_comments: None,
            workflow_id,
            plant_id: Some(9001),
            department_id: None,
            approver_chain,
            current_slot: 0,
            hash: 0,
        };
        request.rehash().unwrap();
        request
    }

    /// Inserts a minimal active plant workflow and returns its id.
    pub async fn insert_test_workflow(
        executor: &Executor,
    ) -> Result<Uuid, Box<dyn std::error::Error + Send + Sync>> {
        let id = Uuid::new_v4();
        let mut tx = executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
        sqlx::query(
            r#"
            INSERT INTO workflow (id, name, plant_id, approver_1, max_approvers, is_active)
            VALUES ($1, 'Test workflow', 9001, 11, 1, TRUE)
            "#,
        )
        .bind(id)
        .execute(&mut **transaction)
        .await?;
        Ok(id)
    }
}
