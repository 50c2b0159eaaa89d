#[cfg(test)]
pub mod test_utils {
    use crate::executor::Executor;
    use governance_core_api::{ActorId, DepartmentId, PlantId};
    use governance_core_db::models::workflow::WorkflowModel;
    use heapless::String as HeaplessString;
    use uuid::Uuid;

    pub fn create_test_workflow(
        plant_id: Option<PlantId>,
        department_id: Option<DepartmentId>,
        approvers: &[ActorId],
    ) -> WorkflowModel {
        let slot = |i: usize| approvers.get(i).copied();
        WorkflowModel {
            id: Uuid::new_v4(),
            name: HeaplessString::try_from("Test workflow").unwrap(),
            plant_id,
            department_id,
            category: None,
            approver_1: slot(0),
            approver_2: slot(1),
            approver_3: slot(2),
            approver_4: slot(3),
            approver_5: slot(4),
            max_approvers: approvers.len() as i16,
            is_active: true,
            fulfilment_role_id: Some(200),
        }
    }

    pub async fn insert_workflow(
        executor: &Executor,
        workflow: &WorkflowModel,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut tx = executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
        sqlx::query(
            r#"
            INSERT INTO workflow (
                id, name, plant_id, department_id, category,
                approver_1, approver_2, approver_3, approver_4, approver_5,
                max_approvers, is_active, fulfilment_role_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(workflow.id)
        .bind(workflow.name.as_str())
        .bind(workflow.plant_id)
        .bind(workflow.department_id)
        .bind(workflow.category.as_ref().map(|s| s.as_str()))
        .bind(workflow.approver_1)
        .bind(workflow.approver_2)
        .bind(workflow.approver_3)
        .bind(workflow.approver_4)
        .bind(workflow.approver_5)
        .bind(workflow.max_approvers)
        .bind(workflow.is_active)
        .bind(workflow.fulfilment_role_id)
        .execute(&mut **transaction)
        .await?;
        Ok(())
    }
}
