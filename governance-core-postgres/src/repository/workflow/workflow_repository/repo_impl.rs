use crate::executor::Executor;
use crate::utils::{get_heapless_string, get_optional_heapless_string, TryFromRow};
use governance_core_db::models::workflow::WorkflowModel;
use sqlx::{postgres::PgRow, Row};
use std::error::Error;

/// Read-only: workflows are administered outside the engine.
pub struct WorkflowRepositoryImpl {
    pub executor: Executor,
}

impl WorkflowRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

impl TryFromRow<PgRow> for WorkflowModel {
    fn try_from_row(row: &PgRow) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(WorkflowModel {
            id: row.try_get("id")?,
            name: get_heapless_string(row, "name")?,
            plant_id: row.try_get("plant_id")?,
            department_id: row.try_get("department_id")?,
            category: get_optional_heapless_string(row, "category")?,
            approver_1: row.try_get("approver_1")?,
            approver_2: row.try_get("approver_2")?,
            approver_3: row.try_get("approver_3")?,
            approver_4: row.try_get("approver_4")?,
            approver_5: row.try_get("approver_5")?,
            max_approvers: row.try_get("max_approvers")?,
            is_active: row.try_get("is_active")?,
            fulfilment_role_id: row.try_get("fulfilment_role_id")?,
        })
    }
}
