use crate::executor::Executor;
use crate::utils::{get_optional_heapless_string, TryFromRow};
use governance_core_db::models::access::TaskModel;
use sqlx::{postgres::PgRow, Row};
use std::error::Error;

pub struct TaskRepositoryImpl {
    pub executor: Executor,
}

impl TaskRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

impl TryFromRow<PgRow> for TaskModel {
    fn try_from_row(row: &PgRow) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(TaskModel {
            id: row.try_get("id")?,
            user_request_id: row.try_get("user_request_id")?,
            application_id: row.try_get("application_id")?,
            access_role_id: row.try_get("access_role_id")?,
            plant_id: row.try_get("plant_id")?,
            department_id: row.try_get("department_id")?,
            workflow_id: row.try_get("workflow_id")?,
            approver_chain: row.try_get("approver_chain")?,
            current_slot: row.try_get("current_slot")?,
            fulfilment_role_id: row.try_get("fulfilment_role_id")?,
            task_status: row.try_get("task_status")?,
            justification: get_optional_heapless_string(row, "justification")?,
            last_actor: row.try_get("last_actor")?,
            comments: get_optional_heapless_string(row, "comments")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
            hash: row.try_get("hash")?,
        })
    }
}
