use crate::executor::Executor;
use crate::utils::{get_heapless_string, get_optional_heapless_string, TryFromRow};
use governance_core_db::models::approval::ApprovalRequestModel;
use sqlx::{postgres::PgRow, Row};
use std::error::Error;

pub struct ApprovalRequestRepositoryImpl {
    pub executor: Executor,
}

impl ApprovalRequestRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

impl TryFromRow<PgRow> for ApprovalRequestModel {
    fn try_from_row(row: &PgRow) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(ApprovalRequestModel {
            id: row.try_get("id")?,
            module: get_heapless_string(row, "module")?,
            table_name: get_heapless_string(row, "table_name")?,
            action: row.try_get("action")?,
            record_id: row.try_get("record_id")?,
            old_value: row.try_get("old_value")?,
            new_value: row.try_get("new_value")?,
            requested_by: row.try_get("requested_by")?,
            status: row.try_get("status")?,
            comments: get_optional_heapless_string(row, "comments")?,
            created_at: row.try_get("created_at")?,
            approved_by: row.try_get("approved_by")?,
            approved_at: row.try_get("approved_at")?,
            approval_comments: get_optional_heapless_string(row, "approval_comments")?,
            workflow_id: row.try_get("workflow_id")?,
            plant_id: row.try_get("plant_id")?,
            department_id: row.try_get("department_id")?,
            approver_chain: row.try_get("approver_chain")?,
            current_slot: row.try_get("current_slot")?,
            hash: row.try_get("hash")?,
        })
    }
}
