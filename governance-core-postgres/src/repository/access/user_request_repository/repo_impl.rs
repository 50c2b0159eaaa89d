use crate::executor::Executor;
use crate::utils::{get_optional_heapless_string, TryFromRow};
use governance_core_db::models::access::UserRequestModel;
use sqlx::{postgres::PgRow, Row};
use std::error::Error;

pub struct UserRequestRepositoryImpl {
    pub executor: Executor,
}

impl UserRequestRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

impl TryFromRow<PgRow> for UserRequestModel {
    fn try_from_row(row: &PgRow) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(UserRequestModel {
            id: row.try_get("id")?,
            requested_by: row.try_get("requested_by")?,
            description: get_optional_heapless_string(row, "description")?,
            status: row.try_get("status")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
            hash: row.try_get("hash")?,
        })
    }
}
