use crate::executor::Executor;
use crate::utils::{get_json, TryFromRow};
use governance_core_db::models::permission::RoleGrantModel;
use sqlx::{postgres::PgRow, Row};
use std::error::Error;

pub struct RoleGrantRepositoryImpl {
    pub executor: Executor,
}

impl RoleGrantRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

impl TryFromRow<PgRow> for RoleGrantModel {
    fn try_from_row(row: &PgRow) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(RoleGrantModel {
            id: row.try_get("id")?,
            role_id: row.try_get("role_id")?,
            expression: get_json(row, "expression")?,
        })
    }
}
