use async_trait::async_trait;
use governance_core_api::{ApprovalQuery, PlantFilter};
use governance_core_db::models::approval::ApprovalRequestModel;
use governance_core_db::repository::pagination::{Page, PageRequest};
use governance_core_db::repository::ApprovalRequestRepository;
use crate::utils::TryFromRow;
use sqlx::Row;
use std::error::Error;

use super::repo_impl::ApprovalRequestRepositoryImpl;

impl ApprovalRequestRepositoryImpl {
    pub(super) async fn find_page_impl(
        repo: &ApprovalRequestRepositoryImpl,
        query: &ApprovalQuery,
        plants: &PlantFilter,
        page: PageRequest,
    ) -> Result<Page<ApprovalRequestModel>, Box<dyn Error + Send + Sync>> {
        // NULL plant_id is corporate scope and always visible.
        let filter = r#"
            ($1::varchar IS NULL OR module = $1)
            AND ($2::approval_status IS NULL OR status = $2)
            AND (plant_id IS NULL OR plant_id = ANY($3))
        "#;
        let (limit, offset) = page.as_sql_bounds();

        let mut tx = repo.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

        let total: i64 = sqlx::query(&format!("SELECT COUNT(*) AS total FROM approval_request WHERE {filter}"))
            .bind(query.module.as_deref())
            .bind(query.status)
            .bind(&plants.permitted_plant_ids)
            .fetch_one(&mut **transaction)
            .await?
            .try_get("total")?;

        let rows = sqlx::query(&format!(
            "SELECT * FROM approval_request WHERE {filter} ORDER BY created_at DESC, id LIMIT $4 OFFSET $5"
        ))
        .bind(query.module.as_deref())
        .bind(query.status)
        .bind(&plants.permitted_plant_ids)
        .bind(limit)
        .bind(offset)
        .fetch_all(&mut **transaction)
        .await?;

        let items = rows
            .iter()
            .map(ApprovalRequestModel::try_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(
            items,
            usize::try_from(total).unwrap_or(0),
            page.limit,
            page.offset,
        ))
    }
}

#[async_trait]
impl ApprovalRequestRepository for ApprovalRequestRepositoryImpl {
    async fn find_page(
        &self,
        query: &ApprovalQuery,
        plants: &PlantFilter,
        page: PageRequest,
    ) -> Result<Page<ApprovalRequestModel>, Box<dyn Error + Send + Sync>> {
        Self::find_page_impl(self, query, plants, page).await
    }
}
