use async_trait::async_trait;
use crate::executor::Executor;
use crate::utils::{get_heapless_string, get_optional_heapless_string, TryFromRow};
use governance_core_api::{PlantFilter, RecordId};
use governance_core_db::models::audit::{ActivityChain, ActivityLogModel};
use governance_core_db::repository::ActivityLogRepository;
use governance_core_db::repository::pagination::{Page, PageRequest};
use sqlx::{postgres::PgRow, Row};
use std::error::Error;
use uuid::Uuid;

/// Append-only: the table rejects UPDATE and DELETE through a trigger.
pub struct ActivityLogRepositoryImpl {
    pub executor: Executor,
}

impl ActivityLogRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }

    /// Count plus one page of the entries of one chain, oldest first, restricted
    /// to the plants admitted by `plants`.
    pub(super) async fn find_page_impl(
        &self,
        key: ChainKey<'_>,
        plants: &PlantFilter,
        page: PageRequest,
    ) -> Result<Page<ActivityLogModel>, Box<dyn Error + Send + Sync>> {
        let (key_filter, plant_param) = match key {
            ChainKey::Record { .. } => ("table_name = $1 AND record_id = $2", 3),
            ChainKey::Subject(_) => ("subject_id = $1", 2),
        };
        let filter = format!("{key_filter} AND (plant_id IS NULL OR plant_id = ANY(${plant_param}))");
        let count_sql = format!("SELECT COUNT(*) AS total FROM activity_log WHERE {filter}");
        let page_sql = format!(
            "SELECT * FROM activity_log WHERE {filter} ORDER BY seq LIMIT ${} OFFSET ${}",
            plant_param + 1,
            plant_param + 2
        );
        let (limit, offset) = page.as_sql_bounds();

        let mut count_query = sqlx::query(&count_sql);
        let mut page_query = sqlx::query(&page_sql);
        match key {
            ChainKey::Record {
                table_name,
                record_id,
            } => {
                count_query = count_query.bind(table_name).bind(record_id);
                page_query = page_query.bind(table_name).bind(record_id);
            }
            ChainKey::Subject(subject_id) => {
                count_query = count_query.bind(subject_id);
                page_query = page_query.bind(subject_id);
            }
        }

        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

        let total: i64 = count_query
            .bind(&plants.permitted_plant_ids)
            .fetch_one(&mut **transaction)
            .await?
            .try_get("total")?;

        let rows = page_query
            .bind(&plants.permitted_plant_ids)
            .bind(limit)
            .bind(offset)
            .fetch_all(&mut **transaction)
            .await?;

        let items = rows
            .iter()
            .map(ActivityLogModel::try_from_row)
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
impl ActivityLogRepository for ActivityLogRepositoryImpl {
    async fn find_by_record(
        &self,
        table_name: &str,
        record_id: RecordId,
        plants: &PlantFilter,
        page: PageRequest,
    ) -> Result<Page<ActivityLogModel>, Box<dyn Error + Send + Sync>> {
        self.find_by_record_impl(table_name, record_id, plants, page)
            .await
    }

    async fn find_by_subject(
        &self,
        subject_id: Uuid,
        plants: &PlantFilter,
        page: PageRequest,
    ) -> Result<Page<ActivityLogModel>, Box<dyn Error + Send + Sync>> {
        self.find_by_subject_impl(subject_id, plants, page).await
    }

    async fn last_hash(&self, chain: &ActivityChain) -> Result<i64, Box<dyn Error + Send + Sync>> {
        self.last_hash_impl(chain).await
    }
}

/// Key selecting one chain of entries.
#[derive(Debug, Clone, Copy)]
pub(super) enum ChainKey<'k> {
    Record {
        table_name: &'k str,
        record_id: RecordId,
    },
    Subject(Uuid),
}

impl TryFromRow<PgRow> for ActivityLogModel {
    fn try_from_row(row: &PgRow) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(ActivityLogModel {
            id: row.try_get("id")?,
            table_name: get_heapless_string(row, "table_name")?,
            record_id: row.try_get("record_id")?,
            subject_id: row.try_get("subject_id")?,
            plant_id: row.try_get("plant_id")?,
            action: row.try_get("action")?,
            old_value: row.try_get("old_value")?,
            new_value: row.try_get("new_value")?,
            performed_by: row.try_get("performed_by")?,
            approve_status: get_optional_heapless_string(row, "approve_status")?,
            comments: get_optional_heapless_string(row, "comments")?,
            timestamp: row.try_get("timestamp")?,
            antecedent_hash: row.try_get("antecedent_hash")?,
            hash: row.try_get("hash")?,
        })
    }
}
