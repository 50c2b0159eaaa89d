use async_trait::async_trait;
use governance_core_api::RecordId;
use governance_core_db::models::entity::{EntityRow, ENTITY_ID_COLUMN};
use governance_core_db::repository::EntityRowRepository;
use std::error::Error;

use crate::executor::Executor;

/// Generic row access to the host's governed entity tables.
///
/// Table and column names come from configuration and snapshots, so they are
/// validated and quoted before being spliced into SQL. Values are always bound
/// as one JSONB parameter and expanded with `jsonb_populate_record`, which
/// applies the column types of the target table.
pub struct EntityRowRepositoryImpl {
    pub executor: Executor,
}

impl EntityRowRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

/// Column names of `values`, without the primary key, in a stable order.
pub(super) fn writable_column_names(values: &EntityRow) -> Vec<&String> {
    let mut columns: Vec<&String> = values
        .keys()
        .filter(|c| c.as_str() != ENTITY_ID_COLUMN)
        .collect();
    columns.sort();
    columns
}

#[async_trait]
impl EntityRowRepository for EntityRowRepositoryImpl {
    async fn get_row(
        &self,
        table_name: &str,
        record_id: RecordId,
    ) -> Result<Option<EntityRow>, Box<dyn Error + Send + Sync>> {
        self.get_row_impl(table_name, record_id).await
    }

    async fn insert_row(
        &self,
        table_name: &str,
        values: &EntityRow,
    ) -> Result<RecordId, Box<dyn Error + Send + Sync>> {
        self.insert_row_impl(table_name, values).await
    }

    async fn update_row(
        &self,
        table_name: &str,
        record_id: RecordId,
        values: &EntityRow,
    ) -> Result<bool, Box<dyn Error + Send + Sync>> {
        self.update_row_impl(table_name, record_id, values).await
    }

    async fn delete_row(
        &self,
        table_name: &str,
        record_id: RecordId,
    ) -> Result<bool, Box<dyn Error + Send + Sync>> {
        self.delete_row_impl(table_name, record_id).await
    }
}
