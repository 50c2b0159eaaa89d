use async_trait::async_trait;
use governance_core_api::RecordId;

use crate::models::entity::{DependencyRule, EntityRow};

/// Row-level access to the host application's entity tables.
///
/// Table and column names are validated by the caller against configuration
/// before they reach an implementation.
#[async_trait]
pub trait EntityRowRepository: Send + Sync {
    async fn get_row(
        &self,
        table_name: &str,
        record_id: RecordId,
    ) -> Result<Option<EntityRow>, Box<dyn std::error::Error + Send + Sync>>;

    /// Inserts `values` (primary key excluded) and returns the assigned id.
    async fn insert_row(
        &self,
        table_name: &str,
        values: &EntityRow,
    ) -> Result<RecordId, Box<dyn std::error::Error + Send + Sync>>;

    /// Overwrites the listed columns only. Returns false when the row does not exist.
    async fn update_row(
        &self,
        table_name: &str,
        record_id: RecordId,
        values: &EntityRow,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>>;

    /// Returns false when the row does not exist.
    async fn delete_row(
        &self,
        table_name: &str,
        record_id: RecordId,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>>;
}

/// Cross-entity reference check consulted before a commit.
#[async_trait]
pub trait IntegrityCheck: Send + Sync {
    /// Number of rows of `rule.dependent_table` that reference `record_id` and are
    /// in one of `rule.active_values`.
    async fn count_active_dependents(
        &self,
        rule: &DependencyRule,
        record_id: RecordId,
    ) -> Result<i64, Box<dyn std::error::Error + Send + Sync>>;
}
