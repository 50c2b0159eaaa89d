use async_trait::async_trait;
use governance_core_api::{PlantFilter, RecordId};
use uuid::Uuid;

use crate::models::audit::{ActivityChain, ActivityLogModel};
use crate::repository::create_batch::CreateBatch;
use crate::repository::pagination::{Page, PageRequest};

/// Append-only audit trail: entries are never updated or deleted.
#[async_trait]
pub trait ActivityLogRepository: CreateBatch<ActivityLogModel> {
    /// Entries about one entity-table row, oldest first. Entries whose plant is
    /// not admitted by `plants` are left out of both the items and the total.
    async fn find_by_record(
        &self,
        table_name: &str,
        record_id: RecordId,
        plants: &PlantFilter,
        page: PageRequest,
    ) -> Result<Page<ActivityLogModel>, Box<dyn std::error::Error + Send + Sync>>;

    /// Entries about one approval request, task or user request, oldest first.
    async fn find_by_subject(
        &self,
        subject_id: Uuid,
        plants: &PlantFilter,
        page: PageRequest,
    ) -> Result<Page<ActivityLogModel>, Box<dyn std::error::Error + Send + Sync>>;

    /// Hash of the newest entry of `chain`, 0 when the chain is empty.
    async fn last_hash(
        &self,
        chain: &ActivityChain,
    ) -> Result<i64, Box<dyn std::error::Error + Send + Sync>>;
}
