use async_trait::async_trait;
use governance_core_api::{ApprovalQuery, PlantFilter};

use crate::models::approval::ApprovalRequestModel;
use crate::repository::create_batch::CreateBatch;
use crate::repository::guarded_update::GuardedUpdate;
use crate::repository::load::Load;
use crate::repository::pagination::{Page, PageRequest};

/// Storage of staged mutations.
///
/// `update_guarded` only succeeds while the stored row is still PENDING.
#[async_trait]
pub trait ApprovalRequestRepository:
    Load<ApprovalRequestModel> + CreateBatch<ApprovalRequestModel> + GuardedUpdate<ApprovalRequestModel>
{
    /// Requests matching `query` whose plant passes `plants`, newest first.
    async fn find_page(
        &self,
        query: &ApprovalQuery,
        plants: &PlantFilter,
        page: PageRequest,
    ) -> Result<Page<ApprovalRequestModel>, Box<dyn std::error::Error + Send + Sync>>;
}
