use async_trait::async_trait;
use uuid::Uuid;

use crate::models::access::{TaskModel, UserRequestModel};
use crate::repository::create_batch::CreateBatch;
use crate::repository::guarded_update::GuardedUpdate;
use crate::repository::load::Load;
use crate::repository::load_batch::LoadBatch;

#[async_trait]
pub trait UserRequestRepository:
    Load<UserRequestModel> + CreateBatch<UserRequestModel> + GuardedUpdate<UserRequestModel>
{
    /// Loads the request and holds a row lock on it until the unit of work ends,
    /// so concurrent task transitions recompute the aggregate one at a time.
    async fn lock_for_update(
        &self,
        id: Uuid,
    ) -> Result<Option<UserRequestModel>, Box<dyn std::error::Error + Send + Sync>>;
}

#[async_trait]
pub trait TaskRepository:
    Load<TaskModel> + LoadBatch<TaskModel> + CreateBatch<TaskModel> + GuardedUpdate<TaskModel>
{
    /// Tasks of one access request in creation order.
    async fn find_by_user_request_id(
        &self,
        user_request_id: Uuid,
    ) -> Result<Vec<TaskModel>, Box<dyn std::error::Error + Send + Sync>>;
}
