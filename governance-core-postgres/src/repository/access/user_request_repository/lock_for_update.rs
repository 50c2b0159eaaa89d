use async_trait::async_trait;
use governance_core_db::models::access::UserRequestModel;
use governance_core_db::repository::UserRequestRepository;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::UserRequestRepositoryImpl;

#[async_trait]
impl UserRequestRepository for UserRequestRepositoryImpl {
    async fn lock_for_update(
        &self,
        id: Uuid,
    ) -> Result<Option<UserRequestModel>, Box<dyn Error + Send + Sync>> {
        self.fetch_one_impl(id, true).await
    }
}
