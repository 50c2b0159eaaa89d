use async_trait::async_trait;
use governance_core_api::RoleId;

use crate::models::permission::RoleGrantModel;

#[async_trait]
pub trait RoleGrantRepository: Send + Sync {
    async fn find_by_role_ids(
        &self,
        role_ids: &[RoleId],
    ) -> Result<Vec<RoleGrantModel>, Box<dyn std::error::Error + Send + Sync>>;
}
