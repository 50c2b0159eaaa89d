use async_trait::async_trait;

use crate::repository::access_repository::{TaskRepository, UserRequestRepository};
use crate::repository::activity_log_repository::ActivityLogRepository;
use crate::repository::approval_request_repository::ApprovalRequestRepository;
use crate::repository::entity_repository::{EntityRowRepository, IntegrityCheck};
use crate::repository::role_grant_repository::RoleGrantRepository;
use crate::repository::workflow_repository::WorkflowRepository;

/// Source of transaction-scoped repository sessions.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    type Session: UnitOfWorkSession;

    async fn begin(&self) -> Result<Self::Session, Box<dyn std::error::Error + Send + Sync>>;
}

/// Repositories sharing one transaction.
///
/// Writes become visible to other sessions only after `commit`. Dropping a session
/// without committing discards its writes.
#[async_trait]
pub trait UnitOfWorkSession: Send + Sync + Sized {
    fn approval_requests(&self) -> &dyn ApprovalRequestRepository;
    fn workflows(&self) -> &dyn WorkflowRepository;
    fn user_requests(&self) -> &dyn UserRequestRepository;
    fn tasks(&self) -> &dyn TaskRepository;
    fn activity_logs(&self) -> &dyn ActivityLogRepository;
    fn role_grants(&self) -> &dyn RoleGrantRepository;
    fn entity_rows(&self) -> &dyn EntityRowRepository;
    fn integrity(&self) -> &dyn IntegrityCheck;

    async fn commit(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
    async fn rollback(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}
