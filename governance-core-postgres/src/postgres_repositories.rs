use async_trait::async_trait;
use governance_core_db::repository::{
    ActivityLogRepository, ApprovalRequestRepository, EntityRowRepository, IntegrityCheck,
    RoleGrantRepository, TaskRepository, UnitOfWork, UnitOfWorkSession, UserRequestRepository,
    WorkflowRepository,
};
use sqlx::PgPool;
use std::error::Error;
use std::sync::Arc;

use crate::executor::Executor;
use crate::repository::access::{AccessRepoFactory, AccessRepositories};
use crate::repository::approval::{ApprovalRepoFactory, ApprovalRepositories};
use crate::repository::audit::{AuditRepoFactory, AuditRepositories};
use crate::repository::entity::{EntityRepoFactory, EntityRepositories};
use crate::repository::permission::{PermissionRepoFactory, PermissionRepositories};
use crate::repository::workflow::{WorkflowRepoFactory, WorkflowRepositories};

/// Unit of work backed by a PostgreSQL pool. Every session owns one transaction.
pub struct PostgresRepositories {
    pool: Arc<PgPool>,
}

impl PostgresRepositories {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create all repositories sharing a single transaction
    pub async fn create_session(&self) -> Result<PostgresSession, Box<dyn Error + Send + Sync>> {
        let tx = self.pool.begin().await?;
        let executor = Executor::new(tx);

        Ok(PostgresSession {
            approval_repos: ApprovalRepoFactory::new().build_all_repos(&executor),
            workflow_repos: WorkflowRepoFactory::new().build_all_repos(&executor),
            access_repos: AccessRepoFactory::new().build_all_repos(&executor),
            audit_repos: AuditRepoFactory::new().build_all_repos(&executor),
            permission_repos: PermissionRepoFactory::new().build_all_repos(&executor),
            entity_repos: EntityRepoFactory::new().build_all_repos(&executor),
            executor,
        })
    }
}

#[async_trait]
impl UnitOfWork for PostgresRepositories {
    type Session = PostgresSession;

    async fn begin(&self) -> Result<PostgresSession, Box<dyn Error + Send + Sync>> {
        self.create_session().await
    }
}

/// Repositories of one transaction. Dropping the session without committing
/// rolls the transaction back.
pub struct PostgresSession {
    pub executor: Executor,
    pub approval_repos: ApprovalRepositories,
    pub workflow_repos: WorkflowRepositories,
    pub access_repos: AccessRepositories,
    pub audit_repos: AuditRepositories,
    pub permission_repos: PermissionRepositories,
    pub entity_repos: EntityRepositories,
}

#[async_trait]
impl UnitOfWorkSession for PostgresSession {
    fn approval_requests(&self) -> &dyn ApprovalRequestRepository {
        self.approval_repos.approval_request_repository.as_ref()
    }

    fn workflows(&self) -> &dyn WorkflowRepository {
        self.workflow_repos.workflow_repository.as_ref()
    }

    fn user_requests(&self) -> &dyn UserRequestRepository {
        self.access_repos.user_request_repository.as_ref()
    }

    fn tasks(&self) -> &dyn TaskRepository {
        self.access_repos.task_repository.as_ref()
    }

    fn activity_logs(&self) -> &dyn ActivityLogRepository {
        self.audit_repos.activity_log_repository.as_ref()
    }

    fn role_grants(&self) -> &dyn RoleGrantRepository {
        self.permission_repos.role_grant_repository.as_ref()
    }

    fn entity_rows(&self) -> &dyn EntityRowRepository {
        self.entity_repos.entity_row_repository.as_ref()
    }

    fn integrity(&self) -> &dyn IntegrityCheck {
        self.entity_repos.entity_row_repository.as_ref()
    }

    async fn commit(self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.executor.commit().await
    }

    async fn rollback(self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.executor.rollback().await
    }
}
