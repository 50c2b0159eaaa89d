use std::sync::Arc;

use super::activity_log_repository::ActivityLogRepositoryImpl;
use crate::executor::Executor;

/// Factory for creating audit module repositories
#[derive(Default)]
pub struct AuditRepoFactory {}

impl AuditRepoFactory {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {})
    }

    pub fn build_activity_log_repo(&self, executor: &Executor) -> Arc<ActivityLogRepositoryImpl> {
        Arc::new(ActivityLogRepositoryImpl::new(executor.clone()))
    }

    pub fn build_all_repos(&self, executor: &Executor) -> AuditRepositories {
        AuditRepositories {
            activity_log_repository: self.build_activity_log_repo(executor),
        }
    }
}

/// Container for all audit module repositories
pub struct AuditRepositories {
    pub activity_log_repository: Arc<ActivityLogRepositoryImpl>,
}
