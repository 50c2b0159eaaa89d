use std::sync::Arc;

use super::approval_request_repository::ApprovalRequestRepositoryImpl;
use crate::executor::Executor;

/// Factory for the approval module repositories.
#[derive(Default)]
pub struct ApprovalRepoFactory {}

impl ApprovalRepoFactory {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {})
    }

    pub fn build_approval_request_repo(&self, executor: &Executor) -> Arc<ApprovalRequestRepositoryImpl> {
        Arc::new(ApprovalRequestRepositoryImpl::new(executor.clone()))
    }

    pub fn build_all_repos(&self, executor: &Executor) -> ApprovalRepositories {
        ApprovalRepositories {
            approval_request_repository: self.build_approval_request_repo(executor),
        }
    }
}

/// Container for all approval module repositories
pub struct ApprovalRepositories {
    pub approval_request_repository: Arc<ApprovalRequestRepositoryImpl>,
}
