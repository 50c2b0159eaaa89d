use std::sync::Arc;

use super::workflow_repository::WorkflowRepositoryImpl;
use crate::executor::Executor;

/// Factory for the workflow module repositories.
#[derive(Default)]
pub struct WorkflowRepoFactory {}

impl WorkflowRepoFactory {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {})
    }

    pub fn build_all_repos(&self, executor: &Executor) -> WorkflowRepositories {
        WorkflowRepositories {
            workflow_repository: Arc::new(WorkflowRepositoryImpl::new(executor.clone())),
        }
    }
}

/// Container for all workflow module repositories
pub struct WorkflowRepositories {
    pub workflow_repository: Arc<WorkflowRepositoryImpl>,
}
