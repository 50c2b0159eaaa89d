use std::sync::Arc;

use super::task_repository::TaskRepositoryImpl;
use super::user_request_repository::UserRequestRepositoryImpl;
use crate::executor::Executor;

/// Factory for the access request module repositories.
#[derive(Default)]
pub struct AccessRepoFactory {}

impl AccessRepoFactory {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {})
    }

    pub fn build_user_request_repo(&self, executor: &Executor) -> Arc<UserRequestRepositoryImpl> {
        Arc::new(UserRequestRepositoryImpl::new(executor.clone()))
    }

    pub fn build_task_repo(&self, executor: &Executor) -> Arc<TaskRepositoryImpl> {
        Arc::new(TaskRepositoryImpl::new(executor.clone()))
    }

    pub fn build_all_repos(&self, executor: &Executor) -> AccessRepositories {
        AccessRepositories {
            user_request_repository: self.build_user_request_repo(executor),
            task_repository: self.build_task_repo(executor),
        }
    }
}

/// Container for all access request module repositories
pub struct AccessRepositories {
    pub user_request_repository: Arc<UserRequestRepositoryImpl>,
    pub task_repository: Arc<TaskRepositoryImpl>,
}
