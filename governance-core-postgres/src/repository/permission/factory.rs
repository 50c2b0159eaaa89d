use std::sync::Arc;

use super::role_grant_repository::RoleGrantRepositoryImpl;
use crate::executor::Executor;

/// Factory for the permission module repositories.
#[derive(Default)]
pub struct PermissionRepoFactory {}

impl PermissionRepoFactory {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {})
    }

    pub fn build_all_repos(&self, executor: &Executor) -> PermissionRepositories {
        PermissionRepositories {
            role_grant_repository: Arc::new(RoleGrantRepositoryImpl::new(executor.clone())),
        }
    }
}

pub struct PermissionRepositories {
    pub role_grant_repository: Arc<RoleGrantRepositoryImpl>,
}
