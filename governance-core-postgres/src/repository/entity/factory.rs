use std::sync::Arc;

use super::entity_row_repository::EntityRowRepositoryImpl;
use crate::executor::Executor;

/// Factory for the governed entity table repositories.
#[derive(Default)]
pub struct EntityRepoFactory {}

impl EntityRepoFactory {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {})
    }

    pub fn build_all_repos(&self, executor: &Executor) -> EntityRepositories {
        EntityRepositories {
            entity_row_repository: Arc::new(EntityRowRepositoryImpl::new(executor.clone())),
        }
    }
}

pub struct EntityRepositories {
    /// Also serves the dependency checks run before a governed commit
    pub entity_row_repository: Arc<EntityRowRepositoryImpl>,
}
