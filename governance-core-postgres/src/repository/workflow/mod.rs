pub mod factory;
pub mod workflow_repository;

pub use factory::{WorkflowRepoFactory, WorkflowRepositories};
pub use workflow_repository::WorkflowRepositoryImpl;
