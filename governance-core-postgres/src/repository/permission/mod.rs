pub mod factory;
pub mod role_grant_repository;

pub use factory::{PermissionRepoFactory, PermissionRepositories};
pub use role_grant_repository::RoleGrantRepositoryImpl;
