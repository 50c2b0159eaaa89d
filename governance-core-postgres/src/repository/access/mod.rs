pub mod factory;
pub mod task_repository;
pub mod user_request_repository;

pub use factory::{AccessRepoFactory, AccessRepositories};
pub use task_repository::TaskRepositoryImpl;
pub use user_request_repository::UserRequestRepositoryImpl;
