pub mod approval_request_repository;
pub mod factory;

pub use approval_request_repository::ApprovalRequestRepositoryImpl;
pub use factory::{ApprovalRepoFactory, ApprovalRepositories};
