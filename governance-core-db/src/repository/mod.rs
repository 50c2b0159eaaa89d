pub mod access_repository;
pub mod activity_log_repository;
pub mod approval_request_repository;
pub mod create_batch;
pub mod entity_repository;
pub mod guarded_update;
pub mod load;
pub mod load_batch;
pub mod pagination;
pub mod role_grant_repository;
pub mod unit_of_work;
pub mod workflow_repository;

// Re-exports
pub use access_repository::*;
pub use activity_log_repository::*;
pub use approval_request_repository::*;
pub use create_batch::*;
pub use entity_repository::*;
pub use guarded_update::*;
pub use load::*;
pub use load_batch::*;
pub use pagination::*;
pub use role_grant_repository::*;
pub use unit_of_work::*;
pub use workflow_repository::*;
