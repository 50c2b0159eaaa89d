pub mod approval_commit;
pub mod approval_staging;
pub mod audit_logger;
pub mod config;
pub mod governance_service;
pub mod outcome;
pub mod permission_scope_filter;
pub mod poller;
pub mod task_fanout;
pub mod telemetry;
pub mod workflow_resolver;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use config::GovernanceConfig;
pub use governance_service::GovernanceService;
pub use outcome::*;
pub use poller::{PollHandle, StatusPoller};
