pub mod access;
pub mod approval;
pub mod audit;
pub mod auditable;
pub mod entity;
pub mod identifiable;
pub mod permission;
pub mod workflow;

// Re-exports
pub use access::*;
pub use approval::*;
pub use audit::*;
pub use auditable::*;
pub use entity::*;
pub use identifiable::*;
pub use permission::*;
pub use workflow::*;
