pub mod task;
pub mod user_request;

pub use task::*;
pub use user_request::*;
