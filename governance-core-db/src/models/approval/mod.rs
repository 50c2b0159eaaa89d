pub mod approval_request;

pub use approval_request::*;
