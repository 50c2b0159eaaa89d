pub mod role_grant;

pub use role_grant::*;
