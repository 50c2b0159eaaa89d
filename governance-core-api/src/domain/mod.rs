pub mod actor;
pub mod commands;
pub mod ids;
pub mod outcome;
pub mod permission;
pub mod query;
pub mod scope;
pub mod status;

pub use actor::*;
pub use commands::*;
pub use ids::*;
pub use outcome::*;
pub use permission::*;
pub use query::*;
pub use scope::*;
pub use status::*;
