pub mod dependency_rule;
pub mod entity_row;

pub use dependency_rule::*;
pub use entity_row::*;
