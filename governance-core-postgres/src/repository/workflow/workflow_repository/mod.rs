pub mod repo_impl;
pub mod find_active_by_scope;
pub mod load;

#[cfg(test)]
pub mod test_utils;

pub use repo_impl::WorkflowRepositoryImpl;
