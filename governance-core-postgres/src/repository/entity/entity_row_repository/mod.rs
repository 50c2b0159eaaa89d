pub mod repo_impl;
pub mod count_active_dependents;
pub mod delete_row;
pub mod get_row;
pub mod insert_row;
pub mod update_row;

#[cfg(test)]
pub mod test_utils;

pub use repo_impl::EntityRowRepositoryImpl;
