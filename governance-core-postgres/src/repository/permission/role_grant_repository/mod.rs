pub mod repo_impl;
pub mod find_by_role_ids;

#[cfg(test)]
pub mod test_utils;

pub use repo_impl::RoleGrantRepositoryImpl;
