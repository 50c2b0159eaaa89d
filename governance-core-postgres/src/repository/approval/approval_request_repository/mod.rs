pub mod repo_impl;
pub mod create_batch;
pub mod find_page;
pub mod load;
pub mod update_guarded;

#[cfg(test)]
pub mod test_utils;

pub use repo_impl::ApprovalRequestRepositoryImpl;
