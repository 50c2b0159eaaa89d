pub mod repo_impl;
pub mod create_batch;
pub mod find_by_user_request_id;
pub mod load_batch;
pub mod update_guarded;

#[cfg(test)]
pub mod test_utils;

pub use repo_impl::TaskRepositoryImpl;
