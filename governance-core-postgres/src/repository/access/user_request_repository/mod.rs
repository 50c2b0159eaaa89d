pub mod repo_impl;
pub mod create_batch;
pub mod load;
pub mod lock_for_update;
pub mod update_guarded;

#[cfg(test)]
pub mod test_utils;

pub use repo_impl::UserRequestRepositoryImpl;
