pub mod entity_row_repository;
pub mod factory;

pub use entity_row_repository::EntityRowRepositoryImpl;
pub use factory::{EntityRepoFactory, EntityRepositories};
