//! In-memory storage and fixtures for exercising the engine without a database.

pub mod fixtures;
pub mod memory;

pub use memory::{MemorySession, MemoryState, MemoryUnitOfWork};
