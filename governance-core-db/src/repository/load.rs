use async_trait::async_trait;
use uuid::Uuid;

use crate::models::identifiable::Identifiable;

/// Generic repository trait for loading one entity by its ID
///
/// Any entity that implements the Identifiable trait can be loaded using this trait.
/// Returns an Option so callers decide how a missing row is reported.
///
/// # Type Parameters
/// * `T` - The entity type that must implement Identifiable trait
///
/// # Example
/// ```ignore
/// impl Load<ApprovalRequestModel> for ApprovalRequestRepositoryImpl {
///     async fn load(&self, id: Uuid) -> Result<Option<ApprovalRequestModel>, Box<dyn Error + Send + Sync>> {
///         // Implementation
///     }
/// }
/// ```
#[async_trait]
pub trait Load<T: Identifiable>: Send + Sync {
    /// Load an entity by its unique identifier
    ///
    /// # Returns
    /// * `Ok(Some(T))` - The loaded entity
    /// * `Ok(None)` - If the entity does not exist
    /// * `Err` - An error if the query could not be executed
    async fn load(&self, id: Uuid) -> Result<Option<T>, Box<dyn std::error::Error + Send + Sync>>;
}
