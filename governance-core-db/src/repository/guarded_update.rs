use async_trait::async_trait;

use crate::models::auditable::Auditable;

/// Generic repository trait for compare-and-swap updates
///
/// The stored row is replaced by `item` only if its current hash still equals
/// `expected_hash`, i.e. nobody wrote it since it was read. Implementations for
/// entities with a PENDING status additionally require the stored row to still be
/// PENDING.
///
/// # Type Parameters
/// * `T` - The entity type that must implement Auditable trait
///
/// # Example
/// ```ignore
/// let previous = request.hash;
/// request.status = ApprovalStatus::Approved;
/// request.rehash()?;
/// if !repo.update_guarded(&request, previous).await? {
///     // lost the race
/// }
/// ```
#[async_trait]
pub trait GuardedUpdate<T: Auditable>: Send + Sync {
    /// Write `item` over the stored row
    ///
    /// # Returns
    /// * `Ok(true)` - The row was updated
    /// * `Ok(false)` - The stored hash or status no longer matched; nothing was written
    /// * `Err` - An error if the statement could not be executed
    async fn update_guarded(
        &self,
        item: &T,
        expected_hash: i64,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>>;
}
