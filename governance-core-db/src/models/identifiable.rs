use uuid::Uuid;

/// Trait for engine-owned rows that are uniquely identified by a UUID
pub trait Identifiable {
    /// Returns the unique identifier of the row
    fn get_id(&self) -> Uuid;
}
