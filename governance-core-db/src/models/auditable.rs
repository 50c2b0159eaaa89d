use super::identifiable::Identifiable;

/// Trait for engine-owned rows whose transitions are recorded in the activity log
/// and whose updates are guarded by a content hash.
pub trait Auditable: Identifiable {
    /// Table name written on activity log entries for this row
    fn audit_table_name(&self) -> &'static str;

    /// Hash of the row as last persisted, used as the compare-and-swap token
    fn get_hash(&self) -> i64;
}
