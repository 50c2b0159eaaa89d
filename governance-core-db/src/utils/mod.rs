use chrono::{DateTime, SubsecRound, Utc};
use serde::Serialize;
use std::hash::Hasher;
use twox_hash::XxHash64;

/// Hashes serializable data into an i64 using CBOR serialization and XxHash64.
///
/// This provides a stable hash across different runs and systems by:
/// - Serializing the data to CBOR format (deterministic binary representation)
/// - Using XxHash64 with a fixed seed (0) for consistent hashing
pub fn hash_as_i64<T: Serialize>(data: &T) -> Result<i64, String> {
    let mut hasher = XxHash64::with_seed(0);
    let mut cbor = Vec::new();
    ciborium::ser::into_writer(data, &mut cbor)
        .map_err(|e| format!("Failed to serialize data for hashing: {e}"))?;
    hasher.write(&cbor);
    Ok(hasher.finish() as i64)
}

/// Current time at the microsecond precision PostgreSQL stores, so hashed rows
/// still verify after a round-trip.
pub fn now_micros() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Converts a `&str` into a bounded string, reporting the field on overflow.
pub fn bounded<const N: usize>(
    field: &str,
    value: &str,
) -> Result<heapless::String<N>, String> {
    heapless::String::try_from(value)
        .map_err(|_| format!("Value for '{field}' is too long (max {N} chars)"))
}

/// Optional variant of [`bounded`].
pub fn bounded_opt<const N: usize>(
    field: &str,
    value: Option<&str>,
) -> Result<Option<heapless::String<N>>, String> {
    value.map(|v| bounded(field, v)).transpose()
}

/// Whether `name` can be spliced into SQL as a quoted table or column name:
/// lowercase ASCII, digits and underscores, not starting with a digit, at most 63 bytes.
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_lowercase() || first == '_' => {}
        _ => return false,
    }
    name.len() <= 63
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}
