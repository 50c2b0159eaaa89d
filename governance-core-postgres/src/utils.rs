use governance_core_db::utils::is_valid_identifier;
use heapless::String as HeaplessString;
use serde::de::DeserializeOwned;
use serde_json::Value;
use sqlx::{postgres::PgRow, Row};
use std::error::Error;
use std::str::FromStr;

/// A trait for converting a database row into a model.
pub trait TryFromRow<R>: Sized {
    /// Performs the conversion.
    fn try_from_row(row: &R) -> Result<Self, Box<dyn Error + Send + Sync>>;
}

/// Retrieves a required `HeaplessString` from a row.
pub fn get_heapless_string<const N: usize>(
    row: &PgRow,
    col_name: &str,
) -> Result<HeaplessString<N>, Box<dyn Error + Send + Sync>> {
    let s: String = row.try_get(col_name)?;
    HeaplessString::from_str(&s).map_err(|_| {
        format!("Value for column '{col_name}' is too long (max {N} chars)").into()
    })
}

/// Retrieves an optional `HeaplessString` from a row.
pub fn get_optional_heapless_string<const N: usize>(
    row: &PgRow,
    col_name: &str,
) -> Result<Option<HeaplessString<N>>, Box<dyn Error + Send + Sync>> {
    let s: Option<String> = row.try_get(col_name)?;
    s.map(|val| HeaplessString::from_str(&val))
        .transpose()
        .map_err(|_| {
            format!("Value for column '{col_name}' is too long (max {N} chars)").into()
        })
}

/// Retrieves a JSONB column holding a serde-encoded value.
pub fn get_json<T: DeserializeOwned>(
    row: &PgRow,
    col_name: &str,
) -> Result<T, Box<dyn Error + Send + Sync>> {
    let value: Value = row.try_get(col_name)?;
    serde_json::from_value(value)
        .map_err(|e| format!("Column '{col_name}' does not decode: {e}").into())
}

/// Double-quotes a table or column name after checking it against
/// [`is_valid_identifier`].
pub fn quote_ident(name: &str) -> Result<String, Box<dyn Error + Send + Sync>> {
    if is_valid_identifier(name) {
        Ok(format!("\"{name}\""))
    } else {
        Err(format!("Invalid SQL identifier '{name}'").into())
    }
}

/// Comma-separated quoted column list.
pub fn quote_columns<'a, I>(columns: I) -> Result<String, Box<dyn Error + Send + Sync>>
where
    I: IntoIterator<Item = &'a String>,
{
    let quoted = columns
        .into_iter()
        .map(|c| quote_ident(c))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(quoted.join(", "))
}
