use governance_core_api::{DepartmentId, PlantId};
use serde_json::{Map, Value};

/// Column/value map of one row of a governed entity table.
pub type EntityRow = Map<String, Value>;

/// Primary key column of every governed entity table.
pub const ENTITY_ID_COLUMN: &str = "id";

/// Integer value of a column, accepting numeric strings.
pub fn value_as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Reads an integer column from a snapshot.
pub fn row_i64(row: &Value, column: &str) -> Option<i64> {
    row.get(column).and_then(value_as_i64)
}

pub fn row_plant_id(row: &Value, plant_field: &str) -> Option<PlantId> {
    row_i64(row, plant_field)
}

pub fn row_department_id(row: &Value, department_field: &str) -> Option<DepartmentId> {
    row_i64(row, department_field)
}

/// Column/value pairs of a snapshot, without the primary key.
pub fn writable_columns(snapshot: &Value) -> EntityRow {
    snapshot
        .as_object()
        .map(|fields| {
            fields
                .iter()
                .filter(|(column, _)| column.as_str() != ENTITY_ID_COLUMN)
                .map(|(column, value)| (column.clone(), value.clone()))
                .collect()
        })
        .unwrap_or_default()
}
