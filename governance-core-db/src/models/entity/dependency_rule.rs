use serde::{Deserialize, Serialize};
use serde_json::Value;

/// # Documentation
/// Referential-integrity rule checked before a governed change is committed.
///
/// A record of `table_name` must not be deleted, or moved to one of
/// `inactive_values` in `status_field`, while rows of `dependent_table` reference
/// it through `foreign_key` and have `dependent_status_field` in `active_values`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyRule {
    pub table_name: String,
    pub status_field: String,
    pub inactive_values: Vec<String>,
    pub dependent_table: String,
    pub foreign_key: String,
    pub dependent_status_field: String,
    pub active_values: Vec<String>,
}

impl DependencyRule {
    /// Whether `new_value` moves the record into an inactive status.
    pub fn deactivates(&self, new_value: &Value) -> bool {
        match new_value.get(&self.status_field) {
            Some(Value::String(status)) => self.inactive_values.iter().any(|v| v == status),
            _ => false,
        }
    }

    pub fn is_active_value(&self, value: &Value) -> bool {
        match value {
            Value::String(status) => self.active_values.iter().any(|v| v == status),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rule() -> DependencyRule {
        DependencyRule {
            table_name: "plant".to_string(),
            status_field: "status".to_string(),
            inactive_values: vec!["INACTIVE".to_string()],
            dependent_table: "department".to_string(),
            foreign_key: "plant_id".to_string(),
            dependent_status_field: "status".to_string(),
            active_values: vec!["ACTIVE".to_string()],
        }
    }

    #[test]
    fn test_deactivates() {
        let rule = rule();
        assert!(rule.deactivates(&json!({"status": "INACTIVE"})));
        assert!(!rule.deactivates(&json!({"status": "ACTIVE"})));
        assert!(!rule.deactivates(&json!({"plant_name": "x"})));
        assert!(rule.is_active_value(&json!("ACTIVE")));
        assert!(!rule.is_active_value(&json!(1)));
    }
}
