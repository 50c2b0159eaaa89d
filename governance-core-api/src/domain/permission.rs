use serde::{Deserialize, Serialize};
use std::fmt;

use super::status::MutationAction;

/// Action half of a module capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionAction {
    View,
    Create,
    Update,
    Delete,
}

impl From<MutationAction> for PermissionAction {
    fn from(action: MutationAction) -> Self {
        match action {
            MutationAction::Create => PermissionAction::Create,
            MutationAction::Update => PermissionAction::Update,
            MutationAction::Delete => PermissionAction::Delete,
        }
    }
}

impl fmt::Display for PermissionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PermissionAction::View => write!(f, "view"),
            PermissionAction::Create => write!(f, "create"),
            PermissionAction::Update => write!(f, "update"),
            PermissionAction::Delete => write!(f, "delete"),
        }
    }
}

/// Declarative permission condition, evaluated against a fixed capability set.
///
/// Serialized as `{"kind": "RoleFlag", "value": "it_admin"}` or
/// `{"kind": "ModuleAction", "value": {"module": "system", "action": "update"}}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum PermissionExpression {
    RoleFlag(String),
    ModuleAction {
        module: String,
        action: PermissionAction,
    },
}

impl PermissionExpression {
    pub fn module_action(module: impl Into<String>, action: PermissionAction) -> Self {
        PermissionExpression::ModuleAction {
            module: module.into(),
            action,
        }
    }

    pub fn role_flag(flag: impl Into<String>) -> Self {
        PermissionExpression::RoleFlag(flag.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expression_tagged_format() {
        let expr = PermissionExpression::module_action("system", PermissionAction::Update);
        let json = serde_json::to_value(&expr).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"kind": "ModuleAction", "value": {"module": "system", "action": "update"}})
        );

        let flag: PermissionExpression =
            serde_json::from_value(serde_json::json!({"kind": "RoleFlag", "value": "it_admin"})).unwrap();
        assert_eq!(flag, PermissionExpression::role_flag("it_admin"));
    }
}
