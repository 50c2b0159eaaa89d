use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use super::ids::{ApplicationId, DepartmentId, PlantId, RecordId, RoleId};
use super::status::MutationAction;

pub const MAX_COMMENT_LENGTH: u64 = 500;

/// Proposed create/update/delete against a governed entity, carried as
/// before/after snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct StageMutationCommand {
    #[validate(length(min = 1, max = 50))]
    pub module: String,
    #[validate(length(min = 1, max = 50))]
    pub table_name: String,
    pub action: MutationAction,
    pub record_id: Option<RecordId>,
    pub old_value: Option<Value>,
    pub new_value: Option<Value>,
    #[validate(length(max = 500))]
    pub comments: Option<String>,
}

impl StageMutationCommand {
    pub fn create(module: impl Into<String>, table_name: impl Into<String>, new_value: Value) -> Self {
        Self {
            module: module.into(),
            table_name: table_name.into(),
            action: MutationAction::Create,
            record_id: None,
            old_value: None,
            new_value: Some(new_value),
            comments: None,
        }
    }

    pub fn update(
        module: impl Into<String>,
        table_name: impl Into<String>,
        record_id: RecordId,
        old_value: Value,
        new_value: Value,
    ) -> Self {
        Self {
            module: module.into(),
            table_name: table_name.into(),
            action: MutationAction::Update,
            record_id: Some(record_id),
            old_value: Some(old_value),
            new_value: Some(new_value),
            comments: None,
        }
    }

    pub fn delete(
        module: impl Into<String>,
        table_name: impl Into<String>,
        record_id: RecordId,
        old_value: Value,
    ) -> Self {
        Self {
            module: module.into(),
            table_name: table_name.into(),
            action: MutationAction::Delete,
            record_id: Some(record_id),
            old_value: Some(old_value),
            new_value: None,
            comments: None,
        }
    }

    pub fn with_comments(mut self, comments: impl Into<String>) -> Self {
        self.comments = Some(comments.into());
        self
    }

    /// Structural checks that do not need storage: snapshot presence per action,
    /// record id presence, and snapshots being JSON objects.
    pub fn check_shape(&self) -> Result<(), String> {
        self.action
            .check_snapshots(self.old_value.is_some(), self.new_value.is_some())?;
        match (self.action, self.record_id) {
            (MutationAction::Create, Some(_)) => {
                return Err("create must not carry a record_id".to_string())
            }
            (MutationAction::Update | MutationAction::Delete, None) => {
                return Err(format!("{} requires a record_id", self.action))
            }
            _ => {}
        }
        for snapshot in [&self.old_value, &self.new_value].into_iter().flatten() {
            if !snapshot.is_object() {
                return Err("snapshots must be JSON objects".to_string());
            }
        }
        Ok(())
    }
}

/// Rejection of a staged mutation or a task. Comments are mandatory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct RejectCommand {
    #[validate(length(min = 1, max = 500))]
    pub comments: String,
}

impl RejectCommand {
    pub fn new(comments: impl Into<String>) -> Self {
        Self {
            comments: comments.into().trim().to_string(),
        }
    }
}

/// One (application, role, scope) line of an access request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct AccessRequestItem {
    pub application_id: ApplicationId,
    pub access_role_id: RoleId,
    pub plant_id: PlantId,
    pub department_id: Option<DepartmentId>,
    #[validate(length(max = 500))]
    pub justification: Option<String>,
}

impl AccessRequestItem {
    pub fn new(
        application_id: ApplicationId,
        access_role_id: RoleId,
        plant_id: PlantId,
        department_id: Option<DepartmentId>,
    ) -> Self {
        Self {
            application_id,
            access_role_id,
            plant_id,
            department_id,
            justification: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CreateAccessRequestCommand {
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[validate(length(min = 1), nested)]
    pub items: Vec<AccessRequestItem>,
}

/// Immediate write to a table that is not subject to staged approval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct DirectMutationCommand {
    #[validate(length(min = 1, max = 50))]
    pub module: String,
    #[validate(length(min = 1, max = 50))]
    pub table_name: String,
    pub action: MutationAction,
    pub record_id: Option<RecordId>,
    pub values: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_check_shape() {
        let create = StageMutationCommand::create("plant", "plant", json!({"plant_name": "GOA-2"}));
        assert!(create.check_shape().is_ok());

        let mut bad = create.clone();
        bad.old_value = Some(json!({}));
        assert!(bad.check_shape().is_err());

        let mut missing_id = StageMutationCommand::delete("plant", "plant", 1, json!({"plant_name": "x"}));
        missing_id.record_id = None;
        assert!(missing_id.check_shape().is_err());

        let scalar = StageMutationCommand::create("plant", "plant", json!("GOA-2"));
        assert!(scalar.check_shape().is_err());
    }

    #[test]
    fn test_reject_command_requires_comments() {
        assert!(RejectCommand::new("   ").validate().is_err());
        assert!(RejectCommand::new("Duplicate plant").validate().is_ok());
    }

    #[test]
    fn test_access_request_requires_items() {
        let empty = CreateAccessRequestCommand {
            description: None,
            items: vec![],
        };
        assert!(empty.validate().is_err());

        let one = CreateAccessRequestCommand {
            description: Some("SAP access".to_string()),
            items: vec![AccessRequestItem::new(1, 2, 3, None)],
        };
        assert!(one.validate().is_ok());
    }
}
