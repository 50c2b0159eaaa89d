use governance_core_api::{PermissionExpression, RoleId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::identifiable::Identifiable;

/// # Documentation
/// Grants one permission expression to one role.
///
/// Maintained by the host application; the engine reads grants for the roles of
/// the calling actor and evaluates them with no further lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleGrantModel {
    pub id: Uuid,
    pub role_id: RoleId,
    pub expression: PermissionExpression,
}

impl RoleGrantModel {
    pub fn new(role_id: RoleId, expression: PermissionExpression) -> Self {
        Self {
            id: Uuid::new_v4(),
            role_id,
            expression,
        }
    }
}

impl Identifiable for RoleGrantModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}
