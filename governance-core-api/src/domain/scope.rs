use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{DepartmentId, PlantId};

/// Organizational key used to select a workflow.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Scope {
    Plant {
        plant_id: PlantId,
        department_id: Option<DepartmentId>,
    },
    Corporate {
        category: String,
    },
}

impl Scope {
    pub fn plant_id(&self) -> Option<PlantId> {
        match self {
            Scope::Plant { plant_id, .. } => Some(*plant_id),
            Scope::Corporate { .. } => None,
        }
    }

    pub fn department_id(&self) -> Option<DepartmentId> {
        match self {
            Scope::Plant { department_id, .. } => *department_id,
            Scope::Corporate { .. } => None,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Plant {
                plant_id,
                department_id: Some(department_id),
            } => write!(f, "plant {plant_id} / department {department_id}"),
            Scope::Plant {
                plant_id,
                department_id: None,
            } => write!(f, "plant {plant_id}"),
            Scope::Corporate { category } => write!(f, "corporate category '{category}'"),
        }
    }
}
