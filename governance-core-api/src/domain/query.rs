use serde::{Deserialize, Serialize};

use super::ids::PlantId;
use super::status::ApprovalStatus;

/// Filter for listing approval requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalQuery {
    pub module: Option<String>,
    pub status: Option<ApprovalStatus>,
}

impl ApprovalQuery {
    pub fn pending() -> Self {
        Self {
            module: None,
            status: Some(ApprovalStatus::Pending),
        }
    }

    pub fn for_module(module: impl Into<String>) -> Self {
        Self {
            module: Some(module.into()),
            status: None,
        }
    }

    pub fn with_status(mut self, status: ApprovalStatus) -> Self {
        self.status = Some(status);
        self
    }
}

/// Plant restriction applied to list queries. Rows without a plant are
/// corporate-scoped and always pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlantFilter {
    pub permitted_plant_ids: Vec<PlantId>,
}

impl PlantFilter {
    pub fn new(permitted_plant_ids: Vec<PlantId>) -> Self {
        Self { permitted_plant_ids }
    }

    pub fn admits(&self, plant_id: Option<PlantId>) -> bool {
        match plant_id {
            None => true,
            Some(plant_id) => self.permitted_plant_ids.contains(&plant_id),
        }
    }
}
