use serde::{Deserialize, Serialize};

use super::ids::{ActorId, PlantId, RoleId};
use super::query::PlantFilter;

/// Identity and entitlements of the caller, supplied per call by the
/// authentication collaborator. The engine never reads ambient session state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorContext {
    pub actor_id: ActorId,
    pub role_ids: Vec<RoleId>,
    pub permitted_plant_ids: Vec<PlantId>,
}

impl ActorContext {
    pub fn new(actor_id: ActorId, role_ids: Vec<RoleId>, permitted_plant_ids: Vec<PlantId>) -> Self {
        Self {
            actor_id,
            role_ids,
            permitted_plant_ids,
        }
    }

    pub fn has_role(&self, role_id: RoleId) -> bool {
        self.role_ids.contains(&role_id)
    }

    pub fn is_permitted_plant(&self, plant_id: PlantId) -> bool {
        self.permitted_plant_ids.contains(&plant_id)
    }

    /// Read-side restriction for list queries run on behalf of this actor.
    pub fn plant_filter(&self) -> PlantFilter {
        PlantFilter::new(self.permitted_plant_ids.clone())
    }
}
