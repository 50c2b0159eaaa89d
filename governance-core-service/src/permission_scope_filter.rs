use std::collections::HashSet;

use governance_core_api::{
    ActorContext, GovernanceError, GovernanceResult, PermissionAction, PermissionExpression,
    PlantFilter, PlantId,
};
use governance_core_db::models::permission::RoleGrantModel;
use governance_core_db::repository::RoleGrantRepository;
use tracing::debug;

/// Module x action grants and role flags held by an actor through its roles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilitySet {
    module_actions: HashSet<(String, PermissionAction)>,
    role_flags: HashSet<String>,
}

impl CapabilitySet {
    pub fn from_grants<'a, I>(grants: I) -> Self
    where
        I: IntoIterator<Item = &'a RoleGrantModel>,
    {
        let mut capabilities = CapabilitySet::default();
        for grant in grants {
            match &grant.expression {
                PermissionExpression::RoleFlag(flag) => {
                    capabilities.role_flags.insert(flag.clone());
                }
                PermissionExpression::ModuleAction { module, action } => {
                    capabilities
                        .module_actions
                        .insert((module.clone(), *action));
                }
            }
        }
        capabilities
    }

    pub fn satisfies(&self, expression: &PermissionExpression) -> bool {
        match expression {
            PermissionExpression::RoleFlag(flag) => self.role_flags.contains(flag),
            PermissionExpression::ModuleAction { module, action } => self
                .module_actions
                .contains(&(module.clone(), *action)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.module_actions.is_empty() && self.role_flags.is_empty()
    }
}

/// Effective capability of one actor for the duration of one operation.
///
/// Module grants come from the actor's roles; plant scope comes only from
/// `permitted_plant_ids`. Neither widens the other.
#[derive(Debug, Clone)]
pub struct PermissionScopeFilter {
    actor: ActorContext,
    capabilities: CapabilitySet,
}

impl PermissionScopeFilter {
    pub fn new(actor: ActorContext, capabilities: CapabilitySet) -> Self {
        Self {
            actor,
            capabilities,
        }
    }

    /// Loads the grants of every role the actor holds.
    pub async fn load(
        grants: &dyn RoleGrantRepository,
        actor: &ActorContext,
    ) -> GovernanceResult<Self> {
        let rows = if actor.role_ids.is_empty() {
            Vec::new()
        } else {
            grants.find_by_role_ids(&actor.role_ids).await?
        };
        let capabilities = CapabilitySet::from_grants(&rows);
        debug!(
            actor_id = actor.actor_id,
            grants = rows.len(),
            "Loaded capability set"
        );
        Ok(Self::new(actor.clone(), capabilities))
    }

    pub fn actor(&self) -> &ActorContext {
        &self.actor
    }

    pub fn satisfies(&self, expression: &PermissionExpression) -> bool {
        self.capabilities.satisfies(expression)
    }

    /// Module grant AND, for plant-scoped rows, membership of the plant.
    pub fn can_act(&self, module: &str, action: PermissionAction, plant_id: Option<PlantId>) -> bool {
        let granted = self
            .capabilities
            .satisfies(&PermissionExpression::module_action(module, action));
        granted && self.can_view_plant(plant_id)
    }

    pub fn require(
        &self,
        module: &str,
        action: PermissionAction,
        plant_id: Option<PlantId>,
    ) -> GovernanceResult<()> {
        if !self
            .capabilities
            .satisfies(&PermissionExpression::module_action(module, action))
        {
            return Err(GovernanceError::permission(
                self.actor.actor_id,
                format!("missing grant {action}:{module}"),
            ));
        }
        self.require_plant(plant_id)
    }

    pub fn require_plant(&self, plant_id: Option<PlantId>) -> GovernanceResult<()> {
        match plant_id {
            Some(plant_id) if !self.actor.is_permitted_plant(plant_id) => {
                Err(GovernanceError::permission(
                    self.actor.actor_id,
                    format!("plant {plant_id} is outside the actor's plant scope"),
                ))
            }
            _ => Ok(()),
        }
    }

    /// Read-side check, independent of module grants.
    pub fn can_view_plant(&self, plant_id: Option<PlantId>) -> bool {
        self.plant_filter().admits(plant_id)
    }

    pub fn plant_filter(&self) -> PlantFilter {
        self.actor.plant_filter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(grants: Vec<PermissionExpression>, plants: Vec<PlantId>) -> PermissionScopeFilter {
        let rows: Vec<RoleGrantModel> = grants
            .into_iter()
            .map(|expression| RoleGrantModel::new(1, expression))
            .collect();
        PermissionScopeFilter::new(
            ActorContext::new(5, vec![1], plants),
            CapabilitySet::from_grants(&rows),
        )
    }

    #[test]
    fn test_module_grant_is_narrowed_by_plant_scope() {
        let filter = filter(
            vec![PermissionExpression::module_action("system", PermissionAction::Update)],
            vec![1],
        );
        assert!(filter.can_act("system", PermissionAction::Update, Some(1)));
        assert!(!filter.can_act("system", PermissionAction::Update, Some(2)));
        assert!(filter.can_act("system", PermissionAction::Update, None));
        assert!(!filter.can_act("system", PermissionAction::Delete, Some(1)));
        assert!(!filter.can_act("vendor", PermissionAction::Update, Some(1)));
    }

    #[test]
    fn test_role_flag_never_widens_plant_scope() {
        let filter = filter(
            vec![
                PermissionExpression::role_flag("it_admin"),
                PermissionExpression::module_action("system", PermissionAction::Create),
            ],
            vec![1],
        );
        assert!(filter.satisfies(&PermissionExpression::role_flag("it_admin")));
        assert!(!filter.satisfies(&PermissionExpression::role_flag("auditor")));
        assert!(!filter.can_act("system", PermissionAction::Create, Some(9)));
        assert!(matches!(
            filter.require("system", PermissionAction::Create, Some(9)),
            Err(GovernanceError::Permission { actor_id: 5, .. })
        ));
    }

    #[test]
    fn test_read_side_filter_ignores_grants() {
        let filter = filter(vec![], vec![1, 3]);
        assert!(filter.can_view_plant(Some(3)));
        assert!(!filter.can_view_plant(Some(2)));
        assert!(filter.can_view_plant(None));
        assert!(filter.require("system", PermissionAction::View, Some(1)).is_err());
    }
}
