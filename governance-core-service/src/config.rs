use std::collections::HashSet;
use std::time::Duration;

use governance_core_api::{GovernanceError, GovernanceResult};
use governance_core_db::models::entity::DependencyRule;
use governance_core_db::utils::is_valid_identifier;
use serde::{Deserialize, Serialize};

pub const DEFAULT_ACCESS_REQUEST_MODULE: &str = "user_request";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 5_000;

/// How the workflow scope of a staged mutation is derived from its snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScopeRule {
    /// Plant (and optionally department) read from the snapshot columns.
    PlantDepartment {
        plant_field: String,
        department_field: Option<String>,
    },
    /// Fixed corporate category. `plant_field`, when set, still subjects the
    /// rows to plant isolation.
    Corporate {
        category: String,
        plant_field: Option<String>,
    },
}

/// Entity table whose writes must pass through staged approval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernedModule {
    pub module: String,
    pub table_name: String,
    pub scope: ScopeRule,
}

impl GovernedModule {
    pub fn plant_field(&self) -> Option<&str> {
        match &self.scope {
            ScopeRule::PlantDepartment { plant_field, .. } => Some(plant_field),
            ScopeRule::Corporate { plant_field, .. } => plant_field.as_deref(),
        }
    }
}

/// Entity table written immediately, without approval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectTable {
    pub module: String,
    pub table_name: String,
    pub plant_field: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceConfig {
    pub governed_modules: Vec<GovernedModule>,
    #[serde(default)]
    pub direct_tables: Vec<DirectTable>,
    #[serde(default)]
    pub dependency_rules: Vec<DependencyRule>,
    /// Module name checked when creating and fulfilling access requests
    #[serde(default = "default_access_request_module")]
    pub access_request_module: String,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_access_request_module() -> String {
    DEFAULT_ACCESS_REQUEST_MODULE.to_string()
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

impl GovernanceConfig {
    pub fn new(governed_modules: Vec<GovernedModule>) -> Self {
        Self {
            governed_modules,
            direct_tables: Vec::new(),
            dependency_rules: Vec::new(),
            access_request_module: default_access_request_module(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }

    /// Parses and validates a JSON configuration document.
    pub fn from_json(json: &str) -> GovernanceResult<Self> {
        let config: GovernanceConfig = serde_json::from_str(json)
            .map_err(|e| GovernanceError::Configuration(format!("Invalid governance config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects names that cannot be used in SQL, duplicate modules and tables that
    /// are both governed and directly writable.
    pub fn validate(&self) -> GovernanceResult<()> {
        let mut modules = HashSet::new();
        let mut governed_tables = HashSet::new();
        for governed in &self.governed_modules {
            check_identifier(&governed.table_name)?;
            if !modules.insert(governed.module.as_str()) {
                return Err(GovernanceError::Configuration(format!(
                    "Module '{}' is configured twice",
                    governed.module
                )));
            }
            governed_tables.insert(governed.table_name.as_str());
            match &governed.scope {
                ScopeRule::PlantDepartment {
                    plant_field,
                    department_field,
                } => {
                    check_identifier(plant_field)?;
                    if let Some(department_field) = department_field {
                        check_identifier(department_field)?;
                    }
                }
                ScopeRule::Corporate {
                    category,
                    plant_field,
                } => {
                    if category.trim().is_empty() {
                        return Err(GovernanceError::Configuration(format!(
                            "Module '{}' has an empty corporate category",
                            governed.module
                        )));
                    }
                    if let Some(plant_field) = plant_field {
                        check_identifier(plant_field)?;
                    }
                }
            }
        }

        for direct in &self.direct_tables {
            check_identifier(&direct.table_name)?;
            if let Some(plant_field) = &direct.plant_field {
                check_identifier(plant_field)?;
            }
            if governed_tables.contains(direct.table_name.as_str()) {
                return Err(GovernanceError::Configuration(format!(
                    "Table '{}' cannot be both governed and directly writable",
                    direct.table_name
                )));
            }
        }

        for rule in &self.dependency_rules {
            for name in [
                &rule.table_name,
                &rule.status_field,
                &rule.dependent_table,
                &rule.foreign_key,
                &rule.dependent_status_field,
            ] {
                check_identifier(name)?;
            }
        }
        Ok(())
    }

    pub fn governed_module(&self, module: &str) -> Option<&GovernedModule> {
        self.governed_modules.iter().find(|m| m.module == module)
    }

    pub fn is_governed_table(&self, table_name: &str) -> bool {
        self.governed_modules
            .iter()
            .any(|m| m.table_name == table_name)
    }

    pub fn direct_table(&self, table_name: &str) -> Option<&DirectTable> {
        self.direct_tables
            .iter()
            .find(|t| t.table_name == table_name)
    }

    pub fn rules_for<'a>(&'a self, table_name: &'a str) -> impl Iterator<Item = &'a DependencyRule> + 'a {
        self.dependency_rules
            .iter()
            .filter(move |rule| rule.table_name == table_name)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

fn check_identifier(name: &str) -> GovernanceResult<()> {
    if is_valid_identifier(name) {
        Ok(())
    } else {
        Err(GovernanceError::Configuration(format!(
            "'{name}' is not a valid table or column name"
        )))
    }
}
