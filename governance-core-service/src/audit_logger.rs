use governance_core_api::{
    ActivityAction, ActorId, GovernanceError, GovernanceResult, PlantId, RecordId,
};
use governance_core_db::models::audit::ActivityLogModel;
use governance_core_db::repository::ActivityLogRepository;
use governance_core_db::utils::{bounded, bounded_opt, now_micros};
use serde_json::Value;
use uuid::Uuid;

/// One audit event before it is sealed into the hash chain.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityEntry {
    pub table_name: String,
    pub record_id: Option<RecordId>,
    pub subject_id: Option<Uuid>,
    pub plant_id: Option<PlantId>,
    pub action: ActivityAction,
    pub old_value: Option<Value>,
    pub new_value: Option<Value>,
    pub performed_by: ActorId,
    pub approve_status: Option<String>,
    pub comments: Option<String>,
}

impl ActivityEntry {
    pub fn new(table_name: impl Into<String>, action: ActivityAction, performed_by: ActorId) -> Self {
        Self {
            table_name: table_name.into(),
            record_id: None,
            subject_id: None,
            plant_id: None,
            action,
            old_value: None,
            new_value: None,
            performed_by,
            approve_status: None,
            comments: None,
        }
    }

    pub fn record(mut self, record_id: Option<RecordId>) -> Self {
        self.record_id = record_id;
        self
    }

    pub fn subject(mut self, subject_id: Uuid) -> Self {
        self.subject_id = Some(subject_id);
        self
    }

    pub fn plant(mut self, plant_id: Option<PlantId>) -> Self {
        self.plant_id = plant_id;
        self
    }

    pub fn values(mut self, old_value: Option<Value>, new_value: Option<Value>) -> Self {
        self.old_value = old_value;
        self.new_value = new_value;
        self
    }

    pub fn status(mut self, status: impl ToString) -> Self {
        self.approve_status = Some(status.to_string());
        self
    }

    pub fn comments(mut self, comments: Option<&str>) -> Self {
        self.comments = comments.map(str::to_string);
        self
    }
}

/// Appends sealed entries to the activity log.
pub struct AuditLogger;

impl AuditLogger {
    /// Links `entry` after the newest entry of its chain and stores it.
    pub async fn record(
        logs: &dyn ActivityLogRepository,
        entry: ActivityEntry,
    ) -> GovernanceResult<ActivityLogModel> {
        let mut model = ActivityLogModel {
            id: Uuid::new_v4(),
            table_name: bounded("table_name", &entry.table_name).map_err(GovernanceError::Validation)?,
            record_id: entry.record_id,
            subject_id: entry.subject_id,
            plant_id: entry.plant_id,
            action: entry.action,
            old_value: entry.old_value,
            new_value: entry.new_value,
            performed_by: entry.performed_by,
            approve_status: bounded_opt("approve_status", entry.approve_status.as_deref())
                .map_err(GovernanceError::Validation)?,
            comments: bounded_opt("comments", entry.comments.as_deref())
                .map_err(GovernanceError::Validation)?,
            timestamp: now_micros(),
            antecedent_hash: 0,
            hash: 0,
        };

        let antecedent_hash = logs.last_hash(&model.chain()).await?;
        model.seal(antecedent_hash).map_err(GovernanceError::Storage)?;

        let mut saved = logs.create_batch(vec![model]).await?;
        saved
            .pop()
            .ok_or_else(|| GovernanceError::Storage("Activity log insert returned no row".to_string()))
    }
}
