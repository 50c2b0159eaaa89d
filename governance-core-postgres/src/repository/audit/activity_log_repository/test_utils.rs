#[cfg(test)]
pub mod test_utils {
    use chrono::{SubsecRound, Utc};
    use governance_core_api::{ActivityAction, PlantId};
    use governance_core_db::models::audit::ActivityLogModel;
    use heapless::String as HeaplessString;
    use serde_json::json;
    use uuid::Uuid;

    /// Sealed entry on `user_note` 77, or on `subject_id` when given.
    pub fn create_test_entry(
        subject_id: Option<Uuid>,
        plant_id: Option<PlantId>,
        antecedent_hash: i64,
    ) -> ActivityLogModel {
        let mut entry = ActivityLogModel {
            id: Uuid::new_v4(),
            table_name: HeaplessString::try_from("user_note").unwrap(),
            record_id: Some(77),
            subject_id,
            plant_id,
            action: ActivityAction::Update,
            old_value: Some(json!({"body": "draft"})),
            new_value: Some(json!({"body": "final"})),
            performed_by: 7,
            approve_status: None,
            comments: None,
            timestamp: Utc::now().trunc_subsecs(6),
            antecedent_hash: 0,
            hash: 0,
        };
        entry.seal(antecedent_hash).unwrap();
        entry
    }
}
