use chrono::{DateTime, Utc};
use governance_core_api::{ActivityAction, ActorId, PlantId, RecordId};
use heapless::String as HeaplessString;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::models::identifiable::Identifiable;
use crate::utils::hash_as_i64;

/// # Documentation
/// Append-only audit entry. Never updated or deleted once written.
///
/// - One entry per successful mutation, decision or task transition.
/// - Entries of one subject form a hash chain: `antecedent_hash` carries the `hash`
///   of the previous entry of the same chain (0 for the first one).
/// - The chain key is `subject_id` when set, else `(table_name, record_id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityLogModel {
    pub id: Uuid,

    pub table_name: HeaplessString<50>,
    pub record_id: Option<RecordId>,
    /// Engine row the entry is about: approval request, task or user request
    pub subject_id: Option<Uuid>,
    pub plant_id: Option<PlantId>,

    pub action: ActivityAction,
    pub old_value: Option<Value>,
    pub new_value: Option<Value>,

    pub performed_by: ActorId,
    /// Approval or task status after the event
    pub approve_status: Option<HeaplessString<20>>,
    pub comments: Option<HeaplessString<500>>,
    pub timestamp: DateTime<Utc>,

    pub antecedent_hash: i64,
    pub hash: i64,
}

/// Key grouping activity entries into one hash chain.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActivityChain {
    Subject(Uuid),
    Record {
        table_name: String,
        record_id: Option<RecordId>,
    },
}

impl ActivityLogModel {
    pub fn chain(&self) -> ActivityChain {
        match self.subject_id {
            Some(subject_id) => ActivityChain::Subject(subject_id),
            None => ActivityChain::Record {
                table_name: self.table_name.to_string(),
                record_id: self.record_id,
            },
        }
    }

    /// Links the entry after `antecedent_hash` and seals it.
    pub fn seal(&mut self, antecedent_hash: i64) -> Result<i64, String> {
        self.antecedent_hash = antecedent_hash;
        self.hash = 0;
        self.hash = hash_as_i64(self)?;
        Ok(self.hash)
    }

    /// Whether the stored hash still matches the entry content.
    pub fn verify(&self) -> bool {
        let mut copy = self.clone();
        copy.hash = 0;
        hash_as_i64(&copy).is_ok_and(|hash| hash == self.hash)
    }
}

impl Identifiable for ActivityLogModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(subject_id: Option<Uuid>) -> ActivityLogModel {
        ActivityLogModel {
            id: Uuid::new_v4(),
            table_name: HeaplessString::try_from("plant").unwrap(),
            record_id: Some(42),
            subject_id,
            plant_id: Some(1),
            action: ActivityAction::Update,
            old_value: Some(json!({"plant_name": "A"})),
            new_value: Some(json!({"plant_name": "B"})),
            performed_by: 9,
            approve_status: Some(HeaplessString::try_from("APPROVED").unwrap()),
            comments: None,
            timestamp: Utc::now(),
            antecedent_hash: 0,
            hash: 0,
        }
    }

    #[test]
    fn test_seal_and_verify() {
        let mut first = entry(None);
        let first_hash = first.seal(0).unwrap();
        assert!(first.verify());

        let mut second = entry(None);
        second.seal(first_hash).unwrap();
        assert_eq!(second.antecedent_hash, first_hash);
        assert!(second.verify());

        second.comments = Some(HeaplessString::try_from("tampered").unwrap());
        assert!(!second.verify());
    }

    #[test]
    fn test_chain_key() {
        let subject = Uuid::new_v4();
        assert_eq!(entry(Some(subject)).chain(), ActivityChain::Subject(subject));
        assert_eq!(
            entry(None).chain(),
            ActivityChain::Record {
                table_name: "plant".to_string(),
                record_id: Some(42)
            }
        );
    }
}
