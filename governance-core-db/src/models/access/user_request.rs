use chrono::{DateTime, Utc};
use governance_core_api::{ActorId, UserRequestStatus};
use heapless::String as HeaplessString;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::auditable::Auditable;
use crate::models::identifiable::Identifiable;
use crate::utils::hash_as_i64;

/// # Documentation
/// Parent of a batch of access tasks.
///
/// `status` is derived from the child task statuses and is rewritten after every
/// task transition; it is never set directly by a caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRequestModel {
    pub id: Uuid,
    pub requested_by: ActorId,
    pub description: Option<HeaplessString<500>>,
    pub status: UserRequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub hash: i64,
}

impl UserRequestModel {
    pub fn rehash(&mut self) -> Result<i64, String> {
        self.hash = 0;
        self.hash = hash_as_i64(self)?;
        Ok(self.hash)
    }
}

impl Identifiable for UserRequestModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}

impl Auditable for UserRequestModel {
    fn audit_table_name(&self) -> &'static str {
        "user_request"
    }

    fn get_hash(&self) -> i64 {
        self.hash
    }
}
