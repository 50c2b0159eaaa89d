use serde::{Deserialize, Serialize};

use super::ids::RecordId;
use super::status::MutationAction;

/// Entity-table row touched by a commit, returned to the caller so it can
/// refresh whatever depends on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityChange {
    pub table_name: String,
    pub record_id: RecordId,
    pub action: MutationAction,
}
