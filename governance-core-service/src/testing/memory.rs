use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use governance_core_api::{ApprovalQuery, ApprovalStatus, PlantFilter, RecordId, RoleId, Scope};
use governance_core_db::models::access::{TaskModel, UserRequestModel};
use governance_core_db::models::approval::ApprovalRequestModel;
use governance_core_db::models::audit::{ActivityChain, ActivityLogModel};
use governance_core_db::models::entity::{value_as_i64, DependencyRule, EntityRow, ENTITY_ID_COLUMN};
use governance_core_db::models::permission::RoleGrantModel;
use governance_core_db::models::workflow::WorkflowModel;
use governance_core_db::repository::{
    ActivityLogRepository, ApprovalRequestRepository, CreateBatch, EntityRowRepository,
    GuardedUpdate, IntegrityCheck, Load, LoadBatch, Page, PageRequest, RoleGrantRepository,
    TaskRepository, UnitOfWork, UnitOfWorkSession, UserRequestRepository, WorkflowRepository,
};
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::OwnedMutexGuard;
use uuid::Uuid;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Write applied by [`MemoryUnitOfWork::interleave_after_next_read`].
type Interleaved = Box<dyn Fn(&mut MemoryState) + Send + Sync>;

/// Everything the engine persists, plus the host's entity tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryState {
    pub approval_requests: Vec<ApprovalRequestModel>,
    pub workflows: Vec<WorkflowModel>,
    pub user_requests: Vec<UserRequestModel>,
    pub tasks: Vec<TaskModel>,
    pub activity_logs: Vec<ActivityLogModel>,
    pub role_grants: Vec<RoleGrantModel>,
    pub tables: HashMap<String, BTreeMap<RecordId, EntityRow>>,
    sequences: HashMap<String, RecordId>,
}

impl MemoryState {
    pub fn row(&self, table_name: &str, record_id: RecordId) -> Option<&EntityRow> {
        self.tables.get(table_name)?.get(&record_id)
    }

    pub fn table_len(&self, table_name: &str) -> usize {
        self.tables.get(table_name).map_or(0, BTreeMap::len)
    }

    /// Stores a row under an explicit id, keeping the table sequence ahead of it.
    pub fn put_row(&mut self, table_name: &str, record_id: RecordId, mut values: EntityRow) {
        let next = self.sequences.entry(table_name.to_string()).or_insert(0);
        *next = (*next).max(record_id);
        values.insert(ENTITY_ID_COLUMN.to_string(), Value::from(record_id));
        self.tables
            .entry(table_name.to_string())
            .or_default()
            .insert(record_id, values);
    }

    /// Inserts a row with the next id of the table and returns that id.
    pub fn insert_row(&mut self, table_name: &str, mut values: EntityRow) -> RecordId {
        let next = self.sequences.entry(table_name.to_string()).or_insert(0);
        *next += 1;
        let record_id = *next;
        values.insert(ENTITY_ID_COLUMN.to_string(), Value::from(record_id));
        self.tables
            .entry(table_name.to_string())
            .or_default()
            .insert(record_id, values);
        record_id
    }
}

/// Unit of work over a shared [`MemoryState`].
///
/// Sessions are serialized: `begin` waits until the previous session has
/// committed or rolled back. A session works on a private copy that replaces the
/// shared state on commit.
#[derive(Clone, Default)]
pub struct MemoryUnitOfWork {
    shared: Arc<Mutex<MemoryState>>,
    gate: Arc<tokio::sync::Mutex<()>>,
    interleaved: Arc<Mutex<Option<Interleaved>>>,
}

impl MemoryUnitOfWork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mutates the committed state directly, for seeding fixtures.
    pub fn seed<R>(&self, f: impl FnOnce(&mut MemoryState) -> R) -> R {
        f(&mut self.shared.lock())
    }

    /// Copy of the committed state.
    pub fn snapshot(&self) -> MemoryState {
        self.shared.lock().clone()
    }

    /// Commits `write` as another session would, right after the next approval
    /// request or task read. The reader keeps the value it read.
    pub fn interleave_after_next_read(&self, write: impl Fn(&mut MemoryState) + Send + Sync + 'static) {
        *self.interleaved.lock() = Some(Box::new(write));
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    type Session = MemorySession;

    async fn begin(&self) -> Result<MemorySession, BoxError> {
        let gate = self.gate.clone().lock_owned().await;
        let working = self.shared.lock().clone();
        Ok(MemorySession {
            _gate: gate,
            shared: self.shared.clone(),
            working: Mutex::new(working),
            interleaved: self.interleaved.clone(),
        })
    }
}

pub struct MemorySession {
    _gate: OwnedMutexGuard<()>,
    shared: Arc<Mutex<MemoryState>>,
    working: Mutex<MemoryState>,
    interleaved: Arc<Mutex<Option<Interleaved>>>,
}

impl MemorySession {
    fn after_read(&self) {
        let write = self.interleaved.lock().take();
        if let Some(write) = write {
            write(&mut self.shared.lock());
            write(&mut self.working.lock());
        }
    }
}

#[async_trait]
impl UnitOfWorkSession for MemorySession {
    fn approval_requests(&self) -> &dyn ApprovalRequestRepository {
        self
    }

    fn workflows(&self) -> &dyn WorkflowRepository {
        self
    }

    fn user_requests(&self) -> &dyn UserRequestRepository {
        self
    }

    fn tasks(&self) -> &dyn TaskRepository {
        self
    }

    fn activity_logs(&self) -> &dyn ActivityLogRepository {
        self
    }

    fn role_grants(&self) -> &dyn RoleGrantRepository {
        self
    }

    fn entity_rows(&self) -> &dyn EntityRowRepository {
        self
    }

    fn integrity(&self) -> &dyn IntegrityCheck {
        self
    }

    async fn commit(self) -> Result<(), BoxError> {
        let working = self.working.into_inner();
        *self.shared.lock() = working;
        Ok(())
    }

    async fn rollback(self) -> Result<(), BoxError> {
        Ok(())
    }
}

#[async_trait]
impl Load<ApprovalRequestModel> for MemorySession {
    async fn load(&self, id: Uuid) -> Result<Option<ApprovalRequestModel>, BoxError> {
        let found = self
            .working
            .lock()
            .approval_requests
            .iter()
            .find(|r| r.id == id)
            .cloned();
        self.after_read();
        Ok(found)
    }
}

#[async_trait]
impl CreateBatch<ApprovalRequestModel> for MemorySession {
    async fn create_batch(
        &self,
        items: Vec<ApprovalRequestModel>,
    ) -> Result<Vec<ApprovalRequestModel>, BoxError> {
        self.working
            .lock()
            .approval_requests
            .extend(items.iter().cloned());
        Ok(items)
    }
}

#[async_trait]
impl GuardedUpdate<ApprovalRequestModel> for MemorySession {
    async fn update_guarded(
        &self,
        item: &ApprovalRequestModel,
        expected_hash: i64,
    ) -> Result<bool, BoxError> {
        let mut state = self.working.lock();
        match state.approval_requests.iter_mut().find(|r| r.id == item.id) {
            Some(stored) if stored.hash == expected_hash && stored.status == ApprovalStatus::Pending => {
                *stored = item.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl ApprovalRequestRepository for MemorySession {
    async fn find_page(
        &self,
        query: &ApprovalQuery,
        plants: &PlantFilter,
        page: PageRequest,
    ) -> Result<Page<ApprovalRequestModel>, BoxError> {
        let mut matching: Vec<_> = self
            .working
            .lock()
            .approval_requests
            .iter()
            .filter(|r| query.module.as_deref().is_none_or(|m| r.module.as_str() == m))
            .filter(|r| query.status.is_none_or(|s| r.status == s))
            .filter(|r| plants.admits(r.plant_id))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(Page::from_items(matching, page))
    }
}

#[async_trait]
impl Load<WorkflowModel> for MemorySession {
    async fn load(&self, id: Uuid) -> Result<Option<WorkflowModel>, BoxError> {
        Ok(self.working.lock().workflows.iter().find(|w| w.id == id).cloned())
    }
}

#[async_trait]
impl WorkflowRepository for MemorySession {
    async fn find_active_by_scope(&self, scope: &Scope) -> Result<Vec<WorkflowModel>, BoxError> {
        Ok(self
            .working
            .lock()
            .workflows
            .iter()
            .filter(|w| w.is_active && w.matches(scope))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl Load<UserRequestModel> for MemorySession {
    async fn load(&self, id: Uuid) -> Result<Option<UserRequestModel>, BoxError> {
        Ok(self
            .working
            .lock()
            .user_requests
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }
}

#[async_trait]
impl CreateBatch<UserRequestModel> for MemorySession {
    async fn create_batch(&self, items: Vec<UserRequestModel>) -> Result<Vec<UserRequestModel>, BoxError> {
        self.working.lock().user_requests.extend(items.iter().cloned());
        Ok(items)
    }
}

#[async_trait]
impl GuardedUpdate<UserRequestModel> for MemorySession {
    async fn update_guarded(&self, item: &UserRequestModel, expected_hash: i64) -> Result<bool, BoxError> {
        let mut state = self.working.lock();
        match state.user_requests.iter_mut().find(|r| r.id == item.id) {
            Some(stored) if stored.hash == expected_hash => {
                *stored = item.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl UserRequestRepository for MemorySession {
    async fn lock_for_update(&self, id: Uuid) -> Result<Option<UserRequestModel>, BoxError> {
        // Sessions are already serialized by the gate.
        Load::<UserRequestModel>::load(self, id).await
    }
}

#[async_trait]
impl Load<TaskModel> for MemorySession {
    async fn load(&self, id: Uuid) -> Result<Option<TaskModel>, BoxError> {
        let found = self.working.lock().tasks.iter().find(|t| t.id == id).cloned();
        self.after_read();
        Ok(found)
    }
}

#[async_trait]
impl LoadBatch<TaskModel> for MemorySession {
    async fn load_batch(&self, ids: &[Uuid]) -> Result<Vec<Option<TaskModel>>, BoxError> {
        let state = self.working.lock();
        Ok(ids
            .iter()
            .map(|id| state.tasks.iter().find(|t| t.id == *id).cloned())
            .collect())
    }
}

#[async_trait]
impl CreateBatch<TaskModel> for MemorySession {
    async fn create_batch(&self, items: Vec<TaskModel>) -> Result<Vec<TaskModel>, BoxError> {
        self.working.lock().tasks.extend(items.iter().cloned());
        Ok(items)
    }
}

#[async_trait]
impl GuardedUpdate<TaskModel> for MemorySession {
    async fn update_guarded(&self, item: &TaskModel, expected_hash: i64) -> Result<bool, BoxError> {
        let mut state = self.working.lock();
        match state.tasks.iter_mut().find(|t| t.id == item.id) {
            Some(stored) if stored.hash == expected_hash => {
                *stored = item.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl TaskRepository for MemorySession {
    async fn find_by_user_request_id(&self, user_request_id: Uuid) -> Result<Vec<TaskModel>, BoxError> {
        Ok(self
            .working
            .lock()
            .tasks
            .iter()
            .filter(|t| t.user_request_id == user_request_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CreateBatch<ActivityLogModel> for MemorySession {
    async fn create_batch(&self, items: Vec<ActivityLogModel>) -> Result<Vec<ActivityLogModel>, BoxError> {
        self.working.lock().activity_logs.extend(items.iter().cloned());
        Ok(items)
    }
}

#[async_trait]
impl ActivityLogRepository for MemorySession {
    async fn find_by_record(
        &self,
        table_name: &str,
        record_id: RecordId,
        plants: &PlantFilter,
        page: PageRequest,
    ) -> Result<Page<ActivityLogModel>, BoxError> {
        let entries = self
            .working
            .lock()
            .activity_logs
            .iter()
            .filter(|e| e.table_name.as_str() == table_name && e.record_id == Some(record_id))
            .filter(|e| plants.admits(e.plant_id))
            .cloned()
            .collect();
        Ok(Page::from_items(entries, page))
    }

    async fn find_by_subject(
        &self,
        subject_id: Uuid,
        plants: &PlantFilter,
        page: PageRequest,
    ) -> Result<Page<ActivityLogModel>, BoxError> {
        let entries = self
            .working
            .lock()
            .activity_logs
            .iter()
            .filter(|e| e.subject_id == Some(subject_id))
            .filter(|e| plants.admits(e.plant_id))
            .cloned()
            .collect();
        Ok(Page::from_items(entries, page))
    }

    async fn last_hash(&self, chain: &ActivityChain) -> Result<i64, BoxError> {
        Ok(self
            .working
            .lock()
            .activity_logs
            .iter()
            .rev()
            .find(|e| e.chain() == *chain)
            .map_or(0, |e| e.hash))
    }
}

#[async_trait]
impl RoleGrantRepository for MemorySession {
    async fn find_by_role_ids(&self, role_ids: &[RoleId]) -> Result<Vec<RoleGrantModel>, BoxError> {
        Ok(self
            .working
            .lock()
            .role_grants
            .iter()
            .filter(|g| role_ids.contains(&g.role_id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl EntityRowRepository for MemorySession {
    async fn get_row(&self, table_name: &str, record_id: RecordId) -> Result<Option<EntityRow>, BoxError> {
        Ok(self.working.lock().row(table_name, record_id).cloned())
    }

    async fn insert_row(&self, table_name: &str, values: &EntityRow) -> Result<RecordId, BoxError> {
        Ok(self.working.lock().insert_row(table_name, values.clone()))
    }

    async fn update_row(
        &self,
        table_name: &str,
        record_id: RecordId,
        values: &EntityRow,
    ) -> Result<bool, BoxError> {
        let mut state = self.working.lock();
        let Some(row) = state
            .tables
            .get_mut(table_name)
            .and_then(|rows| rows.get_mut(&record_id))
        else {
            return Ok(false);
        };
        for (column, value) in values {
            if column != ENTITY_ID_COLUMN {
                row.insert(column.clone(), value.clone());
            }
        }
        Ok(true)
    }

    async fn delete_row(&self, table_name: &str, record_id: RecordId) -> Result<bool, BoxError> {
        Ok(self
            .working
            .lock()
            .tables
            .get_mut(table_name)
            .and_then(|rows| rows.remove(&record_id))
            .is_some())
    }
}

#[async_trait]
impl IntegrityCheck for MemorySession {
    async fn count_active_dependents(&self, rule: &DependencyRule, record_id: RecordId) -> Result<i64, BoxError> {
        let state = self.working.lock();
        let count = state
            .tables
            .get(&rule.dependent_table)
            .map_or(0, |rows| {
                rows.values()
                    .filter(|row| row.get(&rule.foreign_key).and_then(value_as_i64) == Some(record_id))
                    .filter(|row| {
                        row.get(&rule.dependent_status_field)
                            .is_some_and(|status| rule.is_active_value(status))
                    })
                    .count()
            });
        Ok(count as i64)
    }
}
