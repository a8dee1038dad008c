//! In-process collaborators. Transactions take a store-wide lock, so every
//! unit of work is serialized.

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex, RwLock};

use chrono::Utc;
use futures::lock::{Mutex, OwnedMutexGuard};

use crate::model::{Employee, LeaveRequest, LeaveStatus, NewLeaveRequest, Notification, Role};

use super::notify::{Inbox, Notifier, NotifyError};
use super::store::{EmployeeDirectory, RequestStore, RequestTx, StoreError};

#[derive(Debug, Clone, Default)]
pub struct MemoryDirectory {
    employees: Arc<RwLock<Vec<Employee>>>,
}

impl MemoryDirectory {
    pub fn new(employees: impl IntoIterator<Item = Employee>) -> Self {
        Self {
            employees: Arc::new(RwLock::new(employees.into_iter().collect())),
        }
    }

    pub fn insert(&self, employee: Employee) {
        self.employees
            .write()
            .expect("employee directory poisoned")
            .push(employee);
    }

    fn select(&self, mut keep: impl FnMut(&Employee) -> bool) -> Vec<Employee> {
        self.employees
            .read()
            .expect("employee directory poisoned")
            .iter()
            .filter(|employee| keep(employee))
            .cloned()
            .collect()
    }
}

impl EmployeeDirectory for MemoryDirectory {
    async fn find_by_username(&self, username: &str) -> Result<Option<Employee>, StoreError> {
        Ok(self.select(|e| e.username == username).into_iter().next())
    }

    async fn find_by_id(&self, id: u64) -> Result<Option<Employee>, StoreError> {
        Ok(self.select(|e| e.id == id).into_iter().next())
    }

    async fn find_by_department_and_role(
        &self,
        department: &str,
        role: Role,
    ) -> Result<Option<Employee>, StoreError> {
        Ok(self
            .select(|e| e.department == department && e.roles.contains(role))
            .into_iter()
            .min_by_key(|e| e.id))
    }

    async fn find_all_by_role(&self, role: Role) -> Result<Vec<Employee>, StoreError> {
        Ok(self.select(|e| e.roles.contains(role)))
    }
}

#[derive(Debug, Clone, Default)]
struct Ledger {
    requests: BTreeMap<u64, LeaveRequest>,
    last_id: u64,
}

#[derive(Clone, Default)]
pub struct MemoryRequestStore {
    ledger: Arc<Mutex<Ledger>>,
    fail_next_commit: Arc<AtomicBool>,
}

impl MemoryRequestStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The next `commit` reports the store as unavailable and writes nothing.
    pub fn fail_next_commit(&self) {
        self.fail_next_commit.store(true, Ordering::SeqCst);
    }

    /// Seed a record directly, bypassing the workflow.
    pub async fn seed(&self, request: NewLeaveRequest) -> LeaveRequest {
        let mut ledger = self.ledger.lock().await;
        insert(&mut ledger, request)
    }

    pub async fn len(&self) -> usize {
        self.ledger.lock().await.requests.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn insert(ledger: &mut Ledger, request: NewLeaveRequest) -> LeaveRequest {
    ledger.last_id += 1;
    let stored = LeaveRequest {
        id: ledger.last_id,
        applicant: request.applicant,
        kind: request.kind,
        start_date: request.start_date,
        end_date: request.end_date,
        reason: request.reason,
        backup: request.backup,
        status: request.status,
        created_at: Utc::now(),
    };
    ledger.requests.insert(stored.id, stored.clone());
    stored
}

impl RequestStore for MemoryRequestStore {
    type Tx = MemoryTx;

    async fn begin(&self) -> Result<MemoryTx, StoreError> {
        let guard = self.ledger.clone().lock_owned().await;
        let working = Ledger::clone(&guard);
        Ok(MemoryTx {
            guard,
            working,
            fail_commit: self.fail_next_commit.clone(),
        })
    }

    async fn find_by_id(&self, id: u64) -> Result<Option<LeaveRequest>, StoreError> {
        Ok(self.ledger.lock().await.requests.get(&id).cloned())
    }

    async fn find_by_applicant(&self, username: &str) -> Result<Vec<LeaveRequest>, StoreError> {
        let ledger = self.ledger.lock().await;
        let mut found: Vec<_> = ledger
            .requests
            .values()
            .filter(|r| r.applicant == username)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.start_date.cmp(&a.start_date).then(b.id.cmp(&a.id)));
        Ok(found)
    }

    async fn find_by_status(&self, status: LeaveStatus) -> Result<Vec<LeaveRequest>, StoreError> {
        let ledger = self.ledger.lock().await;
        Ok(ledger
            .requests
            .values()
            .filter(|r| r.status == status)
            .cloned()
            .collect())
    }
}

/// Works on a private copy of the ledger; `commit` publishes it.
pub struct MemoryTx {
    guard: OwnedMutexGuard<Ledger>,
    working: Ledger,
    fail_commit: Arc<AtomicBool>,
}

impl RequestTx for MemoryTx {
    async fn lock_applicant(&mut self, _username: &str) -> Result<(), StoreError> {
        // the store-wide guard already excludes every other writer
        Ok(())
    }

    async fn find_active_by_applicant(
        &mut self,
        username: &str,
    ) -> Result<Vec<LeaveRequest>, StoreError> {
        Ok(self
            .working
            .requests
            .values()
            .filter(|r| r.applicant == username && r.status.is_active())
            .cloned()
            .collect())
    }

    async fn find_by_id_for_update(&mut self, id: u64) -> Result<Option<LeaveRequest>, StoreError> {
        Ok(self.working.requests.get(&id).cloned())
    }

    async fn create(&mut self, request: NewLeaveRequest) -> Result<LeaveRequest, StoreError> {
        Ok(insert(&mut self.working, request))
    }

    async fn update_status(
        &mut self,
        id: u64,
        from: LeaveStatus,
        to: LeaveStatus,
    ) -> Result<bool, StoreError> {
        match self.working.requests.get_mut(&id) {
            Some(request) if request.status == from => {
                request.status = to;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete(&mut self, id: u64) -> Result<bool, StoreError> {
        Ok(self.working.requests.remove(&id).is_some())
    }

    async fn commit(self) -> Result<(), StoreError> {
        if self.fail_commit.swap(false, Ordering::SeqCst) {
            return Err(StoreError::Unavailable("commit rejected".to_string()));
        }
        let MemoryTx {
            mut guard, working, ..
        } = self;
        *guard = working;
        Ok(())
    }
}

/// Records deliveries as inbox rows; recipients listed in `unreachable` fail.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    inbox: Arc<StdMutex<Vec<Notification>>>,
    unreachable: HashSet<u64>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unreachable(ids: impl IntoIterator<Item = u64>) -> Self {
        Self {
            unreachable: ids.into_iter().collect(),
            ..Self::default()
        }
    }

    /// `(employee_id, message)` in delivery order.
    pub fn delivered(&self) -> Vec<(u64, String)> {
        self.rows()
            .iter()
            .map(|n| (n.employee_id, n.message.clone()))
            .collect()
    }

    fn rows(&self) -> std::sync::MutexGuard<'_, Vec<Notification>> {
        self.inbox.lock().expect("notifier inbox poisoned")
    }
}

impl Notifier for RecordingNotifier {
    async fn notify(&self, employee_id: u64, message: &str) -> Result<(), NotifyError> {
        if self.unreachable.contains(&employee_id) {
            return Err(NotifyError::Transport(format!(
                "employee {employee_id} unreachable"
            )));
        }
        let mut rows = self.rows();
        let id = rows.len() as u64 + 1;
        rows.push(Notification {
            id,
            employee_id,
            message: message.to_string(),
            is_read: false,
            created_at: Utc::now(),
        });
        Ok(())
    }
}

impl Inbox for RecordingNotifier {
    async fn list(&self, employee_id: u64) -> Result<Vec<Notification>, NotifyError> {
        Ok(self
            .rows()
            .iter()
            .rev()
            .filter(|n| n.employee_id == employee_id)
            .cloned()
            .collect())
    }

    async fn unread_count(&self, employee_id: u64) -> Result<u64, NotifyError> {
        Ok(self
            .rows()
            .iter()
            .filter(|n| n.employee_id == employee_id && !n.is_read)
            .count() as u64)
    }

    async fn mark_all_read(&self, employee_id: u64) -> Result<u64, NotifyError> {
        let mut flipped = 0;
        for row in self
            .rows()
            .iter_mut()
            .filter(|n| n.employee_id == employee_id && !n.is_read)
        {
            row.is_read = true;
            flipped += 1;
        }
        Ok(flipped)
    }
}
