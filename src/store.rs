use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::NaiveDate;

use crate::error::{ApiError, ApiResult};
use crate::ledger::Ledger;
use crate::model::audit::AuditLogEntry;
use crate::model::department::Department;
use crate::model::employee::Employee;
use crate::model::holiday::Holiday;
use crate::model::leave_request::{LeaveRequest, LeaveStatus};
use crate::model::reimbursement::ReimbursementClaim;

/// In-process application state. Persistence is an external collaborator;
/// everything the core workflows touch lives here, behind per-collection
/// locks, with the balance ledger carrying its own compare-and-set
/// discipline.
pub struct Store {
    employees: RwLock<HashMap<u64, Employee>>,
    departments: RwLock<HashMap<u64, Department>>,
    leave_requests: RwLock<HashMap<u64, LeaveRequest>>,
    claims: RwLock<HashMap<u64, ReimbursementClaim>>,
    holidays: RwLock<Vec<Holiday>>,
    audit_log: RwLock<Vec<AuditLogEntry>>,
    pub ledger: Ledger,
    sequence: AtomicU64,
}

impl Store {
    pub fn new() -> Self {
        Self {
            employees: RwLock::new(HashMap::new()),
            departments: RwLock::new(HashMap::new()),
            leave_requests: RwLock::new(HashMap::new()),
            claims: RwLock::new(HashMap::new()),
            holidays: RwLock::new(Vec::new()),
            audit_log: RwLock::new(Vec::new()),
            ledger: Ledger::new(),
            sequence: AtomicU64::new(1),
        }
    }

    pub fn next_id(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::Relaxed)
    }

    // ---- employees -------------------------------------------------------

    /// Insert an employee and seed their leave accounts from the department
    /// policy. The department must exist.
    pub fn insert_employee(&self, mut employee: Employee) -> ApiResult<Employee> {
        let policy = self
            .get_department(employee.department_id)?
            .leave_policy;
        if employee.id == 0 {
            employee.id = self.next_id();
        }
        self.ledger.init_employee(employee.id, &policy);
        self.employees
            .write()
            .unwrap()
            .insert(employee.id, employee.clone());
        Ok(employee)
    }

    pub fn get_employee(&self, id: u64) -> ApiResult<Employee> {
        self.employees
            .read()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("employee {id}")))
    }

    pub fn list_employees(&self) -> Vec<Employee> {
        let mut all: Vec<_> = self.employees.read().unwrap().values().cloned().collect();
        all.sort_by_key(|e| e.id);
        all
    }

    /// Direct reports of a manager.
    pub fn reports_of(&self, manager_id: u64) -> Vec<Employee> {
        let mut reports: Vec<_> = self
            .employees
            .read()
            .unwrap()
            .values()
            .filter(|e| e.manager_id == Some(manager_id))
            .cloned()
            .collect();
        reports.sort_by_key(|e| e.id);
        reports
    }

    /// Employees sharing a department, excluding `employee_id` itself.
    pub fn teammates_of(&self, employee_id: u64) -> Vec<Employee> {
        let Ok(employee) = self.get_employee(employee_id) else {
            return Vec::new();
        };
        self.employees
            .read()
            .unwrap()
            .values()
            .filter(|e| e.department_id == employee.department_id && e.id != employee_id)
            .cloned()
            .collect()
    }

    // ---- departments -----------------------------------------------------

    pub fn insert_department(&self, mut department: Department) -> Department {
        if department.id == 0 {
            department.id = self.next_id();
        }
        self.departments
            .write()
            .unwrap()
            .insert(department.id, department.clone());
        department
    }

    pub fn get_department(&self, id: u64) -> ApiResult<Department> {
        self.departments
            .read()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("department {id}")))
    }

    pub fn list_departments(&self) -> Vec<Department> {
        let mut all: Vec<_> = self.departments.read().unwrap().values().cloned().collect();
        all.sort_by_key(|d| d.id);
        all
    }

    // ---- leave requests --------------------------------------------------

    pub fn insert_leave(&self, mut request: LeaveRequest) -> LeaveRequest {
        if request.id == 0 {
            request.id = self.next_id();
        }
        self.leave_requests
            .write()
            .unwrap()
            .insert(request.id, request.clone());
        request
    }

    pub fn get_leave(&self, id: u64) -> ApiResult<LeaveRequest> {
        self.leave_requests
            .read()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("leave request {id}")))
    }

    /// Run `f` against the request under the write lock. Status checks and
    /// the write they guard happen atomically; two concurrent approvals of
    /// the same request cannot both observe `pending`.
    pub fn with_leave_mut<T>(
        &self,
        id: u64,
        f: impl FnOnce(&mut LeaveRequest) -> ApiResult<T>,
    ) -> ApiResult<T> {
        let mut requests = self.leave_requests.write().unwrap();
        let request = requests
            .get_mut(&id)
            .ok_or_else(|| ApiError::NotFound(format!("leave request {id}")))?;
        f(request)
    }

    pub fn list_leaves(&self, filter: &LeaveFilter) -> (Vec<LeaveRequest>, usize) {
        let requests = self.leave_requests.read().unwrap();
        let mut matched: Vec<_> = requests
            .values()
            .filter(|r| filter.employee_id.map_or(true, |id| r.employee_id == id))
            .filter(|r| filter.status.map_or(true, |s| r.status == s))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.applied_at.cmp(&a.applied_at).then(b.id.cmp(&a.id)));
        let total = matched.len();
        let page = paginate(matched, filter.page, filter.per_page);
        (page, total)
    }

    /// Approved requests for one employee, oldest first. Advisory input.
    pub fn approved_leaves_of(&self, employee_id: u64) -> Vec<LeaveRequest> {
        let mut leaves: Vec<_> = self
            .leave_requests
            .read()
            .unwrap()
            .values()
            .filter(|r| r.employee_id == employee_id && r.status == LeaveStatus::Approved)
            .cloned()
            .collect();
        leaves.sort_by_key(|r| r.start_date);
        leaves
    }

    /// Pending requests whose end date has already passed, fodder for the
    /// expiry sweep.
    pub fn stale_pending_leaves(&self, cutoff: NaiveDate) -> Vec<u64> {
        self.leave_requests
            .read()
            .unwrap()
            .values()
            .filter(|r| r.status == LeaveStatus::Pending && r.end_date < cutoff)
            .map(|r| r.id)
            .collect()
    }

    // ---- reimbursement claims -------------------------------------------

    pub fn insert_claim(&self, mut claim: ReimbursementClaim) -> ReimbursementClaim {
        if claim.id == 0 {
            claim.id = self.next_id();
        }
        self.claims.write().unwrap().insert(claim.id, claim.clone());
        claim
    }

    pub fn get_claim(&self, id: u64) -> ApiResult<ReimbursementClaim> {
        self.claims
            .read()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("claim {id}")))
    }

    pub fn with_claim_mut<T>(
        &self,
        id: u64,
        f: impl FnOnce(&mut ReimbursementClaim) -> ApiResult<T>,
    ) -> ApiResult<T> {
        let mut claims = self.claims.write().unwrap();
        let claim = claims
            .get_mut(&id)
            .ok_or_else(|| ApiError::NotFound(format!("claim {id}")))?;
        f(claim)
    }

    pub fn list_claims(&self, filter: &ClaimFilter) -> (Vec<ReimbursementClaim>, usize) {
        let claims = self.claims.read().unwrap();
        let mut matched: Vec<_> = claims
            .values()
            .filter(|c| filter.employee_id.map_or(true, |id| c.employee_id == id))
            .filter(|c| filter.status.map_or(true, |s| c.status == s))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at).then(b.id.cmp(&a.id)));
        let total = matched.len();
        let page = paginate(matched, filter.page, filter.per_page);
        (page, total)
    }

    // ---- holidays --------------------------------------------------------

    pub fn insert_holiday(&self, mut holiday: Holiday) -> Holiday {
        if holiday.id == 0 {
            holiday.id = self.next_id();
        }
        self.holidays.write().unwrap().push(holiday.clone());
        holiday
    }

    pub fn list_holidays(&self) -> Vec<Holiday> {
        self.holidays.read().unwrap().clone()
    }

    /// True when any holiday is observed on `date` (recurring-aware).
    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays
            .read()
            .unwrap()
            .iter()
            .any(|h| h.observed_on(date))
    }

    // ---- audit trail -----------------------------------------------------

    pub fn append_audit(&self, mut entry: AuditLogEntry) -> AuditLogEntry {
        entry.id = self.next_id();
        self.audit_log.write().unwrap().push(entry.clone());
        entry
    }

    pub fn list_audit(&self, page: u64, per_page: u64) -> (Vec<AuditLogEntry>, usize) {
        let log = self.audit_log.read().unwrap();
        let mut entries: Vec<_> = log.iter().cloned().collect();
        entries.reverse();
        let total = entries.len();
        (paginate(entries, Some(page), Some(per_page)), total)
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LeaveFilter {
    pub employee_id: Option<u64>,
    pub status: Option<LeaveStatus>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ClaimFilter {
    pub employee_id: Option<u64>,
    pub status: Option<crate::model::reimbursement::ClaimStatus>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

fn paginate<T>(items: Vec<T>, page: Option<u64>, per_page: Option<u64>) -> Vec<T> {
    let per_page = per_page.unwrap_or(10).clamp(1, 100) as usize;
    let page = page.unwrap_or(1).max(1) as usize;
    items
        .into_iter()
        .skip((page - 1) * per_page)
        .take(per_page)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::leave_request::LeaveType;
    use crate::model::role::Role;
    use chrono::Utc;
    use std::collections::BTreeMap;

    fn dept(store: &Store) -> Department {
        let mut policy = BTreeMap::new();
        policy.insert(LeaveType::Annual, 20);
        policy.insert(LeaveType::Sick, 12);
        store.insert_department(Department {
            id: 0,
            name: "Engineering".into(),
            code: "ENG".into(),
            manager_id: None,
            leave_policy: policy,
            max_consecutive_days: Some(15),
        })
    }

    #[test]
    fn employee_insert_seeds_ledger_from_department_policy() {
        let store = Store::new();
        let d = dept(&store);
        let e = store
            .insert_employee(Employee {
                id: 0,
                name: "Jane".into(),
                email: "jane@company.com".into(),
                role: Role::Employee,
                department_id: d.id,
                manager_id: None,
            })
            .unwrap();
        assert_eq!(store.ledger.get_balance(e.id, LeaveType::Annual), 20);
        assert_eq!(store.ledger.get_balance(e.id, LeaveType::Sick), 12);
    }

    #[test]
    fn employee_insert_without_department_fails() {
        let store = Store::new();
        let err = store
            .insert_employee(Employee {
                id: 0,
                name: "Ghost".into(),
                email: "ghost@company.com".into(),
                role: Role::Employee,
                department_id: 404,
                manager_id: None,
            })
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn leave_list_filters_and_paginates() {
        let store = Store::new();
        for i in 0..3u64 {
            store.insert_leave(LeaveRequest {
                id: 0,
                employee_id: if i == 0 { 1 } else { 2 },
                leave_type: LeaveType::Annual,
                start_date: chrono::NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
                end_date: chrono::NaiveDate::from_ymd_opt(2026, 3, 3).unwrap(),
                total_days: 2,
                reason: "a valid reason".into(),
                status: LeaveStatus::Pending,
                applied_at: Utc::now(),
                manager_comment: None,
            });
        }
        let (all, total) = store.list_leaves(&LeaveFilter::default());
        assert_eq!(total, 3);
        assert_eq!(all.len(), 3);

        let (mine, total) = store.list_leaves(&LeaveFilter {
            employee_id: Some(2),
            ..Default::default()
        });
        assert_eq!(total, 2);
        assert_eq!(mine.len(), 2);

        let (page, total) = store.list_leaves(&LeaveFilter {
            per_page: Some(2),
            page: Some(2),
            ..Default::default()
        });
        assert_eq!(total, 3);
        assert_eq!(page.len(), 1);
    }
}
