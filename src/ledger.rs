use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use tracing::{debug, warn};

use crate::error::{ApiError, ApiResult};
use crate::model::leave_request::LeaveType;

/// Optimistic attempts before falling back to a fully locked decision.
const CAS_ATTEMPTS: u32 = 8;

#[derive(Debug, Clone, Copy)]
struct BalanceCell {
    days: u32,
    version: u64,
}

/// Authoritative per-employee, per-leave-type day balances.
///
/// Mutations go through a versioned compare-and-set: the balance is read,
/// validated, then written only if the version is unchanged. Two concurrent
/// approvals against the same account therefore cannot both deduct from the
/// same snapshot; the loser re-reads and re-validates. The retry is invisible
/// to callers and converges to success or `InsufficientBalance`.
pub struct Ledger {
    accounts: RwLock<HashMap<(u64, LeaveType), BalanceCell>>,
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
        }
    }

    /// Seed an employee's accounts from the department entitlements.
    /// Existing accounts are left untouched.
    pub fn init_employee(&self, employee_id: u64, policy: &BTreeMap<LeaveType, u32>) {
        let mut accounts = self.accounts.write().unwrap();
        for (leave_type, days) in policy {
            accounts
                .entry((employee_id, *leave_type))
                .or_insert(BalanceCell {
                    days: *days,
                    version: 0,
                });
        }
    }

    pub fn get_balance(&self, employee_id: u64, leave_type: LeaveType) -> u32 {
        self.accounts
            .read()
            .unwrap()
            .get(&(employee_id, leave_type))
            .map(|cell| cell.days)
            .unwrap_or(0)
    }

    /// All balances held for an employee, keyed by leave type.
    pub fn balances(&self, employee_id: u64) -> BTreeMap<LeaveType, u32> {
        self.accounts
            .read()
            .unwrap()
            .iter()
            .filter(|((id, _), _)| *id == employee_id)
            .map(|((_, leave_type), cell)| (*leave_type, cell.days))
            .collect()
    }

    /// Deduct `days` from the account. Called only when a request transitions
    /// into `approved`. Fails with `InsufficientBalance` when the account
    /// holds fewer days than requested at commit time.
    pub fn reserve(&self, employee_id: u64, leave_type: LeaveType, days: u32) -> ApiResult<u32> {
        self.adjust(employee_id, leave_type, days, Adjustment::Deduct)
    }

    /// Return `days` to the account, used when a previously approved request
    /// is cancelled. Rejecting a still-pending request never calls this:
    /// deduction happens at approval time, not submission time.
    pub fn restore(&self, employee_id: u64, leave_type: LeaveType, days: u32) -> ApiResult<u32> {
        self.adjust(employee_id, leave_type, days, Adjustment::Restore)
    }

    fn adjust(
        &self,
        employee_id: u64,
        leave_type: LeaveType,
        days: u32,
        op: Adjustment,
    ) -> ApiResult<u32> {
        let key = (employee_id, leave_type);

        for attempt in 0..CAS_ATTEMPTS {
            let snapshot = {
                let accounts = self.accounts.read().unwrap();
                accounts.get(&key).copied()
            };
            let (current, version) = match snapshot {
                Some(cell) => (cell.days, cell.version),
                None => (0, 0),
            };
            let next = op.apply(current, days, leave_type)?;

            let mut accounts = self.accounts.write().unwrap();
            let cell = accounts.entry(key).or_insert(BalanceCell {
                days: 0,
                version: 0,
            });
            if cell.version != version || cell.days != current {
                drop(accounts);
                warn!(
                    employee_id,
                    %leave_type,
                    attempt,
                    "balance changed under us, retrying compare-and-set"
                );
                continue;
            }
            cell.days = next;
            cell.version += 1;
            debug!(employee_id, %leave_type, days, balance = next, "ledger adjusted");
            return Ok(next);
        }

        // Contended past the optimistic bound: decide under the write lock,
        // which is authoritative by construction.
        let mut accounts = self.accounts.write().unwrap();
        let cell = accounts.entry(key).or_insert(BalanceCell {
            days: 0,
            version: 0,
        });
        let next = op.apply(cell.days, days, leave_type)?;
        cell.days = next;
        cell.version += 1;
        Ok(next)
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy)]
enum Adjustment {
    Deduct,
    Restore,
}

impl Adjustment {
    fn apply(&self, current: u32, days: u32, leave_type: LeaveType) -> ApiResult<u32> {
        match self {
            Adjustment::Deduct => {
                if days > current {
                    Err(ApiError::InsufficientBalance {
                        leave_type: leave_type.to_string(),
                        available: current,
                        requested: days,
                    })
                } else {
                    Ok(current - days)
                }
            }
            Adjustment::Restore => Ok(current.saturating_add(days)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn seeded(days: u32) -> Ledger {
        let ledger = Ledger::new();
        let mut policy = BTreeMap::new();
        policy.insert(LeaveType::Annual, days);
        ledger.init_employee(1, &policy);
        ledger
    }

    #[test]
    fn reserve_deducts_and_restore_round_trips() {
        let ledger = seeded(20);
        assert_eq!(ledger.reserve(1, LeaveType::Annual, 5).unwrap(), 15);
        assert_eq!(ledger.restore(1, LeaveType::Annual, 5).unwrap(), 20);
        assert_eq!(ledger.get_balance(1, LeaveType::Annual), 20);
    }

    #[test]
    fn reserve_beyond_balance_fails_and_leaves_balance_intact() {
        let ledger = seeded(3);
        let err = ledger.reserve(1, LeaveType::Annual, 4).unwrap_err();
        assert!(matches!(
            err,
            ApiError::InsufficientBalance {
                available: 3,
                requested: 4,
                ..
            }
        ));
        assert_eq!(ledger.get_balance(1, LeaveType::Annual), 3);
    }

    #[test]
    fn unknown_account_reads_zero_and_rejects_deduction() {
        let ledger = Ledger::new();
        assert_eq!(ledger.get_balance(9, LeaveType::Sick), 0);
        assert!(ledger.reserve(9, LeaveType::Sick, 1).is_err());
    }

    #[test]
    fn init_is_idempotent_and_preserves_spent_days() {
        let ledger = seeded(10);
        ledger.reserve(1, LeaveType::Annual, 4).unwrap();

        let mut policy = BTreeMap::new();
        policy.insert(LeaveType::Annual, 10);
        ledger.init_employee(1, &policy);

        assert_eq!(ledger.get_balance(1, LeaveType::Annual), 6);
    }

    #[test]
    fn concurrent_reserves_never_oversubscribe() {
        let ledger = Arc::new(seeded(10));
        let mut handles = Vec::new();
        for _ in 0..8 {
            let ledger = Arc::clone(&ledger);
            handles.push(std::thread::spawn(move || {
                ledger.reserve(1, LeaveType::Annual, 3).is_ok()
            }));
        }
        let granted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();
        assert_eq!(granted, 3);
        assert_eq!(ledger.get_balance(1, LeaveType::Annual), 1);
    }
}
