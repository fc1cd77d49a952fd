use chrono::{NaiveDate, Utc};

use crate::error::{ApiError, ApiResult};
use crate::events::{EventBus, EventKind};
use crate::model::reimbursement::{ClaimCategory, ClaimStatus, ReimbursementClaim};
use crate::model::role::Role;
use crate::store::Store;
use crate::workflow::Actor;

pub const MIN_DESCRIPTION_LEN: usize = 5;

#[derive(Debug, Clone)]
pub struct SubmitClaim {
    pub employee_id: u64,
    pub category: ClaimCategory,
    pub amount: f64,
    pub description: String,
    pub expense_date: NaiveDate,
    pub receipt_url: Option<String>,
}

pub fn submit(
    store: &Store,
    bus: &EventBus,
    actor: &Actor,
    input: SubmitClaim,
) -> ApiResult<ReimbursementClaim> {
    if actor.id != input.employee_id && !actor.is_admin() {
        return Err(ApiError::Forbidden(
            "claims can only be submitted for yourself".into(),
        ));
    }
    let employee = store.get_employee(input.employee_id)?;

    if !(input.amount > 0.0) {
        return Err(ApiError::Validation("amount must be positive".into()));
    }
    if input.description.trim().len() < MIN_DESCRIPTION_LEN {
        return Err(ApiError::Validation(format!(
            "description must be at least {MIN_DESCRIPTION_LEN} characters"
        )));
    }

    let claim = store.insert_claim(ReimbursementClaim {
        id: 0,
        employee_id: input.employee_id,
        category: input.category,
        amount: input.amount,
        description: input.description,
        expense_date: input.expense_date,
        receipt_url: input.receipt_url,
        status: ClaimStatus::Pending,
        submitted_at: Utc::now(),
        approver_comment: None,
        approved_by: None,
    });

    bus.emit(
        store,
        EventKind::ClaimSubmitted,
        claim.employee_id,
        actor.id,
        "ReimbursementClaim",
        claim.id,
        format!(
            "{} submitted a {} claim for {:.2}",
            employee.name, claim.category, claim.amount
        ),
    );

    Ok(claim)
}

/// The two-stage chain as a closed (status, role, next) table:
/// manager moves `pending` to `manager_approved`/`rejected` for their own
/// reports; admin finalizes `manager_approved` and may bypass the manager
/// stage on `pending`; the owner cancels from `pending`/`manager_approved`.
pub fn transition(
    store: &Store,
    bus: &EventBus,
    actor: &Actor,
    claim_id: u64,
    new_status: ClaimStatus,
    comment: Option<String>,
) -> ApiResult<ReimbursementClaim> {
    let current = store.get_claim(claim_id)?;
    let employee = store.get_employee(current.employee_id)?;

    let updated = store.with_claim_mut(claim_id, |claim| {
        if claim.status.is_terminal() {
            return Err(ApiError::InvalidTransition(format!(
                "claim is already {} and cannot change",
                claim.status
            )));
        }

        match (claim.status, new_status) {
            (ClaimStatus::Pending, ClaimStatus::ManagerApproved) => {
                require_manager_of(actor, &employee)?;
            }
            (ClaimStatus::Pending, ClaimStatus::Approved | ClaimStatus::Rejected) => {
                // Direct decision on a pending claim: the employee's manager
                // may reject, an admin may do either (manager-stage bypass).
                if new_status == ClaimStatus::Rejected && actor.is_manager_of(&employee) {
                    // ok
                } else if !actor.is_admin() {
                    return Err(ApiError::Forbidden(
                        "only an admin may decide this claim directly".into(),
                    ));
                }
            }
            (ClaimStatus::ManagerApproved, ClaimStatus::Approved | ClaimStatus::Rejected) => {
                // Second stage is admin-only; the manager already had their say.
                if !actor.is_admin() {
                    return Err(ApiError::Forbidden(
                        "a manager-approved claim can only be decided by an admin".into(),
                    ));
                }
            }
            (
                ClaimStatus::Pending | ClaimStatus::ManagerApproved,
                ClaimStatus::Cancelled,
            ) => {
                if actor.id != claim.employee_id {
                    return Err(ApiError::Forbidden(
                        "only the claim's employee may cancel it".into(),
                    ));
                }
            }
            (from, to) => {
                return Err(ApiError::InvalidTransition(format!(
                    "claim cannot move from {from} to {to}"
                )));
            }
        }

        claim.status = new_status;
        if comment.is_some() {
            claim.approver_comment = comment;
        }
        if matches!(
            new_status,
            ClaimStatus::ManagerApproved | ClaimStatus::Approved | ClaimStatus::Rejected
        ) {
            claim.approved_by = Some(actor.id);
        }
        Ok(claim.clone())
    })?;

    let kind = match new_status {
        ClaimStatus::ManagerApproved => EventKind::ClaimManagerApproved,
        ClaimStatus::Approved => EventKind::ClaimApproved,
        ClaimStatus::Rejected => EventKind::ClaimRejected,
        ClaimStatus::Cancelled => EventKind::ClaimCancelled,
        ClaimStatus::Pending => unreachable!("transition into pending is rejected above"),
    };
    bus.emit(
        store,
        kind,
        updated.employee_id,
        actor.id,
        "ReimbursementClaim",
        updated.id,
        format!(
            "{} claim of {} for {:.2} is now {}",
            updated.category, employee.name, updated.amount, updated.status
        ),
    );

    Ok(updated)
}

fn require_manager_of(actor: &Actor, employee: &crate::model::employee::Employee) -> ApiResult<()> {
    if actor.role == Role::Manager && employee.manager_id == Some(actor.id) {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "only the employee's own manager may act on this claim".into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::department::Department;
    use crate::model::employee::Employee;
    use std::collections::BTreeMap;

    struct Fixture {
        store: Store,
        bus: EventBus,
        employee: Actor,
        manager: Actor,
        other_manager: Actor,
        admin: Actor,
        employee_id: u64,
    }

    fn fixture() -> Fixture {
        let store = Store::new();
        let bus = EventBus::new(64);
        let dept = store.insert_department(Department {
            id: 0,
            name: "Sales".into(),
            code: "SAL".into(),
            manager_id: None,
            leave_policy: BTreeMap::new(),
            max_consecutive_days: None,
        });

        let manager = store
            .insert_employee(Employee {
                id: 0,
                name: "Mia".into(),
                email: "mia@company.com".into(),
                role: Role::Manager,
                department_id: dept.id,
                manager_id: None,
            })
            .unwrap();
        let other_manager = store
            .insert_employee(Employee {
                id: 0,
                name: "Omar".into(),
                email: "omar@company.com".into(),
                role: Role::Manager,
                department_id: dept.id,
                manager_id: None,
            })
            .unwrap();
        let employee = store
            .insert_employee(Employee {
                id: 0,
                name: "Eve".into(),
                email: "eve@company.com".into(),
                role: Role::Employee,
                department_id: dept.id,
                manager_id: Some(manager.id),
            })
            .unwrap();
        let admin = store
            .insert_employee(Employee {
                id: 0,
                name: "Ada".into(),
                email: "ada@company.com".into(),
                role: Role::Admin,
                department_id: dept.id,
                manager_id: None,
            })
            .unwrap();

        Fixture {
            employee: Actor {
                id: employee.id,
                role: Role::Employee,
            },
            manager: Actor {
                id: manager.id,
                role: Role::Manager,
            },
            other_manager: Actor {
                id: other_manager.id,
                role: Role::Manager,
            },
            admin: Actor {
                id: admin.id,
                role: Role::Admin,
            },
            employee_id: employee.id,
            store,
            bus,
        }
    }

    fn claim(f: &Fixture) -> ReimbursementClaim {
        submit(
            &f.store,
            &f.bus,
            &f.employee,
            SubmitClaim {
                employee_id: f.employee_id,
                category: ClaimCategory::Travel,
                amount: 125.50,
                description: "taxi to client site".into(),
                expense_date: NaiveDate::from_ymd_opt(2026, 2, 10).unwrap(),
                receipt_url: None,
            },
        )
        .unwrap()
    }

    #[test]
    fn full_chain_manager_then_admin() {
        let f = fixture();
        let c = claim(&f);

        let staged = transition(
            &f.store,
            &f.bus,
            &f.manager,
            c.id,
            ClaimStatus::ManagerApproved,
            Some("looks reasonable".into()),
        )
        .unwrap();
        assert_eq!(staged.status, ClaimStatus::ManagerApproved);
        assert_eq!(staged.approved_by, Some(f.manager.id));

        let finalized = transition(
            &f.store,
            &f.bus,
            &f.admin,
            c.id,
            ClaimStatus::Approved,
            None,
        )
        .unwrap();
        assert_eq!(finalized.status, ClaimStatus::Approved);
        assert_eq!(finalized.approved_by, Some(f.admin.id));
    }

    #[test]
    fn admin_may_bypass_the_manager_stage() {
        let f = fixture();
        let c = claim(&f);
        let finalized = transition(
            &f.store,
            &f.bus,
            &f.admin,
            c.id,
            ClaimStatus::Approved,
            None,
        )
        .unwrap();
        assert_eq!(finalized.status, ClaimStatus::Approved);
    }

    #[test]
    fn manager_cannot_act_past_their_stage() {
        let f = fixture();
        let c = claim(&f);
        transition(
            &f.store,
            &f.bus,
            &f.manager,
            c.id,
            ClaimStatus::ManagerApproved,
            None,
        )
        .unwrap();

        for next in [ClaimStatus::Approved, ClaimStatus::Rejected] {
            let err = transition(&f.store, &f.bus, &f.manager, c.id, next, None).unwrap_err();
            assert!(matches!(err, ApiError::Forbidden(_)));
        }
    }

    #[test]
    fn manager_of_someone_else_cannot_touch_the_claim() {
        let f = fixture();
        let c = claim(&f);
        let err = transition(
            &f.store,
            &f.bus,
            &f.other_manager,
            c.id,
            ClaimStatus::ManagerApproved,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }

    #[test]
    fn owner_cancel_is_legal_from_pending_and_manager_approved_only() {
        let f = fixture();
        let c = claim(&f);
        let cancelled = transition(
            &f.store,
            &f.bus,
            &f.employee,
            c.id,
            ClaimStatus::Cancelled,
            None,
        )
        .unwrap();
        assert_eq!(cancelled.status, ClaimStatus::Cancelled);

        let c2 = claim(&f);
        transition(&f.store, &f.bus, &f.admin, c2.id, ClaimStatus::Approved, None).unwrap();
        let err = transition(
            &f.store,
            &f.bus,
            &f.employee,
            c2.id,
            ClaimStatus::Cancelled,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, ApiError::InvalidTransition(_)));
    }

    #[test]
    fn terminal_claims_never_change() {
        let f = fixture();
        let c = claim(&f);
        transition(&f.store, &f.bus, &f.admin, c.id, ClaimStatus::Rejected, None).unwrap();
        let err = transition(&f.store, &f.bus, &f.admin, c.id, ClaimStatus::Approved, None)
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidTransition(_)));
    }

    #[test]
    fn invalid_amount_and_description_are_validation_errors() {
        let f = fixture();
        let err = submit(
            &f.store,
            &f.bus,
            &f.employee,
            SubmitClaim {
                employee_id: f.employee_id,
                category: ClaimCategory::Food,
                amount: 0.0,
                description: "team lunch".into(),
                expense_date: NaiveDate::from_ymd_opt(2026, 2, 10).unwrap(),
                receipt_url: None,
            },
        )
        .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        let err = submit(
            &f.store,
            &f.bus,
            &f.employee,
            SubmitClaim {
                employee_id: f.employee_id,
                category: ClaimCategory::Food,
                amount: 10.0,
                description: "abc".into(),
                expense_date: NaiveDate::from_ymd_opt(2026, 2, 10).unwrap(),
                receipt_url: None,
            },
        )
        .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
