use chrono::{NaiveDate, Utc};
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::events::{EventBus, EventKind};
use crate::model::leave_request::{LeaveRequest, LeaveStatus, LeaveType};
use crate::store::Store;
use crate::utils::working_days::count_working_days;
use crate::workflow::Actor;

pub const MIN_REASON_LEN: usize = 10;

#[derive(Debug, Clone)]
pub struct SubmitLeave {
    pub employee_id: u64,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
}

/// Create a leave request in `pending`. The policy cap and balance checks the
/// client runs are advisory; these are the authoritative ones.
///
/// No balance is deducted here. Deduction happens only on the transition into
/// `approved`.
pub fn submit(
    store: &Store,
    bus: &EventBus,
    actor: &Actor,
    input: SubmitLeave,
) -> ApiResult<LeaveRequest> {
    if actor.id != input.employee_id && !actor.is_admin() {
        return Err(ApiError::Forbidden(
            "leave can only be requested for yourself".into(),
        ));
    }

    let employee = store.get_employee(input.employee_id)?;
    let department = store.get_department(employee.department_id)?;

    if input.start_date > input.end_date {
        return Err(ApiError::Validation(
            "start_date cannot be after end_date".into(),
        ));
    }
    if input.reason.trim().len() < MIN_REASON_LEN {
        return Err(ApiError::Validation(format!(
            "reason must be at least {MIN_REASON_LEN} characters"
        )));
    }

    let total_days = count_working_days(input.start_date, input.end_date);
    if total_days == 0 {
        return Err(ApiError::Validation(
            "requested range contains no working days".into(),
        ));
    }
    if !department.within_consecutive_cap(input.leave_type, total_days) {
        return Err(ApiError::Validation(format!(
            "{} working days exceeds the department cap of {} consecutive days",
            total_days,
            department.max_consecutive_days.unwrap_or(0)
        )));
    }

    let balance = store.ledger.get_balance(input.employee_id, input.leave_type);
    if total_days > balance {
        return Err(ApiError::Validation(format!(
            "{} working days requested but only {} {} days remain",
            total_days, balance, input.leave_type
        )));
    }

    let request = store.insert_leave(LeaveRequest {
        id: 0,
        employee_id: input.employee_id,
        leave_type: input.leave_type,
        start_date: input.start_date,
        end_date: input.end_date,
        total_days,
        reason: input.reason,
        status: LeaveStatus::Pending,
        applied_at: Utc::now(),
        manager_comment: None,
    });

    bus.emit(
        store,
        EventKind::LeaveSubmitted,
        request.employee_id,
        actor.id,
        "LeaveRequest",
        request.id,
        format!(
            "{} requested {} days of {} leave",
            employee.name, request.total_days, request.leave_type
        ),
    );

    Ok(request)
}

/// Drive a request to `new_status`. The returned request is the
/// authoritative outcome; callers must not rely on a later re-fetch to
/// confirm the action.
pub fn transition(
    store: &Store,
    bus: &EventBus,
    actor: &Actor,
    request_id: u64,
    new_status: LeaveStatus,
    comment: Option<String>,
) -> ApiResult<LeaveRequest> {
    let current = store.get_leave(request_id)?;
    let employee = store.get_employee(current.employee_id)?;

    // Authorization and ledger effects depend on the (current, next) pair.
    let updated = store.with_leave_mut(request_id, |request| {
        match (request.status, new_status) {
            (LeaveStatus::Pending, LeaveStatus::Approved) => {
                actor.can_decide_for(&employee)?;
                // Balance may have moved since submission. On failure the
                // request stays pending and the error reaches the approver.
                store
                    .ledger
                    .reserve(request.employee_id, request.leave_type, request.total_days)?;
            }
            (LeaveStatus::Pending, LeaveStatus::Rejected) => {
                // No ledger effect: nothing was deducted at submission.
                actor.can_decide_for(&employee)?;
            }
            (LeaveStatus::Pending, LeaveStatus::Cancelled) => {
                if actor.id != request.employee_id {
                    return Err(ApiError::Forbidden(
                        "only the requesting employee may cancel a pending request".into(),
                    ));
                }
            }
            (LeaveStatus::Approved, LeaveStatus::Cancelled) => {
                if actor.id != request.employee_id && !actor.is_admin() {
                    return Err(ApiError::Forbidden(
                        "only the owner or an admin may cancel an approved request".into(),
                    ));
                }
                store
                    .ledger
                    .restore(request.employee_id, request.leave_type, request.total_days)?;
            }
            (LeaveStatus::Pending | LeaveStatus::Approved, LeaveStatus::Expired) => {
                // The sweep rule: only the time-based sweep (admin-driven
                // here) expires requests.
                if !actor.is_admin() {
                    return Err(ApiError::Forbidden("only the sweep may expire requests".into()));
                }
            }
            (from, to) => {
                return Err(ApiError::InvalidTransition(format!(
                    "leave request cannot move from {from} to {to}"
                )));
            }
        }

        request.status = new_status;
        if comment.is_some() {
            request.manager_comment = comment;
        }
        Ok(request.clone())
    })?;

    let kind = match new_status {
        LeaveStatus::Approved => EventKind::LeaveApproved,
        LeaveStatus::Rejected => EventKind::LeaveRejected,
        LeaveStatus::Cancelled => EventKind::LeaveCancelled,
        LeaveStatus::Expired => EventKind::LeaveExpired,
        LeaveStatus::Pending => unreachable!("transition into pending is rejected above"),
    };
    bus.emit(
        store,
        kind,
        updated.employee_id,
        actor.id,
        "LeaveRequest",
        updated.id,
        format!(
            "leave request of {} ({} {} days) is now {}",
            employee.name, updated.total_days, updated.leave_type, updated.status
        ),
    );

    Ok(updated)
}

/// Cancellation entry point; owner (pending/approved) or admin (approved).
pub fn cancel(
    store: &Store,
    bus: &EventBus,
    actor: &Actor,
    request_id: u64,
) -> ApiResult<LeaveRequest> {
    transition(store, bus, actor, request_id, LeaveStatus::Cancelled, None)
}

/// Expire pending requests whose end date passed more than `grace_days` ago.
/// The cron trigger is an external collaborator; this applies the rule.
pub fn expire_sweep(
    store: &Store,
    bus: &EventBus,
    actor: &Actor,
    today: NaiveDate,
    grace_days: u32,
) -> ApiResult<usize> {
    if !actor.is_admin() {
        return Err(ApiError::Forbidden("only an admin may run the expiry sweep".into()));
    }
    let cutoff = today - chrono::Days::new(grace_days as u64);
    let stale = store.stale_pending_leaves(cutoff);
    let mut expired = 0usize;
    for id in &stale {
        match transition(store, bus, actor, *id, LeaveStatus::Expired, None) {
            Ok(_) => expired += 1,
            // Raced with another transition; the request is no longer
            // pending, which is fine.
            Err(ApiError::InvalidTransition(_)) => {}
            Err(e) => return Err(e),
        }
    }
    info!(expired, scanned = stale.len(), "pending leave expiry sweep finished");
    Ok(expired)
}
