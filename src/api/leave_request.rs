use actix_web::{HttpResponse, web};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::error::ApiError;
use crate::events::EventBus;
use crate::model::leave_request::{LeaveRequest, LeaveStatus, LeaveType};
use crate::store::{LeaveFilter, Store};
use crate::utils::score_cache;
use crate::workflow::leave::{self, SubmitLeave};

#[derive(Deserialize, ToSchema)]
pub struct CreateLeave {
    #[schema(example = "annual")]
    pub leave_type: LeaveType,
    #[schema(example = "2026-03-02", format = "date", value_type = String)]
    pub start_date: chrono::NaiveDate,
    #[schema(example = "2026-03-06", format = "date", value_type = String)]
    pub end_date: chrono::NaiveDate,
    #[schema(example = "family trip abroad")]
    pub reason: String,
}

#[derive(Deserialize, ToSchema)]
pub struct DecisionBody {
    /// Optional note from the decider, stored on the request.
    #[schema(example = "enjoy your trip")]
    pub comment: Option<String>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct LeaveQuery {
    /// Filter by employee ID (managers/admins only)
    #[schema(example = 1000)]
    pub employee_id: Option<u64>,
    /// Filter by leave status
    #[schema(example = "pending")]
    pub status: Option<LeaveStatus>,
    /// Pagination page number (start with 1)
    #[schema(example = 1)]
    pub page: Option<u64>,
    /// Pagination per page number
    #[schema(example = 10)]
    pub per_page: Option<u64>,
}

#[derive(Serialize, ToSchema)]
pub struct LeaveListResponse {
    pub data: Vec<LeaveRequest>,
    #[schema(example = 1)]
    pub page: u64,
    #[schema(example = 10)]
    pub per_page: u64,
    #[schema(example = 1)]
    pub total: usize,
}

/* =========================
Submit leave request
========================= */
#[utoipa::path(
    post,
    path = "/api/leave",
    request_body = CreateLeave,
    responses(
        (status = 200, description = "Leave request created in pending", body = LeaveRequest),
        (status = 400, description = "Validation error (policy cap, balance, dates, reason)"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn create_leave(
    auth: AuthUser,
    store: web::Data<Store>,
    bus: web::Data<EventBus>,
    payload: web::Json<CreateLeave>,
) -> actix_web::Result<HttpResponse> {
    let actor = auth.actor()?;
    let payload = payload.into_inner();

    let request = leave::submit(
        store.get_ref(),
        bus.get_ref(),
        &actor,
        SubmitLeave {
            employee_id: actor.id,
            leave_type: payload.leave_type,
            start_date: payload.start_date,
            end_date: payload.end_date,
            reason: payload.reason,
        },
    )?;

    Ok(HttpResponse::Ok().json(request))
}

/* =========================
Approve leave (manager/admin)
========================= */
#[utoipa::path(
    put,
    path = "/api/leave/{leave_id}/approve",
    params(("leave_id" = u64, Path, description = "ID of the leave request to approve")),
    request_body(content = DecisionBody, content_type = "application/json"),
    responses(
        (status = 200, description = "Leave approved; response is the authoritative state", body = LeaveRequest),
        (status = 403, description = "Actor is not the employee's manager or an admin"),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Invalid transition or insufficient balance; the request stays pending")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn approve_leave(
    auth: AuthUser,
    store: web::Data<Store>,
    bus: web::Data<EventBus>,
    path: web::Path<u64>,
    payload: Option<web::Json<DecisionBody>>,
) -> actix_web::Result<HttpResponse> {
    decide(auth, store, bus, path, payload, LeaveStatus::Approved).await
}

/* =========================
Reject leave (manager/admin)
========================= */
#[utoipa::path(
    put,
    path = "/api/leave/{leave_id}/reject",
    params(("leave_id" = u64, Path, description = "ID of the leave request to reject")),
    request_body(content = DecisionBody, content_type = "application/json"),
    responses(
        (status = 200, description = "Leave rejected; no balance was touched", body = LeaveRequest),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Invalid transition")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn reject_leave(
    auth: AuthUser,
    store: web::Data<Store>,
    bus: web::Data<EventBus>,
    path: web::Path<u64>,
    payload: Option<web::Json<DecisionBody>>,
) -> actix_web::Result<HttpResponse> {
    decide(auth, store, bus, path, payload, LeaveStatus::Rejected).await
}

async fn decide(
    auth: AuthUser,
    store: web::Data<Store>,
    bus: web::Data<EventBus>,
    path: web::Path<u64>,
    payload: Option<web::Json<DecisionBody>>,
    new_status: LeaveStatus,
) -> actix_web::Result<HttpResponse> {
    let actor = auth.actor()?;
    let leave_id = path.into_inner();
    let comment = payload.and_then(|p| p.into_inner().comment);

    let updated = leave::transition(
        store.get_ref(),
        bus.get_ref(),
        &actor,
        leave_id,
        new_status,
        comment,
    )?;

    score_cache::invalidate(updated.employee_id).await;
    Ok(HttpResponse::Ok().json(updated))
}

/* =========================
Cancel leave (owner, or admin for approved)
========================= */
#[utoipa::path(
    put,
    path = "/api/leave/{leave_id}/cancel",
    params(("leave_id" = u64, Path, description = "ID of the leave request to cancel")),
    responses(
        (status = 200, description = "Leave cancelled; deducted days restored when it was approved", body = LeaveRequest),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Invalid transition")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn cancel_leave(
    auth: AuthUser,
    store: web::Data<Store>,
    bus: web::Data<EventBus>,
    path: web::Path<u64>,
) -> actix_web::Result<HttpResponse> {
    let actor = auth.actor()?;
    let updated = leave::cancel(store.get_ref(), bus.get_ref(), &actor, path.into_inner())?;
    score_cache::invalidate(updated.employee_id).await;
    Ok(HttpResponse::Ok().json(updated))
}

/* =========================
Expiry sweep (admin)
========================= */
#[utoipa::path(
    put,
    path = "/api/leave/expire-sweep",
    responses(
        (status = 200, description = "Number of pending requests expired", body = Object,
         example = json!({ "expired": 2 })),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn expire_sweep(
    auth: AuthUser,
    store: web::Data<Store>,
    bus: web::Data<EventBus>,
    config: web::Data<Config>,
) -> actix_web::Result<HttpResponse> {
    let actor = auth.actor()?;
    let today = Utc::now().date_naive();
    let expired = leave::expire_sweep(
        store.get_ref(),
        bus.get_ref(),
        &actor,
        today,
        config.expire_pending_after_days,
    )?;

    let touched: Vec<u64> = store.list_employees().iter().map(|e| e.id).collect();
    if expired > 0 {
        score_cache::invalidate_many(&touched).await;
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({ "expired": expired })))
}

/* =========================
Get one leave request
========================= */
#[utoipa::path(
    get,
    path = "/api/leave/{leave_id}",
    params(("leave_id" = u64, Path, description = "ID of the leave request to fetch")),
    responses(
        (status = 200, description = "Leave request found", body = LeaveRequest),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave request not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn get_leave(
    auth: AuthUser,
    store: web::Data<Store>,
    path: web::Path<u64>,
) -> actix_web::Result<HttpResponse> {
    let actor = auth.actor()?;
    let request = store.get_leave(path.into_inner())?;

    if actor.id != request.employee_id {
        let employee = store.get_employee(request.employee_id)?;
        actor
            .can_decide_for(&employee)
            .map_err(|_| ApiError::Forbidden("not your leave request".into()))?;
    }

    Ok(HttpResponse::Ok().json(request))
}

/* =========================
List leave requests
========================= */
#[utoipa::path(
    get,
    path = "/api/leave",
    params(LeaveQuery),
    responses(
        (status = 200, description = "Paginated leave list", body = LeaveListResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn leave_list(
    auth: AuthUser,
    store: web::Data<Store>,
    query: web::Query<LeaveQuery>,
) -> actix_web::Result<HttpResponse> {
    let actor = auth.actor()?;

    // Plain employees only ever see their own requests.
    let employee_id = if auth.require_manager_or_admin().is_ok() {
        query.employee_id
    } else {
        Some(actor.id)
    };

    let (data, total) = store.list_leaves(&LeaveFilter {
        employee_id,
        status: query.status,
        page: query.page,
        per_page: query.per_page,
    });

    Ok(HttpResponse::Ok().json(LeaveListResponse {
        data,
        page: query.page.unwrap_or(1).max(1),
        per_page: query.per_page.unwrap_or(10).min(100),
        total,
    }))
}
