use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::auth::auth::AuthUser;
use crate::events::EventBus;
use crate::model::reimbursement::{ClaimCategory, ClaimStatus, ReimbursementClaim};
use crate::model::role::Role;
use crate::store::{ClaimFilter, Store};
use crate::workflow::reimbursement::{self, SubmitClaim};

#[derive(Deserialize, ToSchema)]
pub struct CreateClaim {
    #[schema(example = "travel")]
    pub category: ClaimCategory,
    #[schema(example = 125.50)]
    pub amount: f64,
    #[schema(example = "taxi to client site")]
    pub description: String,
    #[schema(example = "2026-02-10", format = "date", value_type = String)]
    pub expense_date: chrono::NaiveDate,
    #[schema(example = "https://receipts.example.com/abc.jpg", nullable = true)]
    pub receipt_url: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct ClaimDecisionBody {
    #[schema(example = "within policy")]
    pub comment: Option<String>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct ClaimQuery {
    /// Filter by employee ID (managers/admins only)
    #[schema(example = 1000)]
    pub employee_id: Option<u64>,
    /// Filter by claim status
    #[schema(example = "pending")]
    pub status: Option<ClaimStatus>,
    #[schema(example = 1)]
    pub page: Option<u64>,
    #[schema(example = 10)]
    pub per_page: Option<u64>,
}

#[derive(Serialize, ToSchema)]
pub struct ClaimListResponse {
    pub data: Vec<ReimbursementClaim>,
    #[schema(example = 1)]
    pub page: u64,
    #[schema(example = 10)]
    pub per_page: u64,
    #[schema(example = 1)]
    pub total: usize,
}

/* =========================
Submit claim
========================= */
#[utoipa::path(
    post,
    path = "/api/claims",
    request_body = CreateClaim,
    responses(
        (status = 200, description = "Claim created in pending", body = ReimbursementClaim),
        (status = 400, description = "Validation error (amount, description)"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Reimbursement"
)]
pub async fn create_claim(
    auth: AuthUser,
    store: web::Data<Store>,
    bus: web::Data<EventBus>,
    payload: web::Json<CreateClaim>,
) -> actix_web::Result<HttpResponse> {
    let actor = auth.actor()?;
    let payload = payload.into_inner();

    let claim = reimbursement::submit(
        store.get_ref(),
        bus.get_ref(),
        &actor,
        SubmitClaim {
            employee_id: actor.id,
            category: payload.category,
            amount: payload.amount,
            description: payload.description,
            expense_date: payload.expense_date,
            receipt_url: payload.receipt_url,
        },
    )?;

    Ok(HttpResponse::Ok().json(claim))
}

/* =========================
Approve claim (manager stage or admin finalize)
========================= */
#[utoipa::path(
    put,
    path = "/api/claims/{claim_id}/approve",
    params(("claim_id" = u64, Path, description = "ID of the claim to approve")),
    request_body(content = ClaimDecisionBody, content_type = "application/json"),
    responses(
        (status = 200, description = "Managers stage the claim as manager_approved; admins finalize it as approved", body = ReimbursementClaim),
        (status = 403, description = "Actor may not act on this claim at its current stage"),
        (status = 404, description = "Claim not found"),
        (status = 409, description = "Invalid transition")
    ),
    security(("bearer_auth" = [])),
    tag = "Reimbursement"
)]
pub async fn approve_claim(
    auth: AuthUser,
    store: web::Data<Store>,
    bus: web::Data<EventBus>,
    path: web::Path<u64>,
    payload: Option<web::Json<ClaimDecisionBody>>,
) -> actix_web::Result<HttpResponse> {
    let actor = auth.actor()?;
    // A manager's approval advances to the staged state; an admin's is final.
    let new_status = match actor.role {
        Role::Manager => ClaimStatus::ManagerApproved,
        _ => ClaimStatus::Approved,
    };
    let comment = payload.and_then(|p| p.into_inner().comment);
    let updated = reimbursement::transition(
        store.get_ref(),
        bus.get_ref(),
        &actor,
        path.into_inner(),
        new_status,
        comment,
    )?;
    Ok(HttpResponse::Ok().json(updated))
}

/* =========================
Reject claim
========================= */
#[utoipa::path(
    put,
    path = "/api/claims/{claim_id}/reject",
    params(("claim_id" = u64, Path, description = "ID of the claim to reject")),
    request_body(content = ClaimDecisionBody, content_type = "application/json"),
    responses(
        (status = 200, description = "Claim rejected", body = ReimbursementClaim),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Claim not found"),
        (status = 409, description = "Invalid transition")
    ),
    security(("bearer_auth" = [])),
    tag = "Reimbursement"
)]
pub async fn reject_claim(
    auth: AuthUser,
    store: web::Data<Store>,
    bus: web::Data<EventBus>,
    path: web::Path<u64>,
    payload: Option<web::Json<ClaimDecisionBody>>,
) -> actix_web::Result<HttpResponse> {
    let actor = auth.actor()?;
    let comment = payload.and_then(|p| p.into_inner().comment);
    let updated = reimbursement::transition(
        store.get_ref(),
        bus.get_ref(),
        &actor,
        path.into_inner(),
        ClaimStatus::Rejected,
        comment,
    )?;
    Ok(HttpResponse::Ok().json(updated))
}

/* =========================
Cancel claim (owner only, pending/manager_approved)
========================= */
#[utoipa::path(
    put,
    path = "/api/claims/{claim_id}/cancel",
    params(("claim_id" = u64, Path, description = "ID of the claim to cancel")),
    responses(
        (status = 200, description = "Claim cancelled", body = ReimbursementClaim),
        (status = 403, description = "Only the claim's employee may cancel"),
        (status = 404, description = "Claim not found"),
        (status = 409, description = "Invalid transition")
    ),
    security(("bearer_auth" = [])),
    tag = "Reimbursement"
)]
pub async fn cancel_claim(
    auth: AuthUser,
    store: web::Data<Store>,
    bus: web::Data<EventBus>,
    path: web::Path<u64>,
) -> actix_web::Result<HttpResponse> {
    let actor = auth.actor()?;
    let updated = reimbursement::transition(
        store.get_ref(),
        bus.get_ref(),
        &actor,
        path.into_inner(),
        ClaimStatus::Cancelled,
        None,
    )?;
    Ok(HttpResponse::Ok().json(updated))
}

/* =========================
Get one claim
========================= */
#[utoipa::path(
    get,
    path = "/api/claims/{claim_id}",
    params(("claim_id" = u64, Path, description = "ID of the claim to fetch")),
    responses(
        (status = 200, description = "Claim found", body = ReimbursementClaim),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Claim not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Reimbursement"
)]
pub async fn get_claim(
    auth: AuthUser,
    store: web::Data<Store>,
    path: web::Path<u64>,
) -> actix_web::Result<HttpResponse> {
    let actor = auth.actor()?;
    let claim = store.get_claim(path.into_inner())?;

    if actor.id != claim.employee_id && auth.require_manager_or_admin().is_err() {
        return Err(actix_web::error::ErrorForbidden("not your claim"));
    }

    Ok(HttpResponse::Ok().json(claim))
}

/* =========================
List claims
========================= */
#[utoipa::path(
    get,
    path = "/api/claims",
    params(ClaimQuery),
    responses(
        (status = 200, description = "Paginated claim list", body = ClaimListResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Reimbursement"
)]
pub async fn claim_list(
    auth: AuthUser,
    store: web::Data<Store>,
    query: web::Query<ClaimQuery>,
) -> actix_web::Result<HttpResponse> {
    let actor = auth.actor()?;

    let employee_id = if auth.require_manager_or_admin().is_ok() {
        query.employee_id
    } else {
        Some(actor.id)
    };

    let (data, total) = store.list_claims(&ClaimFilter {
        employee_id,
        status: query.status,
        page: query.page,
        per_page: query.per_page,
    });

    Ok(HttpResponse::Ok().json(ClaimListResponse {
        data,
        page: query.page.unwrap_or(1).max(1),
        per_page: query.per_page.unwrap_or(10).min(100),
        total,
    }))
}
