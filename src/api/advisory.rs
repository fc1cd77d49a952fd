use actix_web::{HttpResponse, web};
use chrono::Utc;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::advisory::burnout::{self, BurnoutResult};
use crate::advisory::parse::{self, ParsedLeave};
use crate::advisory::suggest;
use crate::advisory::timing::{self, AdviceResult};
use crate::auth::auth::AuthUser;
use crate::error::ApiError;
use crate::model::leave_request::{LeaveRequest, LeaveStatus};
use crate::store::Store;
use crate::utils::score_cache;
use crate::workflow::Actor;

#[derive(Deserialize, ToSchema)]
pub struct AdviceBody {
    #[schema(example = "2026-03-09", format = "date", value_type = String)]
    pub start_date: chrono::NaiveDate,
    #[schema(example = "2026-03-13", format = "date", value_type = String)]
    pub end_date: chrono::NaiveDate,
}

#[derive(Deserialize, ToSchema)]
pub struct ParseBody {
    #[schema(example = "3 days sick leave starting tomorrow")]
    pub text: String,
}

fn authorize_view(
    actor: &Actor,
    auth: &AuthUser,
    store: &Store,
    employee_id: u64,
) -> actix_web::Result<()> {
    if actor.id == employee_id || auth.require_admin().is_ok() {
        return Ok(());
    }
    let employee = store.get_employee(employee_id)?;
    if actor.is_manager_of(&employee) {
        Ok(())
    } else {
        Err(ApiError::Forbidden("not your report".into()).into())
    }
}

async fn burnout_for(store: &Store, employee_id: u64) -> BurnoutResult {
    if let Some(cached) = score_cache::get(employee_id).await {
        return cached;
    }
    let today = Utc::now().date_naive();
    let history = store.approved_leaves_of(employee_id);
    let result = burnout::score(employee_id, &history, today);
    score_cache::put(employee_id, result.clone()).await;
    result
}

/* =========================
Burnout score (self, manager, admin)
========================= */
#[utoipa::path(
    get,
    path = "/api/advisory/burnout/{employee_id}",
    params(("employee_id" = u64, Path, description = "Employee to score")),
    responses(
        (status = 200, description = "Deterministic rule-based burnout score", body = BurnoutResult),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Employee not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Advisory"
)]
pub async fn get_burnout(
    auth: AuthUser,
    store: web::Data<Store>,
    path: web::Path<u64>,
) -> actix_web::Result<HttpResponse> {
    let actor = auth.actor()?;
    let employee_id = path.into_inner();
    store.get_employee(employee_id)?;
    authorize_view(&actor, &auth, store.get_ref(), employee_id)?;

    let result = burnout_for(store.get_ref(), employee_id).await;
    Ok(HttpResponse::Ok().json(result))
}

/* =========================
Team burnout (manager self, admin)
========================= */
#[utoipa::path(
    get,
    path = "/api/advisory/team/{manager_id}",
    params(("manager_id" = u64, Path, description = "Manager whose reports to aggregate")),
    responses(
        (status = 200, description = "Aggregate burnout for the manager's direct reports", body = crate::advisory::burnout::TeamBurnout),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Advisory"
)]
pub async fn get_team_burnout(
    auth: AuthUser,
    store: web::Data<Store>,
    path: web::Path<u64>,
) -> actix_web::Result<HttpResponse> {
    let actor = auth.actor()?;
    let manager_id = path.into_inner();
    if actor.id != manager_id && auth.require_admin().is_err() {
        return Err(ApiError::Forbidden("not your team".into()).into());
    }

    let mut members = Vec::new();
    for report in store.reports_of(manager_id) {
        members.push(burnout_for(store.get_ref(), report.id).await);
    }
    Ok(HttpResponse::Ok().json(burnout::team_score(manager_id, members)))
}

/* =========================
Leave-timing advice
========================= */
#[utoipa::path(
    post,
    path = "/api/advisory/advice",
    request_body = AdviceBody,
    responses(
        (status = 200, description = "Timing score for the proposed range; advisory only", body = AdviceResult),
        (status = 400, description = "Invalid range")
    ),
    security(("bearer_auth" = [])),
    tag = "Advisory"
)]
pub async fn get_advice(
    auth: AuthUser,
    store: web::Data<Store>,
    payload: web::Json<AdviceBody>,
) -> actix_web::Result<HttpResponse> {
    let actor = auth.actor()?;
    let payload = payload.into_inner();
    if payload.start_date > payload.end_date {
        return Err(ApiError::Validation("start_date cannot be after end_date".into()).into());
    }

    let holidays = store.list_holidays();
    let teammate_leaves: Vec<LeaveRequest> = store
        .teammates_of(actor.id)
        .iter()
        .flat_map(|t| store.approved_leaves_of(t.id))
        .filter(|l| l.status == LeaveStatus::Approved)
        .collect();

    let advice = timing::advise(
        payload.start_date,
        payload.end_date,
        &holidays,
        &teammate_leaves,
    );
    Ok(HttpResponse::Ok().json(advice))
}

/* =========================
Proactive suggestions
========================= */
#[utoipa::path(
    get,
    path = "/api/advisory/suggestions/{employee_id}",
    params(("employee_id" = u64, Path, description = "Employee to suggest leave for")),
    responses(
        (status = 200, description = "Suggested leave windows; empty when no action is needed",
         body = [crate::advisory::suggest::LeaveSuggestion]),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Employee not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Advisory"
)]
pub async fn get_suggestions(
    auth: AuthUser,
    store: web::Data<Store>,
    path: web::Path<u64>,
) -> actix_web::Result<HttpResponse> {
    let actor = auth.actor()?;
    let employee_id = path.into_inner();
    store.get_employee(employee_id)?;
    authorize_view(&actor, &auth, store.get_ref(), employee_id)?;

    let today = Utc::now().date_naive();
    let history = store.approved_leaves_of(employee_id);
    let burnout = burnout_for(store.get_ref(), employee_id).await;
    let suggestions = suggest::suggest(&burnout, &history, &store.list_holidays(), today);
    Ok(HttpResponse::Ok().json(suggestions))
}

/* =========================
Natural-language parse
========================= */
#[utoipa::path(
    post,
    path = "/api/advisory/parse",
    request_body = ParseBody,
    responses(
        (status = 200,
         description = "Best-effort extraction. Confidence below 0.5 must be confirmed by the user before submission.",
         body = ParsedLeave)
    ),
    security(("bearer_auth" = [])),
    tag = "Advisory"
)]
pub async fn parse_leave_text(
    auth: AuthUser,
    payload: web::Json<ParseBody>,
) -> actix_web::Result<HttpResponse> {
    auth.actor()?;
    let today = Utc::now().date_naive();
    let parsed = parse::parse(&payload.text, today);
    Ok(HttpResponse::Ok().json(parsed))
}
