use actix_web::{HttpResponse, web};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::auth::auth::AuthUser;
use crate::model::holiday::{Holiday, HolidayType};
use crate::store::Store;

#[derive(Deserialize, ToSchema)]
pub struct CreateHoliday {
    #[schema(example = "New Year's Day")]
    pub name: String,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub date: chrono::NaiveDate,
    #[schema(example = "national")]
    pub kind: HolidayType,
    #[schema(example = true)]
    pub is_recurring: bool,
}

/* =========================
Create holiday (admin)
========================= */
#[utoipa::path(
    post,
    path = "/api/holidays",
    request_body = CreateHoliday,
    responses(
        (status = 200, description = "Holiday created", body = Holiday),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Holiday"
)]
pub async fn create_holiday(
    auth: AuthUser,
    store: web::Data<Store>,
    payload: web::Json<CreateHoliday>,
) -> actix_web::Result<HttpResponse> {
    auth.require_admin()?;
    let payload = payload.into_inner();

    let holiday = store.insert_holiday(Holiday {
        id: 0,
        name: payload.name,
        date: payload.date,
        kind: payload.kind,
        is_recurring: payload.is_recurring,
    });

    Ok(HttpResponse::Ok().json(holiday))
}

/* =========================
List holidays
========================= */
#[utoipa::path(
    get,
    path = "/api/holidays",
    responses(
        (status = 200, description = "All holidays", body = [Holiday]),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Holiday"
)]
pub async fn list_holidays(
    auth: AuthUser,
    store: web::Data<Store>,
) -> actix_web::Result<HttpResponse> {
    auth.actor()?;
    Ok(HttpResponse::Ok().json(store.list_holidays()))
}
