use actix_web::{HttpResponse, web};
use serde::Deserialize;
use std::collections::BTreeMap;
use utoipa::ToSchema;

use crate::auth::auth::AuthUser;
use crate::model::department::Department;
use crate::model::leave_request::LeaveType;
use crate::store::Store;

#[derive(Deserialize, ToSchema)]
pub struct CreateDepartment {
    #[schema(example = "Engineering")]
    pub name: String,
    #[schema(example = "ENG")]
    pub code: String,
    #[schema(example = 7, nullable = true)]
    pub manager_id: Option<u64>,
    /// Annual entitlement per leave type.
    #[schema(value_type = Object)]
    pub leave_policy: BTreeMap<LeaveType, u32>,
    #[schema(example = 15, nullable = true)]
    pub max_consecutive_days: Option<u32>,
}

/* =========================
Create department (admin)
========================= */
#[utoipa::path(
    post,
    path = "/api/departments",
    request_body = CreateDepartment,
    responses(
        (status = 200, description = "Department created", body = Department),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Department"
)]
pub async fn create_department(
    auth: AuthUser,
    store: web::Data<Store>,
    payload: web::Json<CreateDepartment>,
) -> actix_web::Result<HttpResponse> {
    auth.require_admin()?;
    let payload = payload.into_inner();

    let department = store.insert_department(Department {
        id: 0,
        name: payload.name,
        code: payload.code,
        manager_id: payload.manager_id,
        leave_policy: payload.leave_policy,
        max_consecutive_days: payload.max_consecutive_days,
    });

    Ok(HttpResponse::Ok().json(department))
}

/* =========================
List departments
========================= */
#[utoipa::path(
    get,
    path = "/api/departments",
    responses(
        (status = 200, description = "All departments", body = [Department]),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Department"
)]
pub async fn list_departments(
    auth: AuthUser,
    store: web::Data<Store>,
) -> actix_web::Result<HttpResponse> {
    auth.actor()?;
    Ok(HttpResponse::Ok().json(store.list_departments()))
}
