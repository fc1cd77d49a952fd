use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

use crate::auth::auth::AuthUser;
use crate::error::ApiError;
use crate::model::employee::Employee;
use crate::model::leave_request::LeaveType;
use crate::model::role::Role;
use crate::store::Store;

#[derive(Deserialize, ToSchema)]
pub struct CreateEmployee {
    #[schema(example = "John Doe")]
    pub name: String,
    #[schema(example = "john.doe@company.com", format = "email")]
    pub email: String,
    #[schema(example = "employee")]
    pub role: Role,
    #[schema(example = 10)]
    pub department_id: u64,
    #[schema(example = 7, nullable = true)]
    pub manager_id: Option<u64>,
}

#[derive(Serialize, ToSchema)]
pub struct BalanceResponse {
    #[schema(example = 1000)]
    pub employee_id: u64,
    /// Remaining days per leave type, straight from the ledger.
    #[schema(value_type = Object)]
    pub balances: BTreeMap<LeaveType, u32>,
}

/* =========================
Create employee (admin)
========================= */
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = CreateEmployee,
    responses(
        (status = 200, description = "Employee created; leave accounts seeded from the department policy", body = Employee),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Department not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn create_employee(
    auth: AuthUser,
    store: web::Data<Store>,
    payload: web::Json<CreateEmployee>,
) -> actix_web::Result<HttpResponse> {
    auth.require_admin()?;
    let payload = payload.into_inner();

    let employee = store.insert_employee(Employee {
        id: 0,
        name: payload.name,
        email: payload.email,
        role: payload.role,
        department_id: payload.department_id,
        manager_id: payload.manager_id,
    })?;

    Ok(HttpResponse::Ok().json(employee))
}

/* =========================
List employees (manager/admin)
========================= */
#[utoipa::path(
    get,
    path = "/api/employees",
    responses(
        (status = 200, description = "All employees", body = [Employee]),
        (status = 403, description = "Manager/Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn list_employees(
    auth: AuthUser,
    store: web::Data<Store>,
) -> actix_web::Result<HttpResponse> {
    auth.require_manager_or_admin()?;
    Ok(HttpResponse::Ok().json(store.list_employees()))
}

/* =========================
Get one employee
========================= */
#[utoipa::path(
    get,
    path = "/api/employees/{id}",
    params(("id" = u64, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee found", body = Employee),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Employee not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn get_employee(
    auth: AuthUser,
    store: web::Data<Store>,
    path: web::Path<u64>,
) -> actix_web::Result<HttpResponse> {
    let actor = auth.actor()?;
    let id = path.into_inner();
    if actor.id != id {
        auth.require_manager_or_admin()?;
    }
    Ok(HttpResponse::Ok().json(store.get_employee(id)?))
}

/* =========================
Leave balance (self, manager, admin)
========================= */
#[utoipa::path(
    get,
    path = "/api/employees/{id}/balance",
    params(("id" = u64, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Remaining balance per leave type", body = BalanceResponse),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Employee not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn get_balance(
    auth: AuthUser,
    store: web::Data<Store>,
    path: web::Path<u64>,
) -> actix_web::Result<HttpResponse> {
    let actor = auth.actor()?;
    let id = path.into_inner();
    let employee = store.get_employee(id)?;
    if actor.id != id && !actor.is_admin() && !actor.is_manager_of(&employee) {
        return Err(ApiError::Forbidden("not your balance to view".into()).into());
    }

    Ok(HttpResponse::Ok().json(BalanceResponse {
        employee_id: id,
        balances: store.ledger.balances(id),
    }))
}
