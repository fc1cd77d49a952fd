use crate::advisory::burnout::{BurnoutCategory, BurnoutResult, TeamBurnout};
use crate::advisory::parse::ParsedLeave;
use crate::advisory::suggest::LeaveSuggestion;
use crate::advisory::timing::{AdviceResult, TimingLabel};
use crate::api::advisory::{AdviceBody, ParseBody};
use crate::api::audit::{AuditListResponse, AuditQuery};
use crate::api::department::CreateDepartment;
use crate::api::employee::{BalanceResponse, CreateEmployee};
use crate::api::holiday::CreateHoliday;
use crate::api::leave_request::{CreateLeave, DecisionBody, LeaveListResponse, LeaveQuery};
use crate::api::reimbursement::{
    ClaimDecisionBody, ClaimListResponse, ClaimQuery, CreateClaim,
};
use crate::model::audit::{AuditAction, AuditLogEntry};
use crate::model::department::Department;
use crate::model::employee::Employee;
use crate::model::holiday::{Holiday, HolidayType};
use crate::model::leave_request::{LeaveRequest, LeaveStatus, LeaveType};
use crate::model::reimbursement::{ClaimCategory, ClaimStatus, ReimbursementClaim};
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "LeaveDesk API",
        version = "1.0.0",
        description = r#"
## LeaveDesk — Leave & Reimbursement Management

This API manages the full leave-request lifecycle for an organization.

### 🔹 Key Features
- **Leave Management**
  - Submit, approve/reject, cancel and expire leave requests against a per-type balance ledger
- **Reimbursement Claims**
  - Two-stage approval chain: manager endorsement, then admin settlement
- **Advisory**
  - Burnout scoring, timing advice, proactive leave suggestions, and free-text request parsing
- **Audit**
  - Every state change is recorded with actor, correlation id, and timestamp

### 🔐 Security
All endpoints require **JWT Bearer authentication**. Decision endpoints are
restricted to **Manager** (own reports) and **Admin** roles.

### 📦 Response Format
- JSON-based RESTful responses
- Pagination supported for list endpoints

---
Built with **Rust**, **Actix Web**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::leave_request::leave_list,
        crate::api::leave_request::get_leave,
        crate::api::leave_request::create_leave,
        crate::api::leave_request::approve_leave,
        crate::api::leave_request::reject_leave,
        crate::api::leave_request::cancel_leave,
        crate::api::leave_request::expire_sweep,

        crate::api::reimbursement::claim_list,
        crate::api::reimbursement::get_claim,
        crate::api::reimbursement::create_claim,
        crate::api::reimbursement::approve_claim,
        crate::api::reimbursement::reject_claim,
        crate::api::reimbursement::cancel_claim,

        crate::api::advisory::get_burnout,
        crate::api::advisory::get_team_burnout,
        crate::api::advisory::get_advice,
        crate::api::advisory::get_suggestions,
        crate::api::advisory::parse_leave_text,

        crate::api::employee::create_employee,
        crate::api::employee::get_employee,
        crate::api::employee::list_employees,
        crate::api::employee::get_balance,

        crate::api::department::create_department,
        crate::api::department::list_departments,

        crate::api::holiday::create_holiday,
        crate::api::holiday::list_holidays,

        crate::api::audit::audit_list
    ),
    components(
        schemas(
            LeaveType,
            LeaveStatus,
            LeaveRequest,
            CreateLeave,
            DecisionBody,
            LeaveQuery,
            LeaveListResponse,
            ClaimCategory,
            ClaimStatus,
            ReimbursementClaim,
            CreateClaim,
            ClaimDecisionBody,
            ClaimQuery,
            ClaimListResponse,
            BurnoutCategory,
            BurnoutResult,
            TeamBurnout,
            TimingLabel,
            AdviceResult,
            LeaveSuggestion,
            ParsedLeave,
            AdviceBody,
            ParseBody,
            Employee,
            CreateEmployee,
            BalanceResponse,
            Department,
            CreateDepartment,
            HolidayType,
            Holiday,
            CreateHoliday,
            AuditAction,
            AuditLogEntry,
            AuditQuery,
            AuditListResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Leave", description = "Leave request lifecycle APIs"),
        (name = "Reimbursement", description = "Reimbursement claim approval chain APIs"),
        (name = "Advisory", description = "Burnout, timing, suggestion and parse APIs"),
        (name = "Employee", description = "Employee and balance APIs"),
        (name = "Department", description = "Department and leave policy APIs"),
        (name = "Holiday", description = "Holiday calendar APIs"),
        (name = "Audit", description = "Audit trail APIs"),
    )
)]
pub struct ApiDoc;

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
