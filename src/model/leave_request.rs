use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug,
    Copy,
    Clone,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LeaveType {
    Annual,
    Sick,
    Personal,
    Maternity,
    Paternity,
}

impl LeaveType {
    /// Maternity/paternity leave is exempt from the department's
    /// consecutive-day cap.
    pub fn is_cap_exempt(&self) -> bool {
        matches!(self, LeaveType::Maternity | LeaveType::Paternity)
    }
}

#[derive(
    Debug,
    Copy,
    Clone,
    Eq,
    PartialEq,
    Serialize,
    Deserialize,
    ToSchema,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
    Expired,
}

impl LeaveStatus {
    /// Terminal statuses admit no further transition, by any actor.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, LeaveStatus::Pending | LeaveStatus::Approved)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "id": 1,
    "employee_id": 1000,
    "leave_type": "annual",
    "start_date": "2026-03-02",
    "end_date": "2026-03-06",
    "total_days": 5,
    "reason": "family trip abroad",
    "status": "pending",
    "applied_at": "2026-02-01T00:00:00Z",
    "manager_comment": null
}))]
pub struct LeaveRequest {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 1000)]
    pub employee_id: u64,
    #[schema(example = "annual")]
    pub leave_type: LeaveType,
    #[schema(example = "2026-03-02", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-03-06", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    /// Working days (Mon-Fri) in the inclusive range, not calendar days.
    #[schema(example = 5)]
    pub total_days: u32,
    #[schema(example = "family trip abroad")]
    pub reason: String,
    #[schema(example = "pending")]
    pub status: LeaveStatus,
    #[schema(example = "2026-02-01T00:00:00Z", format = "date-time", value_type = String)]
    pub applied_at: DateTime<Utc>,
    #[schema(example = json!(null), nullable = true)]
    pub manager_comment: Option<String>,
}
