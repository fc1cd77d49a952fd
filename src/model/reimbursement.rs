use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

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
pub enum ClaimCategory {
    Travel,
    Medical,
    Food,
    Equipment,
    Training,
    Other,
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
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ClaimStatus {
    Pending,
    ManagerApproved,
    Approved,
    Rejected,
    Cancelled,
}

impl ClaimStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ClaimStatus::Approved | ClaimStatus::Rejected | ClaimStatus::Cancelled
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "id": 1,
    "employee_id": 1000,
    "category": "travel",
    "amount": 125.50,
    "description": "taxi to client site",
    "expense_date": "2026-02-10",
    "receipt_url": "https://receipts.example.com/abc.jpg",
    "status": "pending",
    "submitted_at": "2026-02-11T09:00:00Z",
    "approver_comment": null,
    "approved_by": null
}))]
pub struct ReimbursementClaim {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 1000)]
    pub employee_id: u64,
    #[schema(example = "travel")]
    pub category: ClaimCategory,
    #[schema(example = 125.50)]
    pub amount: f64,
    #[schema(example = "taxi to client site")]
    pub description: String,
    #[schema(example = "2026-02-10", format = "date", value_type = String)]
    pub expense_date: NaiveDate,
    #[schema(example = "https://receipts.example.com/abc.jpg", nullable = true)]
    pub receipt_url: Option<String>,
    #[schema(example = "pending")]
    pub status: ClaimStatus,
    #[schema(example = "2026-02-11T09:00:00Z", format = "date-time", value_type = String)]
    pub submitted_at: DateTime<Utc>,
    #[schema(example = json!(null), nullable = true)]
    pub approver_comment: Option<String>,
    /// Actor who moved the claim into its current decided state.
    #[schema(example = json!(null), nullable = true)]
    pub approved_by: Option<u64>,
}
