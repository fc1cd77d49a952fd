use chrono::{DateTime, Utc};
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
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    Login,
    Logout,
}

/// Append-only audit trail entry. Entries are never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "id": 1,
    "actor_id": 7,
    "action": "UPDATE",
    "target_model": "LeaveRequest",
    "target_id": 42,
    "timestamp": "2026-02-11T09:00:00Z",
    "ip_address": null,
    "correlation_id": "7f0c4a4e-5b1e-4f89-9f1a-54f0a33c6f21"
}))]
pub struct AuditLogEntry {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 7)]
    pub actor_id: u64,
    #[schema(example = "UPDATE")]
    pub action: AuditAction,
    #[schema(example = "LeaveRequest")]
    pub target_model: String,
    #[schema(example = 42, nullable = true)]
    pub target_id: Option<u64>,
    #[schema(example = "2026-02-11T09:00:00Z", format = "date-time", value_type = String)]
    pub timestamp: DateTime<Utc>,
    #[schema(example = json!(null), nullable = true)]
    pub ip_address: Option<String>,
    /// Shared with the notification event raised by the same transition.
    #[schema(example = "7f0c4a4e-5b1e-4f89-9f1a-54f0a33c6f21")]
    pub correlation_id: String,
}
