use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::leave_request::LeaveType;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "id": 10,
    "name": "Engineering",
    "code": "ENG",
    "manager_id": 7,
    "leave_policy": { "annual": 20, "sick": 12, "personal": 5, "maternity": 90, "paternity": 15 },
    "max_consecutive_days": 15
}))]
pub struct Department {
    #[schema(example = 10)]
    pub id: u64,
    #[schema(example = "Engineering")]
    pub name: String,
    #[schema(example = "ENG")]
    pub code: String,
    #[schema(example = 7, nullable = true)]
    pub manager_id: Option<u64>,
    /// Annual entitlement in days per leave type.
    #[schema(value_type = Object)]
    pub leave_policy: BTreeMap<LeaveType, u32>,
    /// Cap on working days per single request; `null` means unlimited.
    /// Maternity/paternity requests are exempt.
    #[schema(example = 15, nullable = true)]
    pub max_consecutive_days: Option<u32>,
}

impl Department {
    pub fn entitlement(&self, leave_type: LeaveType) -> u32 {
        self.leave_policy.get(&leave_type).copied().unwrap_or(0)
    }

    /// True when `days` fits under the consecutive-day cap for `leave_type`.
    pub fn within_consecutive_cap(&self, leave_type: LeaveType, days: u32) -> bool {
        if leave_type.is_cap_exempt() {
            return true;
        }
        match self.max_consecutive_days {
            Some(cap) => days <= cap,
            None => true,
        }
    }
}
