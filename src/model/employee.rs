use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::role::Role;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(
    example = json!({
        "id": 1000,
        "name": "John Doe",
        "email": "john.doe@company.com",
        "role": "employee",
        "department_id": 10,
        "manager_id": 7
    })
)]
pub struct Employee {
    #[schema(example = 1000)]
    pub id: u64,

    #[schema(example = "John Doe")]
    pub name: String,

    #[schema(example = "john.doe@company.com")]
    pub email: String,

    #[schema(example = "employee")]
    pub role: Role,

    #[schema(example = 10)]
    pub department_id: u64,

    /// Absent for employees without a reporting line (e.g. admins).
    #[schema(example = 7, nullable = true)]
    pub manager_id: Option<u64>,
}
