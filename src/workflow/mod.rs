pub mod leave;
pub mod reimbursement;

use crate::error::{ApiError, ApiResult};
use crate::model::employee::Employee;
use crate::model::role::Role;

/// The authenticated principal behind an operation. Always passed in
/// explicitly; the workflows never read identity from ambient state, so
/// every guard is a pure function of (state, actor, action).
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub id: u64,
    pub role: Role,
}

impl Actor {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn is_manager_of(&self, employee: &Employee) -> bool {
        self.role == Role::Manager && employee.manager_id == Some(self.id)
    }

    /// The decider on leave requests: the employee's manager or an admin.
    pub fn can_decide_for(&self, employee: &Employee) -> ApiResult<()> {
        if self.is_admin() || self.is_manager_of(employee) {
            Ok(())
        } else {
            Err(ApiError::Forbidden(
                "only the employee's manager or an admin may decide this request".into(),
            ))
        }
    }
}
