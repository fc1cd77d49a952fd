pub mod audit;
pub mod department;
pub mod employee;
pub mod holiday;
pub mod leave_request;
pub mod reimbursement;
pub mod role;
