pub mod audit;
pub mod employee;
pub mod holiday;
pub mod leave_history;
pub mod leave_request;
pub mod notification;
pub mod role;
