pub mod admin;
pub mod employee;
pub mod history;
pub mod holiday;
pub mod leave_request;
pub mod notification;
pub mod team;
