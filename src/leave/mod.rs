pub mod balance;
pub mod calendar;
pub mod team;
pub mod validation;
