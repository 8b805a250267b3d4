pub mod api;
pub mod auth;
pub mod config;
pub mod docs;
pub mod error;
pub mod leave;
pub mod model;
pub mod models;
pub mod routes;
pub mod store;
pub mod utils;
