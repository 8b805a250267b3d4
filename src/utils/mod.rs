pub mod import;
pub mod notification;
pub mod roster;
pub mod token_cache;
