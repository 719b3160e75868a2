pub mod auth;
pub mod clients;
pub mod quotes;
pub mod users;
