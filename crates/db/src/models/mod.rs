//! Row models and DTOs.
//!
//! Rust field names are English; serde renames carry the Portuguese wire
//! names the browser application expects.

pub mod client;
pub mod quote;
pub mod user;
