//! Domain logic for the canvas and awning back office.
//!
//! Everything here is pure: no I/O, no database handles. The `db` and `api`
//! crates call into these helpers for validation, pricing and numbering.

pub mod client;
pub mod document;
pub mod error;
pub mod pagination;
pub mod quote;
pub mod roles;
pub mod status;
pub mod types;
pub mod validation;
