//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`rbac::RequireFullAdmin`] -- Requires `ADM_FULL`.
//! - [`rbac::RequireDeleteRole`] -- Requires `ADM_FULL` or `ADM_VENDAS`.

pub mod auth;
pub mod rbac;
