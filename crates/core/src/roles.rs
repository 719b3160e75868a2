//! Well-known role name constants.
//!
//! These must match the `ck_users_role` check constraint in
//! `db/migrations/20251001000004_create_users.sql`.

use crate::error::CoreError;
use crate::types::DbId;

/// Full administrator: manages users and may delete any record.
pub const ROLE_FULL_ADMIN: &str = "ADM_FULL";
/// Sales administrator: may delete clients and quotes.
pub const ROLE_SALES_ADMIN: &str = "ADM_VENDAS";
/// Salesperson: default role for self-registered users.
pub const ROLE_SALESPERSON: &str = "VENDEDOR";

/// All valid role values.
pub const VALID_ROLES: &[&str] = &[ROLE_FULL_ADMIN, ROLE_SALES_ADMIN, ROLE_SALESPERSON];

/// Roles allowed to delete clients and quotes.
pub const DELETE_ROLES: &[&str] = &[ROLE_FULL_ADMIN, ROLE_SALES_ADMIN];

/// The bootstrap administrator. Never deletable.
pub const PROTECTED_USER_ID: DbId = 1;

/// Normalize and validate a role name. Input is trimmed and uppercased.
pub fn parse_role(role: &str) -> Result<&'static str, CoreError> {
    let normalized = role.trim().to_uppercase();
    VALID_ROLES
        .iter()
        .copied()
        .find(|r| *r == normalized)
        .ok_or_else(|| {
            CoreError::Validation(format!(
                "Invalid role '{role}'. Must be one of: {}",
                VALID_ROLES.join(", ")
            ))
        })
}

/// Whether the given role may delete clients and quotes.
pub fn can_delete_records(role: &str) -> bool {
    DELETE_ROLES.contains(&role)
}

/// Reject deletion of the bootstrap administrator, regardless of caller.
pub fn ensure_deletable_user(id: DbId) -> Result<(), CoreError> {
    if id == PROTECTED_USER_ID {
        return Err(CoreError::ProtectedUser(id));
    }
    Ok(())
}
