//! First-run administrator.

use lonas_core::roles::ROLE_FULL_ADMIN;
use lonas_core::types::DbId;
use lonas_db::models::user::CreateUser;
use lonas_db::repositories::UserRepo;
use lonas_db::DbPool;

use crate::auth::password::hash_password;
use crate::config::AdminBootstrap;
use crate::error::{AppError, AppResult};
use crate::handlers::users::normalize_email;

/// Create the configured administrator when the users table is empty.
///
/// On a fresh database this is user 1, the protected account. Returns the
/// new user's ID, or `None` when users already exist.
pub async fn ensure_admin(pool: &DbPool, admin: &AdminBootstrap) -> AppResult<Option<DbId>> {
    if UserRepo::count(pool).await? > 0 {
        return Ok(None);
    }

    let password_hash = hash_password(&admin.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        pool,
        &CreateUser {
            name: admin.name.trim().to_string(),
            email: normalize_email(&admin.email),
            password_hash,
            role: ROLE_FULL_ADMIN.to_string(),
        },
    )
    .await?;

    tracing::info!(user_id = user.id, email = %user.email, "Bootstrap administrator created");
    Ok(Some(user.id))
}
