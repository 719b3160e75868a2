//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role does not
//! meet the requirement with 403 Forbidden.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use lonas_core::error::CoreError;
use lonas_core::roles::{can_delete_records, ROLE_FULL_ADMIN};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires `ADM_FULL`. Guards user administration.
///
/// ```ignore
/// async fn admin_only(RequireFullAdmin(user): RequireFullAdmin) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireFullAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireFullAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_FULL_ADMIN {
            return Err(AppError::Core(CoreError::Forbidden(
                "Acesso restrito a administradores.".into(),
            )));
        }
        Ok(RequireFullAdmin(user))
    }
}

/// Requires a role allowed to delete clients and quotes.
pub struct RequireDeleteRole(pub AuthUser);

impl FromRequestParts<AppState> for RequireDeleteRole {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !can_delete_records(&user.role) {
            return Err(AppError::Core(CoreError::Forbidden(
                "Você não tem permissão para excluir registros.".into(),
            )));
        }
        Ok(RequireDeleteRole(user))
    }
}
