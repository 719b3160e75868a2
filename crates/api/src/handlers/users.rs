//! Handlers for the `/usuarios` resource (user administration).
//!
//! All handlers require the `ADM_FULL` role via [`RequireFullAdmin`].

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use lonas_core::client::validate_not_blank;
use lonas_core::error::CoreError;
use lonas_core::roles::{ensure_deletable_user, parse_role, ROLE_SALESPERSON};
use lonas_core::types::DbId;
use lonas_core::validation::validate_input;
use lonas_db::models::user::{CreateUser, UpdateUser, User, UserResponse};
use lonas_db::repositories::UserRepo;
use serde::Deserialize;
use validator::Validate;

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::rbac::RequireFullAdmin;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /usuarios` (and, without `perfil`, `/auth/register`).
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[serde(rename = "nome", default)]
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,
    #[serde(default)]
    #[validate(email(message = "O e-mail informado é inválido."))]
    pub email: String,
    #[serde(rename = "senha", default)]
    pub password: String,
    #[serde(rename = "perfil", default)]
    pub role: Option<String>,
}

/// Request body for `PUT /usuarios/{id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[serde(rename = "nome", default)]
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,
    #[serde(default)]
    #[validate(email(message = "O e-mail informado é inválido."))]
    pub email: String,
    #[serde(rename = "perfil", default)]
    #[validate(custom(function = "validate_not_blank"))]
    pub role: String,
    /// Re-hashed only when present and non-empty.
    #[serde(rename = "senha", default)]
    pub password: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /usuarios
pub async fn list(
    State(state): State<AppState>,
    RequireFullAdmin(_admin): RequireFullAdmin,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(users.iter().map(UserResponse::from).collect()))
}

/// GET /usuarios/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireFullAdmin(_admin): RequireFullAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<UserResponse>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;
    Ok(Json(UserResponse::from(&user)))
}

/// POST /usuarios
///
/// Create a user with an explicit role (defaults to `VENDEDOR`).
pub async fn create(
    State(state): State<AppState>,
    RequireFullAdmin(admin): RequireFullAdmin,
    AppJson(mut body): AppJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let role = match body.role.take() {
        Some(role) if !role.trim().is_empty() => parse_role(&role)?,
        _ => ROLE_SALESPERSON,
    };
    let user = create_account(&state, body, role).await?;

    tracing::info!(user_id = user.id, created_by = admin.user_id, role, "User created");
    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// PUT /usuarios/{id}
///
/// Replace name, email and role; change the password only when `senha`
/// is supplied.
pub async fn update(
    State(state): State<AppState>,
    RequireFullAdmin(_admin): RequireFullAdmin,
    Path(id): Path<DbId>,
    AppJson(mut body): AppJson<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    body.email = normalize_email(&body.email);
    validate_input(&body)?;
    let role = parse_role(&body.role)?;

    let password_hash = match body.password.as_deref().filter(|p| !p.is_empty()) {
        Some(password) => Some(hash_new_password(password)?),
        None => None,
    };

    if UserRepo::email_taken(&state.pool, &body.email, Some(id)).await? {
        return Err(CoreError::DuplicateEmail.into());
    }

    let input = UpdateUser {
        name: body.name.trim().to_string(),
        email: body.email,
        role: role.to_string(),
        password_hash,
    };

    let user = UserRepo::update(&state.pool, id, &input)
        .await
        .map_err(email_conflict)?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;
    Ok(Json(UserResponse::from(&user)))
}

/// DELETE /usuarios/{id}
///
/// User 1 is the bootstrap administrator and can never be deleted.
pub async fn delete(
    State(state): State<AppState>,
    RequireFullAdmin(admin): RequireFullAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    ensure_deletable_user(id)?;

    if UserRepo::delete(&state.pool, id).await? {
        tracing::info!(user_id = id, deleted_by = admin.user_id, "User deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "User", id }))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Validate, hash and insert a new account with the given role.
///
/// Shared by admin creation and public registration.
pub(crate) async fn create_account(
    state: &AppState,
    mut body: CreateUserRequest,
    role: &str,
) -> AppResult<User> {
    body.email = normalize_email(&body.email);
    validate_input(&body)?;
    let password_hash = hash_new_password(&body.password)?;

    if UserRepo::email_taken(&state.pool, &body.email, None).await? {
        return Err(CoreError::DuplicateEmail.into());
    }

    let input = CreateUser {
        name: body.name.trim().to_string(),
        email: body.email,
        password_hash,
        role: role.to_string(),
    };
    UserRepo::create(&state.pool, &input)
        .await
        .map_err(email_conflict)
}

/// Emails are compared and stored trimmed and lowercased.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn hash_new_password(password: &str) -> AppResult<String> {
    validate_password_strength(password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    hash_password(password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))
}

/// A concurrent write can trip `uq_users_email` after the pre-check passed.
fn email_conflict(err: sqlx::Error) -> AppError {
    let is_email_violation = err
        .as_database_error()
        .is_some_and(|db| db.constraint() == Some("uq_users_email"));
    if is_email_violation {
        AppError::Core(CoreError::DuplicateEmail)
    } else {
        AppError::Database(err)
    }
}
