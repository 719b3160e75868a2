//! Handlers for the `/clientes` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use lonas_core::client::{
    normalize_phone, validate_birth_date, validate_name, validate_not_blank, validate_phone,
};
use lonas_core::document::{self, PersonType};
use lonas_core::error::CoreError;
use lonas_core::types::{Date, DbId};
use lonas_core::validation::validate_input;
use lonas_db::models::client::{Client, ClientFilter, ClientInput};
use lonas_db::repositories::ClientRepo;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireDeleteRole;
use crate::query::ClientListParams;
use crate::response::PageMeta;
use crate::state::AppState;

/// Body of `POST /clientes` and `PUT /clientes/{id}`.
///
/// String fields default to empty so a missing field is reported by the
/// `required` rules alongside every other field error.
#[derive(Debug, Deserialize, Validate)]
pub struct ClientRequest {
    #[serde(rename = "nome", default)]
    #[validate(custom(function = "validate_name"))]
    pub name: String,
    #[serde(default)]
    #[validate(email(message = "O e-mail informado é inválido."))]
    pub email: String,
    #[serde(rename = "telefone", default)]
    #[validate(custom(function = "validate_phone"))]
    pub phone: String,
    #[serde(rename = "tipo_pessoa", default)]
    #[validate(custom(function = "validate_not_blank"))]
    pub person_type: String,
    #[serde(rename = "documento", default)]
    #[validate(custom(function = "validate_not_blank"))]
    pub document: String,
    #[serde(rename = "endereco", default)]
    #[validate(custom(function = "validate_not_blank"))]
    pub address: String,
    #[serde(rename = "data_nascimento", default)]
    #[validate(
        required(message = "A data de nascimento é obrigatória."),
        custom(function = "validate_birth_date")
    )]
    pub birth_date: Option<Date>,
}

impl ClientRequest {
    /// Run the field rules, then normalize into a storable [`ClientInput`].
    fn into_input(self) -> Result<ClientInput, CoreError> {
        validate_input(&self)?;
        let person_type: PersonType = self.person_type.parse()?;
        let document = document::normalize(&self.document, person_type)?;
        let birth_date = self
            .birth_date
            .ok_or_else(|| CoreError::Validation("data_nascimento is required".into()))?;
        Ok(ClientInput {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: normalize_phone(&self.phone),
            person_type,
            document,
            address: self.address.trim().to_string(),
            birth_date,
        })
    }
}

/// `GET /clientes` response body.
#[derive(Debug, Serialize)]
pub struct ClientPage {
    pub clientes: Vec<Client>,
    #[serde(flatten)]
    pub meta: PageMeta,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /clientes?tipo=&termo=&nome=&pagina=&limite=
///
/// List clients ordered by name; page and count queries run concurrently.
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<ClientListParams>,
) -> AppResult<Json<ClientPage>> {
    let filter = ClientFilter::from_params(
        params.tipo.as_deref(),
        params.termo.as_deref(),
        params.nome.as_deref(),
    );
    let page = params.page.page_request();

    let (clientes, total) = tokio::try_join!(
        ClientRepo::list(&state.pool, &filter, &page),
        ClientRepo::count(&state.pool, &filter),
    )?;

    Ok(Json(ClientPage {
        clientes,
        meta: PageMeta { total, page },
    }))
}

/// GET /clientes/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Client>> {
    let client = ClientRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Client",
            id,
        }))?;
    Ok(Json(client))
}

/// POST /clientes
///
/// Register a client. The document must be valid for the person type and
/// not registered to any other client.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(body): AppJson<ClientRequest>,
) -> AppResult<(StatusCode, Json<Client>)> {
    let input = body.into_input()?;

    if ClientRepo::find_id_by_document(&state.pool, &input.document, None)
        .await?
        .is_some()
    {
        return Err(CoreError::DuplicateDocument.into());
    }

    let client = ClientRepo::create(&state.pool, &input)
        .await
        .map_err(|e| document_conflict(e, CoreError::DuplicateDocument))?;

    tracing::info!(client_id = client.id, user_id = user.user_id, "Client created");
    Ok((StatusCode::CREATED, Json(client)))
}

/// PUT /clientes/{id}
///
/// Replace every field of a client.
pub async fn update(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
    AppJson(body): AppJson<ClientRequest>,
) -> AppResult<Json<Client>> {
    let input = body.into_input()?;

    if ClientRepo::find_id_by_document(&state.pool, &input.document, Some(id))
        .await?
        .is_some()
    {
        return Err(CoreError::DocumentBelongsToAnother.into());
    }

    let client = ClientRepo::update(&state.pool, id, &input)
        .await
        .map_err(|e| document_conflict(e, CoreError::DocumentBelongsToAnother))?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Client",
            id,
        }))?;
    Ok(Json(client))
}

/// DELETE /clientes/{id}
///
/// Removes the client with all of its quotes. Requires a delete role.
pub async fn delete(
    State(state): State<AppState>,
    RequireDeleteRole(user): RequireDeleteRole,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if ClientRepo::delete(&state.pool, id).await? {
        tracing::info!(client_id = id, user_id = user.user_id, "Client deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Client",
            id,
        }))
    }
}

/// A concurrent insert can still trip `uq_clients_document` after the
/// pre-check passed; report it with the same domain error.
fn document_conflict(err: sqlx::Error, domain: CoreError) -> AppError {
    let is_document_violation = err
        .as_database_error()
        .is_some_and(|db| db.constraint() == Some("uq_clients_document"));
    if is_document_violation {
        AppError::Core(domain)
    } else {
        AppError::Database(err)
    }
}
