//! Handlers for the `/orcamentos` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use lonas_core::error::CoreError;
use lonas_core::status::{parse_status_filter, QuoteStatus};
use lonas_core::types::{today, Date, DbId};
use lonas_core::validation::validate_input;
use lonas_db::models::quote::{
    CreatedQuote, QuoteDetail, QuoteFilter, QuoteInput, QuoteItemInput, QuoteSummary,
    UpdatedQuote,
};
use lonas_db::repositories::QuoteRepo;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireDeleteRole;
use crate::query::{non_blank, parse_int, QuoteListParams};
use crate::response::PageMeta;
use crate::state::AppState;

/// Body of `POST /orcamentos` and `PUT /orcamentos/{id}`.
///
/// Field names follow the wire so error paths read `itens[0].largura`.
/// Missing numbers are reported by the `required` rules.
#[derive(Debug, Deserialize, Validate)]
pub struct QuoteRequest {
    #[serde(default)]
    #[validate(
        required(message = "O cliente é obrigatório."),
        range(min = 1, message = "O cliente informado é inválido.")
    )]
    pub cliente_id: Option<DbId>,
    #[serde(default)]
    pub descricao: Option<String>,
    #[serde(default)]
    pub prazo_entrega: Option<Date>,
    #[serde(default)]
    #[validate(length(min = 1, message = "Informe ao menos um item."), nested)]
    pub itens: Vec<QuoteItemRequest>,
}

/// One line item of a [`QuoteRequest`].
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct QuoteItemRequest {
    #[serde(default)]
    pub descricao_item: Option<String>,
    #[serde(default)]
    pub cor: Option<String>,
    #[serde(default)]
    pub observacoes: Option<String>,
    #[serde(default)]
    pub material: Option<String>,
    #[serde(default)]
    #[validate(
        required(message = "A largura é obrigatória."),
        range(min = 0.01, message = "A largura deve ser de pelo menos 0.01.")
    )]
    pub largura: Option<f64>,
    #[serde(default)]
    #[validate(
        required(message = "O comprimento é obrigatório."),
        range(min = 0.01, message = "O comprimento deve ser de pelo menos 0.01.")
    )]
    pub comprimento: Option<f64>,
    #[serde(default)]
    #[validate(
        required(message = "O preço por m² é obrigatório."),
        range(min = 0.01, message = "O preço por m² deve ser de pelo menos 0.01.")
    )]
    pub preco_m2: Option<f64>,
}

impl QuoteRequest {
    /// Run the field rules, then convert into a [`QuoteInput`].
    fn into_input(self) -> Result<QuoteInput, CoreError> {
        validate_input(&self)?;
        let client_id = self
            .cliente_id
            .ok_or_else(|| CoreError::Validation("cliente_id is required".into()))?;
        let items = self
            .itens
            .into_iter()
            .enumerate()
            .map(|(index, item)| item.into_input(index))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(QuoteInput {
            client_id,
            description: self.descricao,
            delivery_deadline: self.prazo_entrega,
            items,
        })
    }
}

impl QuoteItemRequest {
    fn into_input(self, index: usize) -> Result<QuoteItemInput, CoreError> {
        let missing = |field| CoreError::InvalidLineItem {
            index,
            field,
            reason: "is required".to_string(),
        };
        Ok(QuoteItemInput {
            description: self.descricao_item,
            color: self.cor,
            notes: self.observacoes,
            material: self.material,
            width: self.largura.ok_or_else(|| missing("largura"))?,
            length: self.comprimento.ok_or_else(|| missing("comprimento"))?,
            unit_price: self.preco_m2.ok_or_else(|| missing("preco_m2"))?,
        })
    }
}

/// Body of `PATCH /orcamentos/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    #[serde(default)]
    pub status: Option<String>,
}

/// Confirmation returned after a status change.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub id: DbId,
    pub status: QuoteStatus,
    pub mensagem: String,
}

/// `GET /orcamentos` response body.
#[derive(Debug, Serialize)]
pub struct QuotePage {
    pub orcamentos: Vec<QuoteSummary>,
    #[serde(flatten)]
    pub meta: PageMeta,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /orcamentos?cliente_id=&numero_orcamento=&nome_cliente=&status=&pagina=&limite=
///
/// Filters are AND-combined. An unknown status value is rejected rather
/// than silently ignored.
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<QuoteListParams>,
) -> AppResult<Json<QuotePage>> {
    let filter = QuoteFilter {
        client_id: parse_int(params.cliente_id.as_deref()),
        number: non_blank(params.numero_orcamento.as_deref()),
        client_name: non_blank(params.nome_cliente.as_deref()),
        status: parse_status_filter(params.status.as_deref())?,
    };
    let page = params.page.page_request();

    let (orcamentos, total) = tokio::try_join!(
        QuoteRepo::list(&state.pool, &filter, &page),
        QuoteRepo::count(&state.pool, &filter),
    )?;

    Ok(Json(QuotePage {
        orcamentos,
        meta: PageMeta { total, page },
    }))
}

/// GET /orcamentos/{id}
///
/// Header, client display fields and items.
pub async fn get_by_id(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<QuoteDetail>> {
    let detail = QuoteRepo::find_detail(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Quote", id }))?;
    Ok(Json(detail))
}

/// POST /orcamentos
///
/// Price and number a new quote dated today. A number collision is
/// reported as a retryable 409.
pub async fn create(
    State(state): State<AppState>,
    _user: AuthUser,
    AppJson(body): AppJson<QuoteRequest>,
) -> AppResult<(StatusCode, Json<CreatedQuote>)> {
    let input = body.into_input()?;
    let created = QuoteRepo::create(&state.pool, &input, today(), state.config.numbering).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /orcamentos/{id}
///
/// Full replace of header fields and items. Number and status are kept.
pub async fn update(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
    AppJson(body): AppJson<QuoteRequest>,
) -> AppResult<Json<UpdatedQuote>> {
    let input = body.into_input()?;
    let updated = QuoteRepo::update(&state.pool, id, &input).await?;
    Ok(Json(updated))
}

/// PATCH /orcamentos/{id}/status
///
/// Any known status is accepted from any current status.
pub async fn update_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    AppJson(body): AppJson<StatusRequest>,
) -> AppResult<Json<StatusResponse>> {
    let raw = body.status.unwrap_or_default();
    let status: QuoteStatus = raw.parse()?;

    if !QuoteRepo::update_status(&state.pool, id, status).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "Quote", id }));
    }

    tracing::info!(quote_id = id, %status, user_id = user.user_id, "Quote status changed");
    Ok(Json(StatusResponse {
        id,
        status,
        mensagem: "Status atualizado com sucesso.".to_string(),
    }))
}

/// DELETE /orcamentos/{id}
///
/// Removes the quote and its items. Requires a delete role.
pub async fn delete(
    State(state): State<AppState>,
    RequireDeleteRole(user): RequireDeleteRole,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if QuoteRepo::delete(&state.pool, id).await? {
        tracing::info!(quote_id = id, user_id = user.user_id, "Quote deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "Quote", id }))
    }
}
