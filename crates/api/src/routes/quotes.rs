//! Route definitions for the `/orcamentos` resource.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::quotes;
use crate::state::AppState;

/// Routes mounted at `/orcamentos`.
///
/// ```text
/// GET    /              -> list
/// POST   /              -> create
/// GET    /{id}          -> get_by_id
/// PUT    /{id}          -> update
/// DELETE /{id}          -> delete (ADM_FULL, ADM_VENDAS)
/// PATCH  /{id}/status   -> update_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(quotes::list).post(quotes::create))
        .route(
            "/{id}",
            get(quotes::get_by_id)
                .put(quotes::update)
                .delete(quotes::delete),
        )
        .route("/{id}/status", patch(quotes::update_status))
}
