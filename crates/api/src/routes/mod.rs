pub mod auth;
pub mod clients;
pub mod health;
pub mod quotes;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the API route tree.
///
/// ```text
/// /auth/register                 register (public)
/// /auth/login                    login (public)
///
/// /clientes                      list, create
/// /clientes/{id}                 get, update, delete
///
/// /orcamentos                    list, create
/// /orcamentos/{id}               get, update, delete
/// /orcamentos/{id}/status        change status (PATCH)
///
/// /usuarios                      list, create (ADM_FULL)
/// /usuarios/{id}                 get, update, delete (ADM_FULL)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/clientes", clients::router())
        .nest("/orcamentos", quotes::router())
        .nest("/usuarios", users::router())
}
