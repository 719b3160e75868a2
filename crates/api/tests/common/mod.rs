#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use lonas_api::auth::jwt::{generate_access_token, JwtConfig};
use lonas_api::auth::password::hash_password;
use lonas_api::config::ServerConfig;
use lonas_api::router::build_app_router;
use lonas_api::state::AppState;
use lonas_core::roles::{ROLE_FULL_ADMIN, ROLE_SALES_ADMIN, ROLE_SALESPERSON};
use lonas_core::types::DbId;
use lonas_db::models::user::{CreateUser, User};
use lonas_db::numbering::NumberingStrategy;
use lonas_db::repositories::UserRepo;
use sqlx::PgPool;
use tower::ServiceExt;

pub const TEST_PASSWORD: &str = "senha-secreta";

/// Test `ServerConfig` with a fixed JWT secret and the default numbering.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        db_max_connections: 5,
        numbering: NumberingStrategy::default(),
        admin: None,
        jwt: JwtConfig {
            secret: "test-secret-for-integration-tests".to_string(),
            expiry_hours: 4,
        },
    }
}

/// Full application router over `pool`, with the production middleware stack.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Sign a token for an arbitrary identity without touching the database.
pub fn token_for(user_id: DbId, name: &str, role: &str) -> String {
    generate_access_token(user_id, name, role, &test_config().jwt).expect("token should sign")
}

pub fn admin_token() -> String {
    token_for(1, "Admin", ROLE_FULL_ADMIN)
}

pub fn sales_admin_token() -> String {
    token_for(2, "Gerente", ROLE_SALES_ADMIN)
}

pub fn salesperson_token() -> String {
    token_for(3, "Vendedor", ROLE_SALESPERSON)
}

/// Insert a user directly with [`TEST_PASSWORD`].
pub async fn create_user(pool: &PgPool, name: &str, email: &str, role: &str) -> User {
    let input = CreateUser {
        name: name.to_string(),
        email: email.to_string(),
        password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
        role: role.to_string(),
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.expect("router is infallible")
}

fn json_request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("valid request")
}

fn empty_request(method: Method, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).expect("valid request")
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, empty_request(Method::GET, uri, None)).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, empty_request(Method::GET, uri, Some(token))).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, json_request(Method::POST, uri, None, body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, json_request(Method::POST, uri, Some(token), body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, json_request(Method::PUT, uri, Some(token), body)).await
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, json_request(Method::PATCH, uri, Some(token), body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, empty_request(Method::DELETE, uri, Some(token))).await
}

/// Send a raw body (e.g. malformed JSON) with a bearer token.
pub async fn post_raw_auth(app: Router, uri: &str, body: &str, token: &str) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .expect("valid request");
    send(app, request).await
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A valid client body (CPF 111.444.777-35).
pub fn client_body() -> serde_json::Value {
    serde_json::json!({
        "nome": "Ana Silva",
        "email": "ana@example.com",
        "telefone": "(11) 98888-7777",
        "tipo_pessoa": "FISICA",
        "documento": "111.444.777-35",
        "endereco": "Rua das Lonas, 100",
        "data_nascimento": "1985-04-12",
    })
}

/// Create a client through the API and return its ID.
pub async fn create_client(pool: &PgPool, body: serde_json::Value) -> DbId {
    let response = post_json_auth(build_test_app(pool.clone()), "/clientes", body, &admin_token()).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["id"]
        .as_i64()
        .expect("created client carries an id")
}
