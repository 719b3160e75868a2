//! Integration tests for the health endpoint and general HTTP behaviour.

mod common;

use axum::http::StatusCode;
use common::{body_json, get};
use lonas_api::bootstrap::ensure_admin;
use lonas_api::config::AdminBootstrap;
use lonas_db::repositories::UserRepo;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn health_check_reports_database(pool: PgPool) {
    let response = get(common::build_test_app(pool), "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["db_healthy"], true);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_route_returns_404(pool: PgPool) {
    let response = get(common::build_test_app(pool), "/this-route-does-not-exist").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn response_contains_x_request_id_header(pool: PgPool) {
    let response = get(common::build_test_app(pool), "/health").await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("x-request-id header");
    let id = request_id.to_str().expect("ascii header");
    assert!(uuid::Uuid::parse_str(id).is_ok(), "not a UUID: {id}");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn bootstrap_admin_is_created_only_on_empty_table(pool: PgPool) {
    let admin = AdminBootstrap {
        name: "Administrador".into(),
        email: "Admin@Lonas.com".into(),
        password: "admin123".into(),
    };

    let created = ensure_admin(&pool, &admin).await.expect("bootstrap");
    assert_eq!(created, Some(1));

    let user = UserRepo::find_by_id(&pool, 1).await.expect("query").expect("admin row");
    assert_eq!(user.role, "ADM_FULL");
    assert_eq!(user.email, "admin@lonas.com");

    let again = ensure_admin(&pool, &admin).await.expect("second run");
    assert_eq!(again, None);
    assert_eq!(UserRepo::count(&pool).await.expect("count"), 1);
}
