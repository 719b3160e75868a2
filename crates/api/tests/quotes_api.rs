//! HTTP-level integration tests for the `/orcamentos` resource.

mod common;

use axum::http::StatusCode;
use chrono::Datelike;
use common::{
    admin_token, body_json, client_body, create_client, delete_auth, get_auth, patch_json_auth,
    post_json_auth, put_json_auth, salesperson_token,
};
use lonas_core::types::{today, DbId};
use serde_json::json;
use sqlx::PgPool;

fn quote_body(client_id: DbId, items: serde_json::Value) -> serde_json::Value {
    json!({
        "cliente_id": client_id,
        "descricao": "Toldo retrátil",
        "prazo_entrega": "2026-12-01",
        "itens": items,
    })
}

async fn create_quote(pool: &PgPool, body: serde_json::Value) -> serde_json::Value {
    let response =
        post_json_auth(common::build_test_app(pool.clone()), "/orcamentos", body, &salesperson_token())
            .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

fn this_year() -> i32 {
    today().year()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_prices_and_numbers_quotes_in_sequence(pool: PgPool) {
    let client_id = create_client(&pool, client_body()).await;

    let first = create_quote(
        &pool,
        quote_body(client_id, json!([{"largura": 2, "comprimento": 3, "preco_m2": 100}])),
    )
    .await;
    assert_eq!(first["numero_orcamento"], format!("0001/{}", this_year()));
    assert_eq!(first["valor_total"], 600.0);

    let second = create_quote(
        &pool,
        quote_body(client_id, json!([{"largura": 1, "comprimento": 1, "preco_m2": 10}])),
    )
    .await;
    assert_eq!(second["numero_orcamento"], format!("0002/{}", this_year()));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn detail_carries_client_fields_and_items(pool: PgPool) {
    let client_id = create_client(&pool, client_body()).await;
    let created = create_quote(
        &pool,
        quote_body(
            client_id,
            json!([
                {"descricao_item": "Lona", "cor": "Azul", "material": "PVC",
                 "largura": 2, "comprimento": 3, "preco_m2": 100},
                {"largura": 0.5, "comprimento": 0.5, "preco_m2": 40},
            ]),
        ),
    )
    .await;
    let id = created["id"].as_i64().expect("id");

    let response =
        get_auth(common::build_test_app(pool), &format!("/orcamentos/{id}"), &admin_token()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    assert_eq!(json["valor_total"], 610.0);
    assert_eq!(json["status"], "PENDENTE");
    assert_eq!(json["nome_cliente"], "Ana Silva");
    assert_eq!(json["cliente_documento"], "11144477735");
    assert_eq!(json["cliente_tipo_pessoa"], "FISICA");
    assert_eq!(json["prazo_entrega"], "2026-12-01");
    let items = json["itens"].as_array().expect("itens");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["cor"], "Azul");
    assert_eq!(items[0]["valor_item"], 600.0);
    assert_eq!(items[1]["valor_item"], 10.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_replaces_items_and_keeps_number(pool: PgPool) {
    let client_id = create_client(&pool, client_body()).await;
    let created = create_quote(
        &pool,
        quote_body(client_id, json!([{"largura": 2, "comprimento": 3, "preco_m2": 100}])),
    )
    .await;
    let id = created["id"].as_i64().expect("id");

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/orcamentos/{id}"),
        quote_body(client_id, json!([{"largura": 1, "comprimento": 1, "preco_m2": 50}])),
        &salesperson_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["id"], id);
    assert_eq!(json["valor_total"], 50.0);

    let detail = body_json(
        get_auth(common::build_test_app(pool), &format!("/orcamentos/{id}"), &admin_token()).await,
    )
    .await;
    assert_eq!(detail["numero_orcamento"], format!("0001/{}", this_year()));
    assert_eq!(detail["itens"].as_array().map(Vec::len), Some(1));
    assert_eq!(detail["itens"][0]["valor_item"], 50.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_items_are_rejected_before_numbering(pool: PgPool) {
    let client_id = create_client(&pool, client_body()).await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/orcamentos",
        quote_body(client_id, json!([{"largura": 0, "comprimento": 3, "preco_m2": 100}])),
        &salesperson_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["errors"][0]["path"], "itens[0].largura");

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/orcamentos",
        quote_body(client_id, json!([])),
        &salesperson_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // The failed attempts did not consume a number.
    let created = create_quote(
        &pool,
        quote_body(client_id, json!([{"largura": 1, "comprimento": 1, "preco_m2": 1}])),
    )
    .await;
    assert_eq!(created["numero_orcamento"], format!("0001/{}", this_year()));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_fields_are_reported_per_field(pool: PgPool) {
    let response = post_json_auth(
        common::build_test_app(pool),
        "/orcamentos",
        json!({"itens": [{"comprimento": 1, "preco_m2": 1}]}),
        &salesperson_token(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    let paths: Vec<&str> = json["errors"]
        .as_array()
        .expect("errors")
        .iter()
        .filter_map(|e| e["path"].as_str())
        .collect();
    assert_eq!(paths, vec!["cliente_id", "itens[0].largura"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn overflowing_item_value_is_rejected(pool: PgPool) {
    let client_id = create_client(&pool, client_body()).await;
    let response = post_json_auth(
        common::build_test_app(pool),
        "/orcamentos",
        quote_body(client_id, json!([{"largura": 1e200, "comprimento": 1e200, "preco_m2": 1}])),
        &salesperson_token(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_LINE_ITEM");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn huge_page_number_returns_empty_page(pool: PgPool) {
    let client_id = create_client(&pool, client_body()).await;
    create_quote(
        &pool,
        quote_body(client_id, json!([{"largura": 1, "comprimento": 1, "preco_m2": 1}])),
    )
    .await;

    let response = get_auth(
        common::build_test_app(pool),
        "/orcamentos?pagina=9223372036854775807",
        &admin_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["total"], 1);
    assert_eq!(json["orcamentos"].as_array().map(Vec::len), Some(0));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_client_is_a_validation_error(pool: PgPool) {
    let response = post_json_auth(
        common::build_test_app(pool),
        "/orcamentos",
        quote_body(4242, json!([{"largura": 1, "comprimento": 1, "preco_m2": 1}])),
        &salesperson_token(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn status_is_normalized_and_unknown_values_change_nothing(pool: PgPool) {
    let client_id = create_client(&pool, client_body()).await;
    let created = create_quote(
        &pool,
        quote_body(client_id, json!([{"largura": 1, "comprimento": 1, "preco_m2": 1}])),
    )
    .await;
    let id = created["id"].as_i64().expect("id");
    let uri = format!("/orcamentos/{id}/status");

    let response = patch_json_auth(
        common::build_test_app(pool.clone()),
        &uri,
        json!({"status": "em producao"}),
        &salesperson_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "EM PRODUCAO");

    let response = patch_json_auth(
        common::build_test_app(pool.clone()),
        &uri,
        json!({"status": "BOGUS"}),
        &salesperson_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_STATUS");

    let detail = body_json(
        get_auth(common::build_test_app(pool.clone()), &format!("/orcamentos/{id}"), &admin_token())
            .await,
    )
    .await;
    assert_eq!(detail["status"], "EM PRODUCAO");

    let response = patch_json_auth(
        common::build_test_app(pool),
        "/orcamentos/999/status",
        json!({"status": "APROVADO"}),
        &salesperson_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_filters_and_envelope(pool: PgPool) {
    let ana = create_client(&pool, client_body()).await;
    let mut bruno = client_body();
    bruno["nome"] = "Bruno Costa".into();
    bruno["documento"] = "52998224725".into();
    let bruno = create_client(&pool, bruno).await;

    let item = json!([{"largura": 1, "comprimento": 1, "preco_m2": 1}]);
    create_quote(&pool, quote_body(ana, item.clone())).await;
    let second = create_quote(&pool, quote_body(bruno, item.clone())).await;
    create_quote(&pool, quote_body(bruno, item)).await;

    let second_id = second["id"].as_i64().expect("id");
    patch_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/orcamentos/{second_id}/status"),
        json!({"status": "APROVADO"}),
        &salesperson_token(),
    )
    .await;

    let all = body_json(
        get_auth(common::build_test_app(pool.clone()), "/orcamentos?status=TODOS", &admin_token())
            .await,
    )
    .await;
    assert_eq!(all["total"], 3);
    assert_eq!(all["pagina"], 1);
    assert_eq!(all["limite"], 10);
    // Same issue date: newest ID first.
    assert_eq!(all["orcamentos"][0]["numero_orcamento"], format!("0003/{}", this_year()));

    let filtered = body_json(
        get_auth(
            common::build_test_app(pool.clone()),
            "/orcamentos?nome_cliente=bruno&status=aprovado",
            &admin_token(),
        )
        .await,
    )
    .await;
    assert_eq!(filtered["total"], 1);
    assert_eq!(filtered["orcamentos"][0]["id"], second_id);
    assert_eq!(filtered["orcamentos"][0]["nome_cliente"], "Bruno Costa");

    let by_client = body_json(
        get_auth(
            common::build_test_app(pool.clone()),
            &format!("/orcamentos?cliente_id={ana}&limite=1"),
            &admin_token(),
        )
        .await,
    )
    .await;
    assert_eq!(by_client["total"], 1);

    let response =
        get_auth(common::build_test_app(pool), "/orcamentos?status=BOGUS", &admin_token()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_requires_elevated_role_and_removes_quote(pool: PgPool) {
    let client_id = create_client(&pool, client_body()).await;
    let created = create_quote(
        &pool,
        quote_body(client_id, json!([{"largura": 1, "comprimento": 1, "preco_m2": 1}])),
    )
    .await;
    let uri = format!("/orcamentos/{}", created["id"]);

    let response = delete_auth(common::build_test_app(pool.clone()), &uri, &salesperson_token()).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = delete_auth(common::build_test_app(pool.clone()), &uri, &admin_token()).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(common::build_test_app(pool), &uri, &admin_token()).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleting_client_removes_its_quotes(pool: PgPool) {
    let client_id = create_client(&pool, client_body()).await;
    let created = create_quote(
        &pool,
        quote_body(client_id, json!([{"largura": 1, "comprimento": 1, "preco_m2": 1}])),
    )
    .await;

    let response = delete_auth(
        common::build_test_app(pool.clone()),
        &format!("/clientes/{client_id}"),
        &admin_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(
        common::build_test_app(pool),
        &format!("/orcamentos/{}", created["id"]),
        &admin_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
