//! Integration tests for the ticket lifecycle.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, request, token_for, ADMIN_USER_ID, SUPERVISOR_USER_ID};
use serde_json::json;
use sqlx::PgPool;

/// Create a ticket via the API and return its id.
async fn create_ticket(app: &axum::Router, token: &str, title: &str) -> i64 {
    let response = request(
        app.clone(),
        Method::POST,
        "/api/v1/tickets",
        token,
        Some(json!({ "title": title, "priority": "high" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn ticket_gets_generated_code_and_defaults(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = token_for(SUPERVISOR_USER_ID, "supervisor");

    let response = request(
        app,
        Method::POST,
        "/api/v1/tickets",
        &token,
        Some(json!({ "title": "Leaking pipe in basement" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    let code = json["data"]["code"].as_str().unwrap();
    assert!(code.starts_with("WO-"), "expected WO- prefix, got {code}");
    assert_eq!(json["data"]["status"], "pending");
    assert_eq!(json["data"]["priority"], "medium");
    assert_eq!(json["data"]["reported_by"], SUPERVISOR_USER_ID);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn lifecycle_happy_path_stamps_timestamps(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = token_for(ADMIN_USER_ID, "admin");
    let id = create_ticket(&app, &token, "Replace lobby lights").await;

    // pending -> in_execution stamps started_at.
    let response = request(
        app.clone(),
        Method::POST,
        &format!("/api/v1/tickets/{id}/status"),
        &token,
        Some(json!({ "status": "in_execution" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "in_execution");
    assert!(json["data"]["started_at"].is_string());
    assert!(json["data"]["finished_at"].is_null());

    // in_execution -> finalized stamps finished_at.
    let response = request(
        app,
        Method::POST,
        &format!("/api/v1/tickets/{id}/status"),
        &token,
        Some(json!({ "status": "finalized" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "finalized");
    assert!(json["data"]["finished_at"].is_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn skipping_execution_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = token_for(ADMIN_USER_ID, "admin");
    let id = create_ticket(&app, &token, "Paint stairwell").await;

    let response = request(
        app,
        Method::POST,
        &format!("/api/v1/tickets/{id}/status"),
        &token,
        Some(json!({ "status": "finalized" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn finalized_tickets_are_immutable(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = token_for(ADMIN_USER_ID, "admin");
    let id = create_ticket(&app, &token, "Service elevator").await;

    for status in ["in_execution", "finalized"] {
        let response = request(
            app.clone(),
            Method::POST,
            &format!("/api/v1/tickets/{id}/status"),
            &token,
            Some(json!({ "status": status })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    // Editing a finalized ticket conflicts.
    let response = request(
        app.clone(),
        Method::PUT,
        &format!("/api/v1/tickets/{id}"),
        &token,
        Some(json!({ "title": "Service elevator (again)" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // And no further transition is allowed.
    let response = request(
        app,
        Method::POST,
        &format!("/api/v1/tickets/{id}/status"),
        &token,
        Some(json!({ "status": "cancelled" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_priority_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = token_for(ADMIN_USER_ID, "admin");

    let response = request(
        app,
        Method::POST,
        "/api/v1/tickets",
        &token,
        Some(json!({ "title": "Odd job", "priority": "p0" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn ticket_list_filters_by_status(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = token_for(ADMIN_USER_ID, "admin");

    let first = create_ticket(&app, &token, "First").await;
    create_ticket(&app, &token, "Second").await;

    let response = request(
        app.clone(),
        Method::POST,
        &format!("/api/v1/tickets/{first}/status"),
        &token,
        Some(json!({ "status": "in_execution" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = request(
        app,
        Method::GET,
        "/api/v1/tickets?status=pending",
        &token,
        None,
    )
    .await;
    let json = body_json(response).await;
    let rows = json["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["title"], "Second");
}
