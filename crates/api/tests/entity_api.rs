//! Integration tests for the CRUD surface: locations, categories,
//! assets, societies, and the auth/permission gates in front of them.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, get, request, token_for, ADMIN_USER_ID, TECHNICIAN_USER_ID};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Auth gates
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn listing_without_token_is_unauthorized(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/locations").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn technician_cannot_create_locations(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = token_for(TECHNICIAN_USER_ID, "technician");

    let response = request(
        app,
        Method::POST,
        "/api/v1/locations",
        &token,
        Some(json!({ "code": "B1", "name": "Block B" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let json = body_json(response).await;
    assert_eq!(json["code"], "FORBIDDEN");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn technician_can_view_tickets(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = token_for(TECHNICIAN_USER_ID, "technician");

    let response = request(app, Method::GET, "/api/v1/tickets", &token, None).await;

    assert_eq!(response.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Location CRUD
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn location_crud_round_trip(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = token_for(ADMIN_USER_ID, "admin");

    // Create (whitespace in code/name must be trimmed away).
    let response = request(
        app.clone(),
        Method::POST,
        "/api/v1/locations",
        &token,
        Some(json!({ "code": "  B1 ", "name": " Block B ", "description": "north wing" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let created = body_json(response).await;
    let id = created["data"]["id"].as_i64().unwrap();
    assert_eq!(created["data"]["code"], "B1");
    assert_eq!(created["data"]["name"], "Block B");
    assert_eq!(created["data"]["is_active"], true);

    // Update.
    let response = request(
        app.clone(),
        Method::PUT,
        &format!("/api/v1/locations/{id}"),
        &token,
        Some(json!({ "name": "Block B (renovated)" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["data"]["name"], "Block B (renovated)");
    assert_eq!(updated["data"]["code"], "B1");

    // Toggle off, then confirm the default list hides it.
    let response = request(
        app.clone(),
        Method::POST,
        &format!("/api/v1/locations/{id}/toggle-active"),
        &token,
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let toggled = body_json(response).await;
    assert_eq!(toggled["data"]["is_active"], false);

    let response = request(app.clone(), Method::GET, "/api/v1/locations", &token, None).await;
    let list = body_json(response).await;
    assert!(list["data"].as_array().unwrap().is_empty());

    let response = request(
        app.clone(),
        Method::GET,
        "/api/v1/locations?include_inactive=true",
        &token,
        None,
    )
    .await;
    let list = body_json(response).await;
    assert_eq!(list["data"].as_array().unwrap().len(), 1);

    // Delete.
    let response = request(
        app.clone(),
        Method::DELETE,
        &format!("/api/v1/locations/{id}"),
        &token,
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = request(
        app,
        Method::GET,
        &format!("/api/v1/locations/{id}"),
        &token,
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_location_code_conflicts(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = token_for(ADMIN_USER_ID, "admin");

    let body = json!({ "code": "B1", "name": "Block B" });
    let response = request(
        app.clone(),
        Method::POST,
        "/api/v1/locations",
        &token,
        Some(body.clone()),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = request(app, Method::POST, "/api/v1/locations", &token, Some(body)).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn blank_location_name_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = token_for(ADMIN_USER_ID, "admin");

    let response = request(
        app,
        Method::POST,
        "/api/v1/locations",
        &token,
        Some(json!({ "code": "B1", "name": "   " })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

// ---------------------------------------------------------------------------
// Assets
// ---------------------------------------------------------------------------

/// Seed a location and category, returning their ids.
async fn seed_refs(app: &axum::Router, token: &str) -> (i64, i64) {
    let response = request(
        app.clone(),
        Method::POST,
        "/api/v1/locations",
        token,
        Some(json!({ "code": "L1", "name": "Roof" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let location_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = request(
        app.clone(),
        Method::POST,
        "/api/v1/asset-categories",
        token,
        Some(json!({ "code": "HVAC", "name": "Climate" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let category_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    (location_id, category_id)
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn asset_create_and_search_with_refs(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = token_for(ADMIN_USER_ID, "admin");
    let (location_id, category_id) = seed_refs(&app, &token).await;

    let response = request(
        app.clone(),
        Method::POST,
        "/api/v1/assets",
        &token,
        Some(json!({
            "code": "AC-01",
            "name": "Rooftop chiller",
            "location_id": location_id,
            "category_id": category_id,
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // The list view resolves reference names and counts open tickets.
    let response = request(
        app.clone(),
        Method::GET,
        "/api/v1/assets?search=chiller",
        &token,
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let list = body_json(response).await;
    let rows = list["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["location_name"], "Roof");
    assert_eq!(rows[0]["category_name"], "Climate");
    assert_eq!(rows[0]["open_ticket_count"], 0);

    // Filtering by another location finds nothing.
    let response = request(
        app,
        Method::GET,
        &format!("/api/v1/assets?location_id={}", location_id + 999),
        &token,
        None,
    )
    .await;
    let list = body_json(response).await;
    assert!(list["data"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn asset_with_unknown_location_is_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = token_for(ADMIN_USER_ID, "admin");
    let (_, category_id) = seed_refs(&app, &token).await;

    let response = request(
        app,
        Method::POST,
        "/api/v1/assets",
        &token,
        Some(json!({
            "code": "AC-02",
            "name": "Ghost asset",
            "location_id": 9999,
            "category_id": category_id,
        })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn location_with_assets_cannot_be_deleted(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = token_for(ADMIN_USER_ID, "admin");
    let (location_id, category_id) = seed_refs(&app, &token).await;

    let response = request(
        app.clone(),
        Method::POST,
        "/api/v1/assets",
        &token,
        Some(json!({
            "code": "AC-01",
            "name": "Rooftop chiller",
            "location_id": location_id,
            "category_id": category_id,
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = request(
        app,
        Method::DELETE,
        &format!("/api/v1/locations/{location_id}"),
        &token,
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFLICT");
}

// ---------------------------------------------------------------------------
// Societies and branding cache
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn branding_follows_society_updates(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = token_for(ADMIN_USER_ID, "admin");

    let response = request(
        app.clone(),
        Method::POST,
        "/api/v1/societies",
        &token,
        Some(json!({
            "code": "GH",
            "name": "Garden Heights",
            "primary_color": "#336699",
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();

    // First branding read populates the cache.
    let response = request(
        app.clone(),
        Method::GET,
        &format!("/api/v1/societies/{id}/branding"),
        &token,
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let branding = body_json(response).await;
    assert_eq!(branding["data"]["display_name"], "Garden Heights");
    assert_eq!(branding["data"]["primary_color"], "#336699");

    // An update must invalidate the cached entry.
    let response = request(
        app.clone(),
        Method::PUT,
        &format!("/api/v1/societies/{id}"),
        &token,
        Some(json!({ "display_name": "Garden Heights HOA", "primary_color": "#112233" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = request(
        app,
        Method::GET,
        &format!("/api/v1/societies/{id}/branding"),
        &token,
        None,
    )
    .await;
    let branding = body_json(response).await;
    assert_eq!(branding["data"]["display_name"], "Garden Heights HOA");
    assert_eq!(branding["data"]["primary_color"], "#112233");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_primary_color_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = token_for(ADMIN_USER_ID, "admin");

    let response = request(
        app,
        Method::POST,
        "/api/v1/societies",
        &token,
        Some(json!({ "code": "GH", "name": "Garden Heights", "primary_color": "blue" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
