//! Integration tests for the reporting dashboard endpoints.
//!
//! Rows are seeded with SQL so the lifecycle timestamps (due/finished)
//! are exact, then the endpoints are asserted against hand-computed
//! figures.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, request, token_for, ADMIN_USER_ID, TECHNICIAN_USER_ID};
use sqlx::PgPool;

/// Insert a ticket row directly, bypassing the API, so status and
/// timestamps are fully controlled.
async fn seed_ticket(
    pool: &PgPool,
    title: &str,
    asset_id: Option<i64>,
    status: &str,
    priority: &str,
    opened_days_ago: i64,
    finished_days_ago: Option<i64>,
    due_days_ago: Option<i64>,
) {
    sqlx::query(
        "INSERT INTO tickets (title, asset_id, status, priority, opened_at, finished_at, due_at) \
         VALUES ($1, $2, $3, $4, \
                 now() - make_interval(days => $5::int), \
                 CASE WHEN $6::int IS NULL THEN NULL \
                      ELSE now() - make_interval(days => $6::int) END, \
                 CASE WHEN $7::int IS NULL THEN NULL \
                      ELSE now() - make_interval(days => $7::int) END)",
    )
    .bind(title)
    .bind(asset_id)
    .bind(status)
    .bind(priority)
    .bind(opened_days_ago as i32)
    .bind(finished_days_ago.map(|d| d as i32))
    .bind(due_days_ago.map(|d| d as i32))
    .execute(pool)
    .await
    .unwrap();
}

/// Seed one location/category/asset and return the asset id.
async fn seed_asset(pool: &PgPool, code: &str, name: &str) -> i64 {
    sqlx::query("INSERT INTO locations (code, name) VALUES ($1, $1) ON CONFLICT DO NOTHING")
        .bind(format!("L-{code}"))
        .execute(pool)
        .await
        .unwrap();
    sqlx::query("INSERT INTO asset_categories (code, name) VALUES ($1, $1) ON CONFLICT DO NOTHING")
        .bind(format!("C-{code}"))
        .execute(pool)
        .await
        .unwrap();

    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO assets (code, name, location_id, category_id) \
         VALUES ($1, $2, \
                 (SELECT id FROM locations WHERE code = $3), \
                 (SELECT id FROM asset_categories WHERE code = $4)) \
         RETURNING id",
    )
    .bind(code)
    .bind(name)
    .bind(format!("L-{code}"))
    .bind(format!("C-{code}"))
    .fetch_one(pool)
    .await
    .unwrap();
    id
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn overview_computes_kpis(pool: PgPool) {
    // Two open, one finalized on time, one finalized late.
    seed_ticket(&pool, "open-a", None, "pending", "low", 3, None, None).await;
    seed_ticket(&pool, "open-b", None, "in_execution", "high", 10, None, None).await;
    seed_ticket(&pool, "done-on-time", None, "finalized", "medium", 20, Some(6), Some(5)).await;
    seed_ticket(&pool, "done-late", None, "finalized", "medium", 20, Some(2), Some(5)).await;

    // Inventory: 4 x 2.5 = 10.0 plus an unpriced part.
    sqlx::query(
        "INSERT INTO inventory_parts (code, name, category, stock_qty) VALUES \
         ('P1', 'Fuse', 'Electrical', 4), \
         ('P2', 'Pipe', 'Plumbing', 7)",
    )
    .execute(&pool)
    .await
    .unwrap();
    sqlx::query(
        "INSERT INTO part_costs (part_id, unit_cost) \
         SELECT id, 2.5 FROM inventory_parts WHERE code = 'P1'",
    )
    .execute(&pool)
    .await
    .unwrap();

    let app = common::build_test_app(pool);
    let token = token_for(ADMIN_USER_ID, "admin");

    let response = request(app, Method::GET, "/api/v1/reports/overview", &token, None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let data = &json["data"];
    assert_eq!(data["open_tickets"], 2);
    assert_eq!(data["sla"]["on_time"], 1);
    assert_eq!(data["sla"]["late"], 1);
    assert_eq!(data["sla"]["rate_pct"], 50.0);
    assert_eq!(data["inventory_value"], 10.0);
    assert_eq!(data["status_breakdown"]["pending"], 1);
    assert_eq!(data["status_breakdown"]["finalized"], 2);
    assert_eq!(data["status_breakdown"]["total"], 4);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn tickets_tab_buckets_and_ages(pool: PgPool) {
    seed_ticket(&pool, "fresh", None, "pending", "low", 0, None, None).await;
    seed_ticket(&pool, "stale", None, "pending", "critical", 45, None, None).await;
    seed_ticket(&pool, "ancient", None, "in_execution", "high", 120, None, None).await;
    seed_ticket(&pool, "closed", None, "finalized", "medium", 200, Some(150), None).await;

    let app = common::build_test_app(pool);
    let token = token_for(ADMIN_USER_ID, "admin");

    let response = request(
        app,
        Method::GET,
        "/api/v1/reports/tickets?months=3",
        &token,
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let data = &json["data"];

    assert_eq!(data["aging"]["days_0_7"], 1);
    assert_eq!(data["aging"]["days_31_90"], 1);
    assert_eq!(data["aging"]["days_over_90"], 1);

    // Priority series is severity-ordered.
    let priorities = data["priority_breakdown"].as_array().unwrap();
    assert_eq!(priorities[0]["label"], "low");
    assert_eq!(priorities[0]["count"], 1);
    assert_eq!(priorities[3]["label"], "critical");
    assert_eq!(priorities[3]["count"], 1);

    // Three trailing months, zero-filled, with the fresh ticket in the
    // newest bucket.
    let trend = data["monthly_trend"].as_array().unwrap();
    assert_eq!(trend.len(), 3);
    assert_eq!(trend[2]["opened"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn assets_tab_ranks_by_ticket_volume(pool: PgPool) {
    let chiller = seed_asset(&pool, "AC-01", "Chiller").await;
    let pump = seed_asset(&pool, "PM-01", "Pump").await;

    for i in 0..3 {
        seed_ticket(&pool, &format!("c{i}"), Some(chiller), "pending", "low", 1, None, None).await;
    }
    seed_ticket(&pool, "p0", Some(pump), "pending", "low", 1, None, None).await;
    seed_ticket(&pool, "none", None, "pending", "low", 1, None, None).await;

    let app = common::build_test_app(pool);
    let token = token_for(ADMIN_USER_ID, "admin");

    let response = request(
        app,
        Method::GET,
        "/api/v1/reports/assets?top=1",
        &token,
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let top = json["data"]["top_assets"].as_array().unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0]["asset_name"], "Chiller");
    assert_eq!(top[0]["ticket_count"], 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn inventory_tab_joins_valuation_and_ranks_consumption(pool: PgPool) {
    sqlx::query(
        "INSERT INTO inventory_parts (code, name, category, stock_qty) VALUES \
         ('P1', 'Fuse', 'Electrical', 10), \
         ('P2', 'Pipe', 'Plumbing', 2)",
    )
    .execute(&pool)
    .await
    .unwrap();
    sqlx::query(
        "INSERT INTO part_costs (part_id, unit_cost) \
         SELECT id, CASE code WHEN 'P1' THEN 1.5 ELSE 8.0 END \
         FROM inventory_parts WHERE code IN ('P1', 'P2')",
    )
    .execute(&pool)
    .await
    .unwrap();
    // Consumption: P2 consumed more than P1; inbound movements ignored.
    sqlx::query(
        "INSERT INTO kardex_entries (part_id, direction, qty, reason) \
         SELECT id, 'out', 5, 'consumption' FROM inventory_parts WHERE code = 'P2'",
    )
    .execute(&pool)
    .await
    .unwrap();
    sqlx::query(
        "INSERT INTO kardex_entries (part_id, direction, qty, reason) \
         SELECT id, 'out', 2, 'consumption' FROM inventory_parts WHERE code = 'P1'",
    )
    .execute(&pool)
    .await
    .unwrap();
    sqlx::query(
        "INSERT INTO kardex_entries (part_id, direction, qty, reason) \
         SELECT id, 'in', 50, 'receipt' FROM inventory_parts WHERE code = 'P1'",
    )
    .execute(&pool)
    .await
    .unwrap();

    let app = common::build_test_app(pool);
    let token = token_for(ADMIN_USER_ID, "admin");

    let response = request(app, Method::GET, "/api/v1/reports/inventory", &token, None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let data = &json["data"];

    // 10 * 1.5 + 2 * 8.0 = 31.0
    assert_eq!(data["valuation"]["grand_total"], 31.0);
    let categories = data["valuation"]["categories"].as_array().unwrap();
    assert_eq!(categories[0]["category"], "Plumbing");
    assert_eq!(categories[0]["total_value"], 16.0);

    let consumed = data["top_consumed"].as_array().unwrap();
    assert_eq!(consumed[0]["part_name"], "Pipe");
    assert_eq!(consumed[0]["total_qty"], 5.0);
    assert_eq!(consumed[1]["part_name"], "Fuse");
    assert_eq!(consumed[1]["total_qty"], 2.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reports_require_the_view_permission(pool: PgPool) {
    let app = common::build_test_app(pool);

    // Technicians are not granted reports.view in the seed data.
    let token = token_for(TECHNICIAN_USER_ID, "technician");
    let response = request(
        app.clone(),
        Method::GET,
        "/api/v1/reports/overview",
        &token,
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Supervisors hold the full catalog.
    let token = token_for(common::SUPERVISOR_USER_ID, "supervisor");
    let response = request(app, Method::GET, "/api/v1/reports/overview", &token, None).await;
    assert_eq!(response.status(), StatusCode::OK);
}
