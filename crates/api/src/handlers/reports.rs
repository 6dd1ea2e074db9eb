//! Handlers for the reporting dashboard.
//!
//! One endpoint per dashboard tab. Each fetches its raw row sets (in
//! parallel where there is more than one), then hands everything to the
//! pure transforms in `mainstay_core::reports`; no aggregation happens
//! in SQL beyond what the row fetchers already resolve.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use mainstay_core::reports::{
    aging_buckets, consumption_ranking, inventory_valuation, monthly_ticket_trend,
    priority_breakdown, rank_top_assets, sla_rate, status_breakdown, AgingBuckets,
    ConsumptionEntry, InventoryValuation, LabelCount, MonthPoint, RankedAsset, SlaSummary,
    StatusBreakdown,
};
use mainstay_core::roles::PERM_REPORTS_VIEW;
use mainstay_core::types::DbId;
use mainstay_db::repositories::ReportRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{ensure_permission, RequireAuth};
use crate::response::DataResponse;
use crate::state::AppState;

/// Default trailing window for the monthly trend.
const DEFAULT_TREND_MONTHS: usize = 6;

/// Upper bound for the monthly trend window.
const MAX_TREND_MONTHS: usize = 24;

/// Default N for top-N rankings.
const DEFAULT_TOP_N: usize = 5;

/// Upper bound for top-N rankings.
const MAX_TOP_N: usize = 50;

/// Default trailing window (days) for consumption reporting.
const DEFAULT_CONSUMPTION_DAYS: i64 = 90;

// ---------------------------------------------------------------------------
// Query parameter types
// ---------------------------------------------------------------------------

/// Common filter: restrict ticket-derived figures to one society.
#[derive(Debug, Deserialize)]
pub struct ReportScopeQuery {
    pub society_id: Option<DbId>,
}

/// Query params for the tickets tab.
#[derive(Debug, Deserialize)]
pub struct TicketReportQuery {
    pub society_id: Option<DbId>,
    /// Trailing months in the trend (default 6, max 24).
    pub months: Option<usize>,
}

/// Query params for the assets tab.
#[derive(Debug, Deserialize)]
pub struct AssetReportQuery {
    pub society_id: Option<DbId>,
    /// Ranking size (default 5, max 50).
    pub top: Option<usize>,
}

/// Query params for the inventory tab.
#[derive(Debug, Deserialize)]
pub struct InventoryReportQuery {
    /// Ranking size (default 5, max 50).
    pub top: Option<usize>,
    /// Consumption window in days (default 90).
    pub days: Option<i64>,
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Headline KPIs for the overview tab.
#[derive(Debug, Serialize)]
pub struct OverviewReport {
    pub open_tickets: i64,
    pub active_assets: i64,
    pub sla: SlaSummary,
    pub inventory_value: f64,
    pub status_breakdown: StatusBreakdown,
}

/// Everything the tickets tab renders.
#[derive(Debug, Serialize)]
pub struct TicketsReport {
    pub status_breakdown: StatusBreakdown,
    pub priority_breakdown: Vec<LabelCount>,
    pub aging: AgingBuckets,
    pub monthly_trend: Vec<MonthPoint>,
    pub sla: SlaSummary,
}

/// Everything the assets tab renders.
#[derive(Debug, Serialize)]
pub struct AssetsReport {
    pub top_assets: Vec<RankedAsset>,
}

/// Everything the inventory tab renders.
#[derive(Debug, Serialize)]
pub struct InventoryReport {
    pub valuation: InventoryValuation,
    pub top_consumed: Vec<ConsumptionEntry>,
}

fn clamp_top(top: Option<usize>) -> usize {
    top.unwrap_or(DEFAULT_TOP_N).clamp(1, MAX_TOP_N)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/reports/overview
///
/// Headline KPIs: open tickets, SLA rate, inventory value, active
/// assets.
pub async fn overview(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<ReportScopeQuery>,
) -> AppResult<impl IntoResponse> {
    ensure_permission(&state, &auth, PERM_REPORTS_VIEW).await?;

    let (tickets, stock, costs, active_assets) = tokio::try_join!(
        ReportRepo::ticket_snapshots(&state.pool, params.society_id, None),
        ReportRepo::stock_lines(&state.pool),
        ReportRepo::cost_lines(&state.pool),
        ReportRepo::active_asset_count(&state.pool),
    )
    .map_err(AppError::Database)?;

    let breakdown = status_breakdown(&tickets);
    let report = OverviewReport {
        open_tickets: breakdown.pending + breakdown.in_execution,
        active_assets,
        sla: sla_rate(&tickets),
        inventory_value: inventory_valuation(&stock, &costs).grand_total,
        status_breakdown: breakdown,
    };

    Ok(Json(DataResponse { data: report }))
}

/// GET /api/v1/reports/tickets
///
/// Status/priority breakdowns, aging buckets, SLA, and the monthly
/// trend for the tickets tab.
pub async fn tickets(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<TicketReportQuery>,
) -> AppResult<impl IntoResponse> {
    ensure_permission(&state, &auth, PERM_REPORTS_VIEW).await?;

    let months = params
        .months
        .unwrap_or(DEFAULT_TREND_MONTHS)
        .clamp(1, MAX_TREND_MONTHS);

    let rows = ReportRepo::ticket_snapshots(&state.pool, params.society_id, None).await?;
    let now = Utc::now();

    let report = TicketsReport {
        status_breakdown: status_breakdown(&rows),
        priority_breakdown: priority_breakdown(&rows),
        aging: aging_buckets(&rows, now),
        monthly_trend: monthly_ticket_trend(&rows, months, now),
        sla: sla_rate(&rows),
    };

    Ok(Json(DataResponse { data: report }))
}

/// GET /api/v1/reports/assets
///
/// Assets ranked by ticket volume.
pub async fn assets(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<AssetReportQuery>,
) -> AppResult<impl IntoResponse> {
    ensure_permission(&state, &auth, PERM_REPORTS_VIEW).await?;

    let rows = ReportRepo::ticket_snapshots(&state.pool, params.society_id, None).await?;

    let report = AssetsReport {
        top_assets: rank_top_assets(&rows, clamp_top(params.top)),
    };

    Ok(Json(DataResponse { data: report }))
}

/// GET /api/v1/reports/inventory
///
/// Valuation by category and the consumption ranking for the trailing
/// window.
pub async fn inventory(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<InventoryReportQuery>,
) -> AppResult<impl IntoResponse> {
    ensure_permission(&state, &auth, PERM_REPORTS_VIEW).await?;

    let days = params.days.unwrap_or(DEFAULT_CONSUMPTION_DAYS).max(1);
    let moved_from = Utc::now() - Duration::days(days);

    let (stock, costs, kardex) = tokio::try_join!(
        ReportRepo::stock_lines(&state.pool),
        ReportRepo::cost_lines(&state.pool),
        ReportRepo::kardex_lines(&state.pool, Some(moved_from)),
    )
    .map_err(AppError::Database)?;

    let report = InventoryReport {
        valuation: inventory_valuation(&stock, &costs),
        top_consumed: consumption_ranking(&kardex, clamp_top(params.top)),
    };

    Ok(Json(DataResponse { data: report }))
}
