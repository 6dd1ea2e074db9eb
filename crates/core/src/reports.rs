//! Report aggregation layer.
//!
//! Pure, stateless transforms over row slices the repositories have
//! already fetched: normalize heterogeneous status/label text, bucket and
//! count, rank top-N (stable sort, value descending), and compute derived
//! KPIs (SLA rate, aging buckets, inventory valuation, consumption
//! ranking, monthly trend). Nothing here touches the database; the only
//! failure mode upstream is the propagated query error.
//!
//! Label normalization accepts both English and Spanish spellings since
//! ticket rows imported from the legacy system carry free-form status and
//! priority text.

use std::collections::HashMap;

use chrono::Datelike;
use serde::Serialize;

use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Input snapshots (mapped from database rows by the repositories)
// ---------------------------------------------------------------------------

/// One ticket row as seen by the report layer.
#[derive(Debug, Clone)]
pub struct TicketSnapshot {
    pub id: DbId,
    pub asset_id: Option<DbId>,
    pub asset_name: Option<String>,
    pub status: String,
    pub priority: String,
    pub opened_at: Timestamp,
    pub finished_at: Option<Timestamp>,
    pub due_at: Option<Timestamp>,
}

/// Current stock of one part, with its category label.
#[derive(Debug, Clone)]
pub struct StockLine {
    pub part_id: DbId,
    pub part_name: String,
    pub category: Option<String>,
    pub qty: f64,
}

/// Unit cost of one part (separate table, joined here).
#[derive(Debug, Clone)]
pub struct CostLine {
    pub part_id: DbId,
    pub unit_cost: f64,
}

/// One kardex movement.
#[derive(Debug, Clone)]
pub struct KardexLine {
    pub part_id: DbId,
    pub part_name: String,
    pub direction: String,
    pub qty: f64,
}

// ---------------------------------------------------------------------------
// Output shapes (serialized straight into the dashboard responses)
// ---------------------------------------------------------------------------

/// Generic chart row: one label, one numeric value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelCount {
    pub label: String,
    pub count: i64,
}

/// Ticket counts per canonical status bucket.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatusBreakdown {
    pub pending: i64,
    pub in_execution: i64,
    pub finalized: i64,
    pub cancelled: i64,
    pub other: i64,
    pub total: i64,
}

/// One asset ranked by ticket volume.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedAsset {
    pub asset_id: DbId,
    pub asset_name: String,
    pub ticket_count: i64,
}

/// SLA compliance over finalized tickets that carried a due date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlaSummary {
    pub on_time: i64,
    pub late: i64,
    /// `on_time / (on_time + late) * 100`, rounded to one decimal.
    /// `None` when no finalized ticket had a due date.
    pub rate_pct: Option<f64>,
}

/// Open tickets bucketed by days since they were opened.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AgingBuckets {
    pub days_0_7: i64,
    pub days_8_30: i64,
    pub days_31_90: i64,
    pub days_over_90: i64,
}

/// Stock value aggregated for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryValuation {
    pub category: String,
    pub part_count: i64,
    pub total_qty: f64,
    pub total_value: f64,
}

/// Whole-inventory valuation: stock joined with unit costs in-service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryValuation {
    pub categories: Vec<CategoryValuation>,
    pub grand_total: f64,
    /// Parts that had stock but no cost row; valued at zero.
    pub unpriced_parts: i64,
}

/// One part ranked by outbound consumption.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsumptionEntry {
    pub part_id: DbId,
    pub part_name: String,
    pub total_qty: f64,
}

/// Opened/finalized counts for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthPoint {
    /// `YYYY-MM`.
    pub month: String,
    pub opened: i64,
    pub finalized: i64,
}

// ---------------------------------------------------------------------------
// Label normalization
// ---------------------------------------------------------------------------

/// Canonical status bucket after normalization. Unrecognized labels land
/// in `Other` instead of failing the whole report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusBucket {
    Pending,
    InExecution,
    Finalized,
    Cancelled,
    Other,
}

/// Canonical priority bucket after normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorityBucket {
    Low,
    Medium,
    High,
    Critical,
    Other,
}

/// Fold a raw label: trim, lowercase, strip accents, collapse
/// separators to single spaces.
fn fold_label(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut last_was_space = true;
    for ch in raw.trim().chars() {
        // Unicode lowercase first so accented capitals fold too.
        let ch = ch.to_lowercase().next().unwrap_or(ch);
        let ch = match ch {
            'á' | 'à' | 'ä' => 'a',
            'é' | 'è' | 'ë' => 'e',
            'í' | 'ì' | 'ï' => 'i',
            'ó' | 'ò' | 'ö' => 'o',
            'ú' | 'ù' | 'ü' => 'u',
            'ñ' => 'n',
            '-' | '_' | '.' | '/' => ' ',
            c => c,
        };
        if ch == ' ' {
            if !last_was_space {
                out.push(' ');
            }
            last_was_space = true;
        } else {
            out.push(ch);
            last_was_space = false;
        }
    }
    out.trim_end().to_string()
}

/// Map a raw status label onto its canonical bucket.
pub fn normalize_status(raw: &str) -> StatusBucket {
    match fold_label(raw).as_str() {
        "pending" | "pendiente" | "open" | "abierto" | "abierta" | "new" | "nuevo" | "nueva" => {
            StatusBucket::Pending
        }
        "in execution" | "en ejecucion" | "in progress" | "en proceso" | "proceso"
        | "executing" | "assigned" | "asignado" => StatusBucket::InExecution,
        "finalized" | "finalizado" | "finalizada" | "closed" | "cerrado" | "cerrada" | "done"
        | "completed" | "completado" | "completada" | "resuelto" | "resolved" => {
            StatusBucket::Finalized
        }
        "cancelled" | "canceled" | "cancelado" | "cancelada" | "anulado" | "anulada"
        | "rejected" | "rechazado" => StatusBucket::Cancelled,
        _ => StatusBucket::Other,
    }
}

/// Map a raw priority label onto its canonical bucket.
pub fn normalize_priority(raw: &str) -> PriorityBucket {
    match fold_label(raw).as_str() {
        "low" | "baja" | "bajo" | "minor" => PriorityBucket::Low,
        "medium" | "media" | "medio" | "normal" => PriorityBucket::Medium,
        "high" | "alta" | "alto" | "major" => PriorityBucket::High,
        "critical" | "critica" | "critico" | "urgent" | "urgente" => PriorityBucket::Critical,
        _ => PriorityBucket::Other,
    }
}

// ---------------------------------------------------------------------------
// Bucketing and counting
// ---------------------------------------------------------------------------

/// Count tickets per canonical status bucket.
pub fn status_breakdown(rows: &[TicketSnapshot]) -> StatusBreakdown {
    let mut out = StatusBreakdown::default();
    for row in rows {
        match normalize_status(&row.status) {
            StatusBucket::Pending => out.pending += 1,
            StatusBucket::InExecution => out.in_execution += 1,
            StatusBucket::Finalized => out.finalized += 1,
            StatusBucket::Cancelled => out.cancelled += 1,
            StatusBucket::Other => out.other += 1,
        }
        out.total += 1;
    }
    out
}

/// Count tickets per canonical priority, shaped for chart rendering.
/// Buckets come out in severity order; `other` is appended only when
/// non-empty.
pub fn priority_breakdown(rows: &[TicketSnapshot]) -> Vec<LabelCount> {
    let mut counts = [0i64; 5];
    for row in rows {
        let idx = match normalize_priority(&row.priority) {
            PriorityBucket::Low => 0,
            PriorityBucket::Medium => 1,
            PriorityBucket::High => 2,
            PriorityBucket::Critical => 3,
            PriorityBucket::Other => 4,
        };
        counts[idx] += 1;
    }

    let mut series: Vec<LabelCount> = ["low", "medium", "high", "critical"]
        .iter()
        .zip(counts)
        .map(|(label, count)| LabelCount {
            label: (*label).to_string(),
            count,
        })
        .collect();
    if counts[4] > 0 {
        series.push(LabelCount {
            label: "other".to_string(),
            count: counts[4],
        });
    }
    series
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

/// Rank assets by ticket volume, descending, truncated to `top_n`.
///
/// Ties keep first-seen order (stable sort over insertion order), so two
/// runs over the same rows produce the same ranking. Tickets without an
/// asset reference are skipped.
pub fn rank_top_assets(rows: &[TicketSnapshot], top_n: usize) -> Vec<RankedAsset> {
    let mut order: Vec<DbId> = Vec::new();
    let mut counts: HashMap<DbId, RankedAsset> = HashMap::new();

    for row in rows {
        let Some(asset_id) = row.asset_id else {
            continue;
        };
        counts
            .entry(asset_id)
            .and_modify(|e| e.ticket_count += 1)
            .or_insert_with(|| {
                order.push(asset_id);
                RankedAsset {
                    asset_id,
                    asset_name: row
                        .asset_name
                        .clone()
                        .unwrap_or_else(|| format!("asset #{asset_id}")),
                    ticket_count: 1,
                }
            });
    }

    let mut ranked: Vec<RankedAsset> = order
        .into_iter()
        .filter_map(|id| counts.remove(&id))
        .collect();
    ranked.sort_by(|a, b| b.ticket_count.cmp(&a.ticket_count));
    ranked.truncate(top_n);
    ranked
}

// ---------------------------------------------------------------------------
// Derived KPIs
// ---------------------------------------------------------------------------

/// Round to one decimal place.
fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Round to two decimal places (currency amounts).
fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// SLA compliance: a finalized ticket is on time when it finished at or
/// before its due date. Finalized tickets without a due date (or without
/// a finish timestamp) do not enter the ratio.
pub fn sla_rate(rows: &[TicketSnapshot]) -> SlaSummary {
    let mut on_time = 0i64;
    let mut late = 0i64;

    for row in rows {
        if normalize_status(&row.status) != StatusBucket::Finalized {
            continue;
        }
        let (Some(finished), Some(due)) = (row.finished_at, row.due_at) else {
            continue;
        };
        if finished <= due {
            on_time += 1;
        } else {
            late += 1;
        }
    }

    let rate_pct = if on_time + late > 0 {
        Some(round1(on_time as f64 * 100.0 / (on_time + late) as f64))
    } else {
        None
    };

    SlaSummary {
        on_time,
        late,
        rate_pct,
    }
}

/// Bucket open tickets (pending / in execution) by whole days since they
/// were opened. Edges: 0-7, 8-30, 31-90, 90+.
pub fn aging_buckets(rows: &[TicketSnapshot], now: Timestamp) -> AgingBuckets {
    let mut out = AgingBuckets::default();
    for row in rows {
        match normalize_status(&row.status) {
            StatusBucket::Pending | StatusBucket::InExecution => {}
            _ => continue,
        }
        let days = (now - row.opened_at).num_days().max(0);
        match days {
            0..=7 => out.days_0_7 += 1,
            8..=30 => out.days_8_30 += 1,
            31..=90 => out.days_31_90 += 1,
            _ => out.days_over_90 += 1,
        }
    }
    out
}

/// Label used for parts with no category.
const UNCATEGORIZED: &str = "uncategorized";

/// Join stock and cost rows by part id and aggregate value per category.
///
/// Parts with stock but no cost row value at zero and are reported in
/// `unpriced_parts`. Categories come out by total value descending
/// (stable on first-seen order for ties).
pub fn inventory_valuation(stock: &[StockLine], costs: &[CostLine]) -> InventoryValuation {
    let cost_by_part: HashMap<DbId, f64> =
        costs.iter().map(|c| (c.part_id, c.unit_cost)).collect();

    let mut order: Vec<String> = Vec::new();
    let mut by_category: HashMap<String, CategoryValuation> = HashMap::new();
    let mut unpriced_parts = 0i64;
    let mut grand_total = 0.0f64;

    for line in stock {
        let value = match cost_by_part.get(&line.part_id) {
            Some(unit_cost) => line.qty * unit_cost,
            None => {
                unpriced_parts += 1;
                0.0
            }
        };
        grand_total += value;

        let category = line
            .category
            .clone()
            .unwrap_or_else(|| UNCATEGORIZED.to_string());
        by_category
            .entry(category.clone())
            .and_modify(|c| {
                c.part_count += 1;
                c.total_qty += line.qty;
                c.total_value += value;
            })
            .or_insert_with(|| {
                order.push(category.clone());
                CategoryValuation {
                    category,
                    part_count: 1,
                    total_qty: line.qty,
                    total_value: value,
                }
            });
    }

    let mut categories: Vec<CategoryValuation> = order
        .into_iter()
        .filter_map(|c| by_category.remove(&c))
        .map(|mut c| {
            c.total_value = round2(c.total_value);
            c
        })
        .collect();
    categories.sort_by(|a, b| b.total_value.total_cmp(&a.total_value));

    InventoryValuation {
        categories,
        grand_total: round2(grand_total),
        unpriced_parts,
    }
}

/// Kardex direction value for outbound movements.
const DIRECTION_OUT: &str = "out";

/// Rank parts by total outbound quantity, descending, truncated to
/// `top_n`. Inbound movements are ignored.
pub fn consumption_ranking(rows: &[KardexLine], top_n: usize) -> Vec<ConsumptionEntry> {
    let mut order: Vec<DbId> = Vec::new();
    let mut totals: HashMap<DbId, ConsumptionEntry> = HashMap::new();

    for row in rows {
        if row.direction != DIRECTION_OUT {
            continue;
        }
        totals
            .entry(row.part_id)
            .and_modify(|e| e.total_qty += row.qty)
            .or_insert_with(|| {
                order.push(row.part_id);
                ConsumptionEntry {
                    part_id: row.part_id,
                    part_name: row.part_name.clone(),
                    total_qty: row.qty,
                }
            });
    }

    let mut ranked: Vec<ConsumptionEntry> = order
        .into_iter()
        .filter_map(|id| totals.remove(&id))
        .collect();
    ranked.sort_by(|a, b| b.total_qty.total_cmp(&a.total_qty));
    ranked.truncate(top_n);
    ranked
}

// ---------------------------------------------------------------------------
// Monthly trend
// ---------------------------------------------------------------------------

/// Step a `(year, month)` pair back one month.
fn prev_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

/// Opened/finalized ticket counts per calendar month for the trailing
/// `months` window ending at `now`'s month, oldest first, zero-filled.
pub fn monthly_ticket_trend(
    rows: &[TicketSnapshot],
    months: usize,
    now: Timestamp,
) -> Vec<MonthPoint> {
    let months = months.max(1);

    // Build the window labels oldest -> newest.
    let mut keys: Vec<(i32, u32)> = Vec::with_capacity(months);
    let (mut year, mut month) = (now.year(), now.month());
    for _ in 0..months {
        keys.push((year, month));
        (year, month) = prev_month(year, month);
    }
    keys.reverse();

    let mut points: Vec<MonthPoint> = keys
        .iter()
        .map(|(y, m)| MonthPoint {
            month: format!("{y:04}-{m:02}"),
            opened: 0,
            finalized: 0,
        })
        .collect();
    let index: HashMap<(i32, u32), usize> =
        keys.iter().enumerate().map(|(i, k)| (*k, i)).collect();

    for row in rows {
        let opened_key = (row.opened_at.year(), row.opened_at.month());
        if let Some(&i) = index.get(&opened_key) {
            points[i].opened += 1;
        }
        if let Some(finished) = row.finished_at {
            if normalize_status(&row.status) == StatusBucket::Finalized {
                if let Some(&i) = index.get(&(finished.year(), finished.month())) {
                    points[i].finalized += 1;
                }
            }
        }
    }

    points
}
