//! Integration tests for the inventory flow: parts with costs, count
//! documents adjusting stock, and the kardex ledger.

use sqlx::PgPool;

use mainstay_db::models::inventory::{
    CreateInventoryDoc, CreateMovement, CreatePart, DocItemInput, KARDEX_IN, KARDEX_OUT,
    REASON_ADJUSTMENT, REASON_CONSUMPTION,
};
use mainstay_db::repositories::InventoryRepo;

fn new_part(code: &str, stock: f64, cost: Option<f64>) -> CreatePart {
    CreatePart {
        code: code.to_string(),
        name: format!("Part {code}"),
        category: Some("Electrical".to_string()),
        unit: None,
        stock_qty: Some(stock),
        min_qty: None,
        unit_cost: cost,
        is_active: None,
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn part_create_records_cost(pool: PgPool) {
    let part = InventoryRepo::create_part(&pool, &new_part("P1", 10.0, Some(2.5)))
        .await
        .unwrap();
    assert_eq!(part.stock_qty, 10.0);
    assert_eq!(part.unit, "unit");

    let cost = InventoryRepo::find_cost(&pool, part.id)
        .await
        .unwrap()
        .expect("cost row should exist");
    assert_eq!(cost.unit_cost, 2.5);
    assert_eq!(cost.currency, "USD");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn closing_a_count_adjusts_stock_and_writes_kardex(pool: PgPool) {
    let short = InventoryRepo::create_part(&pool, &new_part("P1", 10.0, None))
        .await
        .unwrap();
    let over = InventoryRepo::create_part(&pool, &new_part("P2", 3.0, None))
        .await
        .unwrap();
    let exact = InventoryRepo::create_part(&pool, &new_part("P3", 5.0, None))
        .await
        .unwrap();

    let doc = InventoryRepo::open_doc(
        &pool,
        &CreateInventoryDoc {
            society_id: None,
            notes: Some("quarterly count".to_string()),
        },
        Some(1),
    )
    .await
    .unwrap();
    assert_eq!(doc.status, "draft");
    assert!(doc.folio.starts_with("INV-"));

    let items = InventoryRepo::set_doc_items(
        &pool,
        doc.id,
        &[
            DocItemInput {
                part_id: short.id,
                counted_qty: 7.0, // 3 short
            },
            DocItemInput {
                part_id: over.id,
                counted_qty: 4.0, // 1 over
            },
            DocItemInput {
                part_id: exact.id,
                counted_qty: 5.0, // unchanged
            },
        ],
    )
    .await
    .unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0].expected_qty, 10.0);

    let report = InventoryRepo::close_doc(&pool, doc.id).await.unwrap();
    assert_eq!(report.items_applied, 3);
    assert_eq!(report.adjustments_in, 1);
    assert_eq!(report.adjustments_out, 1);

    // Stock now matches the counted quantities.
    let short = InventoryRepo::find_part(&pool, short.id).await.unwrap().unwrap();
    assert_eq!(short.stock_qty, 7.0);
    let over = InventoryRepo::find_part(&pool, over.id).await.unwrap().unwrap();
    assert_eq!(over.stock_qty, 4.0);

    // Ledger entries carry the absolute delta and the right direction.
    let ledger = InventoryRepo::list_kardex(&pool, short.id).await.unwrap();
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger[0].direction, KARDEX_OUT);
    assert_eq!(ledger[0].qty, 3.0);
    assert_eq!(ledger[0].reason, REASON_ADJUSTMENT);
    assert_eq!(ledger[0].doc_id, Some(doc.id));

    let ledger = InventoryRepo::list_kardex(&pool, over.id).await.unwrap();
    assert_eq!(ledger[0].direction, KARDEX_IN);
    assert_eq!(ledger[0].qty, 1.0);

    // The unchanged part got no ledger entry.
    let ledger = InventoryRepo::list_kardex(&pool, exact.id).await.unwrap();
    assert!(ledger.is_empty());

    let doc = InventoryRepo::find_doc(&pool, doc.id).await.unwrap().unwrap();
    assert_eq!(doc.status, "closed");
    assert!(doc.closed_at.is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn cancelling_a_draft_leaves_stock_alone(pool: PgPool) {
    let part = InventoryRepo::create_part(&pool, &new_part("P1", 10.0, None))
        .await
        .unwrap();

    let doc = InventoryRepo::open_doc(
        &pool,
        &CreateInventoryDoc {
            society_id: None,
            notes: None,
        },
        None,
    )
    .await
    .unwrap();
    InventoryRepo::set_doc_items(
        &pool,
        doc.id,
        &[DocItemInput {
            part_id: part.id,
            counted_qty: 0.0,
        }],
    )
    .await
    .unwrap();

    let cancelled = InventoryRepo::cancel_doc(&pool, doc.id).await.unwrap().unwrap();
    assert_eq!(cancelled.status, "cancelled");

    let part = InventoryRepo::find_part(&pool, part.id).await.unwrap().unwrap();
    assert_eq!(part.stock_qty, 10.0);
    assert!(InventoryRepo::list_kardex(&pool, part.id)
        .await
        .unwrap()
        .is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn movements_adjust_stock_and_append_ledger(pool: PgPool) {
    let part = InventoryRepo::create_part(&pool, &new_part("P1", 10.0, None))
        .await
        .unwrap();

    let entry = InventoryRepo::record_movement(
        &pool,
        part.id,
        &CreateMovement {
            direction: KARDEX_OUT.to_string(),
            qty: 4.0,
            unit_cost: None,
            ticket_id: None,
        },
        REASON_CONSUMPTION,
    )
    .await
    .unwrap()
    .expect("part exists");
    assert_eq!(entry.direction, "out");
    assert_eq!(entry.reason, REASON_CONSUMPTION);

    let part_after = InventoryRepo::find_part(&pool, part.id).await.unwrap().unwrap();
    assert_eq!(part_after.stock_qty, 6.0);

    // Unknown parts report as missing instead of failing mid-ledger.
    let missing = InventoryRepo::record_movement(
        &pool,
        9999,
        &CreateMovement {
            direction: KARDEX_IN.to_string(),
            qty: 1.0,
            unit_cost: None,
            ticket_id: None,
        },
        REASON_CONSUMPTION,
    )
    .await
    .unwrap();
    assert!(missing.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn parts_with_history_report_their_movement_count(pool: PgPool) {
    let part = InventoryRepo::create_part(&pool, &new_part("P1", 10.0, None))
        .await
        .unwrap();
    assert_eq!(InventoryRepo::count_movements(&pool, part.id).await.unwrap(), 0);

    InventoryRepo::record_movement(
        &pool,
        part.id,
        &CreateMovement {
            direction: KARDEX_OUT.to_string(),
            qty: 1.0,
            unit_cost: None,
            ticket_id: None,
        },
        REASON_CONSUMPTION,
    )
    .await
    .unwrap();

    assert_eq!(InventoryRepo::count_movements(&pool, part.id).await.unwrap(), 1);
}
