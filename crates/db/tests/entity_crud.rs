//! Integration tests for the repository layer.
//!
//! Exercises repositories against a real database:
//! - CRUD round trips and list filters
//! - Unique and foreign key constraint behaviour
//! - Permission sync and role assignment

use assert_matches::assert_matches;
use sqlx::PgPool;

use mainstay_db::models::asset::{AssetSearchParams, CreateAsset};
use mainstay_db::models::asset_category::CreateAssetCategory;
use mainstay_db::models::location::{CreateLocation, LocationListParams, UpdateLocation};
use mainstay_db::models::role::CreateRole;
use mainstay_db::repositories::{
    AssetCategoryRepo, AssetRepo, LocationRepo, PermissionRepo, RoleRepo,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_location(code: &str, name: &str) -> CreateLocation {
    CreateLocation {
        code: code.to_string(),
        name: name.to_string(),
        description: None,
        is_active: None,
    }
}

fn new_category(code: &str, name: &str) -> CreateAssetCategory {
    CreateAssetCategory {
        code: code.to_string(),
        name: name.to_string(),
        description: None,
        is_active: None,
    }
}

fn new_asset(code: &str, location_id: i64, category_id: i64) -> CreateAsset {
    CreateAsset {
        code: code.to_string(),
        name: format!("Asset {code}"),
        description: None,
        location_id,
        category_id,
        serial_number: None,
        purchase_date: None,
        is_active: None,
    }
}

fn all_locations() -> LocationListParams {
    LocationListParams {
        include_inactive: true,
        search: None,
    }
}

// ---------------------------------------------------------------------------
// Locations
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn location_crud_round_trip(pool: PgPool) {
    let created = LocationRepo::create(&pool, &new_location("B1", "Block B"))
        .await
        .unwrap();
    assert!(created.is_active);
    assert_eq!(created.code, "B1");

    let fetched = LocationRepo::find_by_id(&pool, created.id)
        .await
        .unwrap()
        .expect("location should exist");
    assert_eq!(fetched.name, "Block B");

    let updated = LocationRepo::update(
        &pool,
        created.id,
        &UpdateLocation {
            code: None,
            name: Some("Block B2".to_string()),
            description: Some("annex".to_string()),
        },
    )
    .await
    .unwrap()
    .expect("update should return the row");
    assert_eq!(updated.name, "Block B2");
    assert_eq!(updated.code, "B1");
    assert!(updated.updated_at >= created.updated_at);

    let toggled = LocationRepo::toggle_active(&pool, created.id)
        .await
        .unwrap()
        .unwrap();
    assert!(!toggled.is_active);

    assert!(LocationRepo::delete(&pool, created.id).await.unwrap());
    assert!(LocationRepo::find_by_id(&pool, created.id)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn location_list_filters(pool: PgPool) {
    LocationRepo::create(&pool, &new_location("B1", "Block B"))
        .await
        .unwrap();
    let hidden = LocationRepo::create(&pool, &new_location("B2", "Old tower"))
        .await
        .unwrap();
    LocationRepo::toggle_active(&pool, hidden.id).await.unwrap();

    let visible = LocationRepo::list(
        &pool,
        &LocationListParams {
            include_inactive: false,
            search: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(visible.len(), 1);

    let all = LocationRepo::list(&pool, &all_locations()).await.unwrap();
    assert_eq!(all.len(), 2);

    let searched = LocationRepo::list(
        &pool,
        &LocationListParams {
            include_inactive: true,
            search: Some("tower".to_string()),
        },
    )
    .await
    .unwrap();
    assert_eq!(searched.len(), 1);
    assert_eq!(searched[0].code, "B2");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_location_code_is_a_unique_violation(pool: PgPool) {
    LocationRepo::create(&pool, &new_location("B1", "Block B"))
        .await
        .unwrap();

    let err = LocationRepo::create(&pool, &new_location("B1", "Other"))
        .await
        .unwrap_err();

    match err {
        sqlx::Error::Database(db_err) => {
            assert_eq!(db_err.code().as_deref(), Some("23505"));
            assert_eq!(db_err.constraint(), Some("uq_locations_code"));
        }
        other => panic!("expected a database error, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Assets
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn asset_search_resolves_reference_names(pool: PgPool) {
    let location = LocationRepo::create(&pool, &new_location("L1", "Roof"))
        .await
        .unwrap();
    let category = AssetCategoryRepo::create(&pool, &new_category("HVAC", "Climate"))
        .await
        .unwrap();

    AssetRepo::create(&pool, &new_asset("AC-01", location.id, category.id))
        .await
        .unwrap();

    let rows = AssetRepo::search(
        &pool,
        &AssetSearchParams {
            search: Some("AC".to_string()),
            location_id: Some(location.id),
            category_id: None,
            include_inactive: false,
            limit: None,
            offset: None,
        },
    )
    .await
    .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].location_name, "Roof");
    assert_eq!(rows[0].category_name, "Climate");
    assert_eq!(rows[0].open_ticket_count, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn asset_with_missing_refs_is_a_fk_violation(pool: PgPool) {
    let err = AssetRepo::create(&pool, &new_asset("AC-01", 9999, 9999))
        .await
        .unwrap_err();

    assert_matches!(
        err,
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23503")
    );
}

// ---------------------------------------------------------------------------
// RBAC
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn permission_sync_upserts_the_catalog(pool: PgPool) {
    // The migrations seed the full catalog, so a fresh sync only updates.
    let report = PermissionRepo::sync(&pool).await.unwrap();
    assert_eq!(report.inserted, 0);
    assert_eq!(report.updated, report.total);

    sqlx::query("DELETE FROM permissions WHERE code = 'assets.manage'")
        .execute(&pool)
        .await
        .unwrap();

    let report = PermissionRepo::sync(&pool).await.unwrap();
    assert_eq!(report.inserted, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn role_permission_assignment_replaces_atomically(pool: PgPool) {
    let role = RoleRepo::create(
        &pool,
        &CreateRole {
            name: "auditor".to_string(),
            description: None,
        },
    )
    .await
    .unwrap();

    let catalog = PermissionRepo::list(&pool).await.unwrap();
    assert!(!catalog.is_empty());

    let first_two: Vec<i64> = catalog.iter().take(2).map(|p| p.id).collect();
    PermissionRepo::set_for_role(&pool, role.id, &first_two)
        .await
        .unwrap();
    assert_eq!(
        PermissionRepo::list_for_role(&pool, role.id).await.unwrap().len(),
        2
    );

    // Replacing with a different single permission drops the old pair.
    let last: Vec<i64> = catalog.iter().rev().take(1).map(|p| p.id).collect();
    PermissionRepo::set_for_role(&pool, role.id, &last)
        .await
        .unwrap();

    let assigned = PermissionRepo::list_for_role(&pool, role.id).await.unwrap();
    assert_eq!(assigned.len(), 1);
    assert_eq!(assigned[0].id, last[0]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn role_has_permission_checks_by_code(pool: PgPool) {
    assert!(
        PermissionRepo::role_has_permission(&pool, "technician", "tickets.view")
            .await
            .unwrap()
    );
    assert!(
        !PermissionRepo::role_has_permission(&pool, "technician", "reports.view")
            .await
            .unwrap()
    );
    assert!(
        !PermissionRepo::role_has_permission(&pool, "ghost-role", "tickets.view")
            .await
            .unwrap()
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn seeded_users_hold_seeded_roles(pool: PgPool) {
    let technician = RoleRepo::find_by_name(&pool, "technician")
        .await
        .unwrap()
        .expect("seeded role");
    assert_eq!(RoleRepo::count_users(&pool, technician.id).await.unwrap(), 1);
}
