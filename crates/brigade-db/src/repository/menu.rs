//! # Menu Repository
//!
//! Database operations for the menu catalog.
//!
//! ## Key Operations
//! - Lookup by id and by id set (order creation resolves all requested
//!   lines in one query)
//! - CRUD with soft delete (`is_active = 0`; historical order items keep
//!   their snapshots)
//! - Stock adjustments (restocking; the guarded sale-time decrement lives
//!   in the order repository's kitchen commit)

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use brigade_core::MenuItem;

/// Columns selected for every MenuItem read, in struct field order.
const MENU_COLUMNS: &str = "id, name, category, price_cents, qty_on_hand, is_active, \
     promo_bps, promo_starts_at, promo_ends_at, created_at, updated_at";

/// Repository for menu catalog operations.
#[derive(Debug, Clone)]
pub struct MenuRepository {
    pool: SqlitePool,
}

impl MenuRepository {
    /// Creates a new MenuRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MenuRepository { pool }
    }

    /// Gets a menu item by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<MenuItem>> {
        let sql = format!("SELECT {MENU_COLUMNS} FROM menu_items WHERE id = ?1");

        let item = sqlx::query_as::<_, MenuItem>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(item)
    }

    /// Gets every menu item whose id appears in `ids`, in one query.
    ///
    /// Missing ids are simply absent from the result; the caller decides
    /// whether that is an error (order validation reports them as
    /// not-found lines).
    pub async fn find_by_ids(&self, ids: &[String]) -> DbResult<Vec<MenuItem>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!("SELECT {MENU_COLUMNS} FROM menu_items WHERE id IN ({placeholders})");

        let mut query = sqlx::query_as::<_, MenuItem>(&sql);
        for id in ids {
            query = query.bind(id);
        }

        let items = query.fetch_all(&self.pool).await?;
        debug!(requested = ids.len(), resolved = items.len(), "Resolved menu items");

        Ok(items)
    }

    /// Lists active menu items, ordered by category then name.
    pub async fn list_active(&self, limit: u32) -> DbResult<Vec<MenuItem>> {
        let sql = format!(
            "SELECT {MENU_COLUMNS} FROM menu_items \
             WHERE is_active = 1 ORDER BY category, name LIMIT ?1"
        );

        let items = sqlx::query_as::<_, MenuItem>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    /// Inserts a new menu item.
    pub async fn insert(&self, item: &MenuItem) -> DbResult<()> {
        debug!(id = %item.id, name = %item.name, "Inserting menu item");

        sqlx::query(
            r#"
            INSERT INTO menu_items (
                id, name, category, price_cents, qty_on_hand, is_active,
                promo_bps, promo_starts_at, promo_ends_at,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&item.id)
        .bind(&item.name)
        .bind(&item.category)
        .bind(item.price_cents)
        .bind(item.qty_on_hand)
        .bind(item.is_active)
        .bind(item.promo_bps)
        .bind(item.promo_starts_at)
        .bind(item.promo_ends_at)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates an existing menu item's editable fields.
    pub async fn update(&self, item: &MenuItem) -> DbResult<()> {
        debug!(id = %item.id, "Updating menu item");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE menu_items SET
                name = ?2,
                category = ?3,
                price_cents = ?4,
                qty_on_hand = ?5,
                is_active = ?6,
                promo_bps = ?7,
                promo_starts_at = ?8,
                promo_ends_at = ?9,
                updated_at = ?10
            WHERE id = ?1
            "#,
        )
        .bind(&item.id)
        .bind(&item.name)
        .bind(&item.category)
        .bind(item.price_cents)
        .bind(item.qty_on_hand)
        .bind(item.is_active)
        .bind(item.promo_bps)
        .bind(item.promo_starts_at)
        .bind(item.promo_ends_at)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("MenuItem", &item.id));
        }

        Ok(())
    }

    /// Adjusts the stock level by a delta (positive for restocking).
    ///
    /// The schema's `qty_on_hand >= 0` CHECK rejects any adjustment that
    /// would take stock negative.
    pub async fn adjust_stock(&self, id: &str, delta: i64) -> DbResult<()> {
        debug!(id = %id, delta = %delta, "Adjusting stock");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE menu_items
            SET qty_on_hand = qty_on_hand + ?2, updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(delta)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("MenuItem", id));
        }

        Ok(())
    }

    /// Sets the active flag (soft delete / reactivation).
    ///
    /// Historical orders keep their snapshots, and a deactivated item can
    /// be restored if it was removed by mistake.
    pub async fn set_active(&self, id: &str, active: bool) -> DbResult<()> {
        debug!(id = %id, active = %active, "Setting menu item active flag");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE menu_items SET is_active = ?2, updated_at = ?3 WHERE id = ?1",
        )
        .bind(id)
        .bind(active)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("MenuItem", id));
        }

        Ok(())
    }

    /// Counts active menu items (for diagnostics and seeding).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM menu_items WHERE is_active = 1")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new menu item ID.
pub fn generate_menu_item_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
