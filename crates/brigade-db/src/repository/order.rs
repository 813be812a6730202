//! # Order Repository
//!
//! Database operations for orders and their line items.
//!
//! ## Write Discipline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Order Write Paths                                │
//! │                                                                     │
//! │  1. CREATE                                                          │
//! │     insert_order_with_items() - order + every item + totals in ONE  │
//! │     transaction. A draft with zero items is unrepresentable.        │
//! │                                                                     │
//! │  2. PLACE                                                           │
//! │     mark_placed() - guarded UPDATE (WHERE status = 'draft')         │
//! │                                                                     │
//! │  3. KITCHEN COMMIT                                                  │
//! │     send_to_kitchen() - one transaction holding BOTH the status     │
//! │     change (WHERE status = 'placed') and every stock decrement      │
//! │     (WHERE qty_on_hand >= ?). Two racing calls: one commits, the    │
//! │     other sees StatusConflict. Stock is decremented exactly once.   │
//! │                                                                     │
//! │  4. LATER TRANSITIONS                                               │
//! │     update_status() - guarded UPDATE (WHERE status = <from>)        │
//! │                                                                     │
//! │  5. DRAFT PURGE                                                     │
//! │     purge_stale_drafts() - DELETE; items go via FK cascade          │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::DbResult;
use brigade_core::{Order, OrderItem, OrderStatus};

/// Columns selected for every Order read, in struct field order.
const ORDER_COLUMNS: &str = "id, customer_id, table_number, status, subtotal_cents, tax_cents, \
     service_charge_cents, tip_cents, total_cents, payment_mode, payment_status, \
     placed_at, closed_at, created_at, updated_at";

/// Columns selected for every OrderItem read, in struct field order.
const ORDER_ITEM_COLUMNS: &str = "id, order_id, menu_item_id, name_snapshot, unit_price_cents, \
     quantity, percent_off_bps, line_total_cents, customizations, created_at";

/// One line of a kitchen commit: which menu item to decrement and by how
/// much. `name` rides along purely for error messages.
#[derive(Debug, Clone)]
pub struct KitchenLine {
    pub menu_item_id: String,
    pub name: String,
    pub quantity: i64,
}

/// Outcome of the transactional kitchen commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KitchenCommit {
    /// Status moved to in_kitchen and every line's stock was decremented.
    Committed,
    /// The order was no longer in `placed` (concurrent transition won).
    StatusConflict,
    /// A stock row could not cover its line; nothing was written.
    OutOfStock {
        name: String,
        available: i64,
        requested: i64,
    },
}

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Inserts an order together with all of its line items in one
    /// transaction.
    ///
    /// Either the order, every item and the totals land together, or
    /// nothing does - a partial order can never be observed.
    pub async fn insert_order_with_items(
        &self,
        order: &Order,
        items: &[OrderItem],
    ) -> DbResult<()> {
        debug!(id = %order.id, items = items.len(), "Inserting order with items");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO orders (
                id, customer_id, table_number, status,
                subtotal_cents, tax_cents, service_charge_cents, tip_cents, total_cents,
                payment_mode, payment_status,
                placed_at, closed_at, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
            "#,
        )
        .bind(&order.id)
        .bind(&order.customer_id)
        .bind(order.table_number)
        .bind(order.status)
        .bind(order.subtotal_cents)
        .bind(order.tax_cents)
        .bind(order.service_charge_cents)
        .bind(order.tip_cents)
        .bind(order.total_cents)
        .bind(order.payment_mode)
        .bind(order.payment_status)
        .bind(order.placed_at)
        .bind(order.closed_at)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&mut *tx)
        .await?;

        for item in items {
            sqlx::query(
                r#"
                INSERT INTO order_items (
                    id, order_id, menu_item_id, name_snapshot, unit_price_cents,
                    quantity, percent_off_bps, line_total_cents, customizations, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                "#,
            )
            .bind(&item.id)
            .bind(&item.order_id)
            .bind(&item.menu_item_id)
            .bind(&item.name_snapshot)
            .bind(item.unit_price_cents)
            .bind(item.quantity)
            .bind(item.percent_off_bps)
            .bind(item.line_total_cents)
            .bind(&item.customizations)
            .bind(item.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    /// Gets an order by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?1");

        let order = sqlx::query_as::<_, Order>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(order)
    }

    /// Gets all line items for an order.
    pub async fn get_items(&self, order_id: &str) -> DbResult<Vec<OrderItem>> {
        let sql = format!(
            "SELECT {ORDER_ITEM_COLUMNS} FROM order_items \
             WHERE order_id = ?1 ORDER BY created_at, id"
        );

        let items = sqlx::query_as::<_, OrderItem>(&sql)
            .bind(order_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    /// Stamps a draft order as placed.
    ///
    /// Guarded by `status = 'draft'`; returns false when the guard matched
    /// nothing (missing order, or already placed by a concurrent call).
    pub async fn mark_placed(&self, order_id: &str, placed_at: DateTime<Utc>) -> DbResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE orders SET
                status = 'placed',
                placed_at = ?2,
                updated_at = ?2
            WHERE id = ?1 AND status = 'draft'
            "#,
        )
        .bind(order_id)
        .bind(placed_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Applies a status transition with a compare-and-swap guard on the
    /// previous status. Stamps `closed_at` when given.
    ///
    /// Returns false when the guard matched nothing - the caller lost a
    /// race and should re-read the order.
    pub async fn update_status(
        &self,
        order_id: &str,
        from: OrderStatus,
        to: OrderStatus,
        closed_at: Option<DateTime<Utc>>,
    ) -> DbResult<bool> {
        debug!(id = %order_id, from = %from, to = %to, "Updating order status");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE orders SET
                status = ?3,
                closed_at = COALESCE(?4, closed_at),
                updated_at = ?5
            WHERE id = ?1 AND status = ?2
            "#,
        )
        .bind(order_id)
        .bind(from)
        .bind(to)
        .bind(closed_at)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Moves a placed order into the kitchen and commits its stock, all in
    /// one transaction.
    ///
    /// Both UPDATEs are guarded: the status row with `status = 'placed'`,
    /// each stock row with `qty_on_hand >= quantity`. Any guard failure
    /// rolls the whole transaction back, so inventory is decremented
    /// exactly once per order or not at all.
    pub async fn send_to_kitchen(
        &self,
        order_id: &str,
        lines: &[KitchenLine],
    ) -> DbResult<KitchenCommit> {
        debug!(id = %order_id, lines = lines.len(), "Committing order to kitchen");

        let mut tx = self.pool.begin().await?;

        let now = Utc::now();

        let status_update = sqlx::query(
            r#"
            UPDATE orders SET status = 'in_kitchen', updated_at = ?2
            WHERE id = ?1 AND status = 'placed'
            "#,
        )
        .bind(order_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        if status_update.rows_affected() == 0 {
            // Dropping the transaction rolls it back.
            return Ok(KitchenCommit::StatusConflict);
        }

        for line in lines {
            let decrement = sqlx::query(
                r#"
                UPDATE menu_items
                SET qty_on_hand = qty_on_hand - ?2, updated_at = ?3
                WHERE id = ?1 AND qty_on_hand >= ?2
                "#,
            )
            .bind(&line.menu_item_id)
            .bind(line.quantity)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            if decrement.rows_affected() == 0 {
                let available: i64 =
                    sqlx::query_scalar("SELECT qty_on_hand FROM menu_items WHERE id = ?1")
                        .bind(&line.menu_item_id)
                        .fetch_optional(&mut *tx)
                        .await?
                        .unwrap_or(0);

                return Ok(KitchenCommit::OutOfStock {
                    name: line.name.clone(),
                    available,
                    requested: line.quantity,
                });
            }
        }

        tx.commit().await?;

        info!(id = %order_id, "Order committed to kitchen");
        Ok(KitchenCommit::Committed)
    }

    /// Deletes draft orders created before `cutoff`; their line items go
    /// via the FK cascade. Returns the number of orders purged.
    pub async fn purge_stale_drafts(&self, cutoff: DateTime<Utc>) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM orders WHERE status = 'draft' AND created_at < ?1")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;

        let purged = result.rows_affected();
        if purged > 0 {
            info!(purged = purged, "Purged stale draft orders");
        }

        Ok(purged)
    }

    /// Lists a customer's orders, newest first.
    pub async fn list_by_customer(&self, customer_id: &str, limit: u32) -> DbResult<Vec<Order>> {
        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM orders \
             WHERE customer_id = ?1 ORDER BY created_at DESC LIMIT ?2"
        );

        let orders = sqlx::query_as::<_, Order>(&sql)
            .bind(customer_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(orders)
    }

    /// Lists orders in a given status, oldest first (kitchen queue order).
    pub async fn list_by_status(&self, status: OrderStatus, limit: u32) -> DbResult<Vec<Order>> {
        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM orders \
             WHERE status = ?1 ORDER BY created_at LIMIT ?2"
        );

        let orders = sqlx::query_as::<_, Order>(&sql)
            .bind(status)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(orders)
    }
}

/// Helper to generate a new order ID.
pub fn generate_order_id() -> String {
    Uuid::new_v4().to_string()
}

/// Helper to generate a new order item ID.
pub fn generate_order_item_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
