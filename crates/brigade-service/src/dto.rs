//! # Boundary DTOs
//!
//! Request and response shapes at the service boundary. camelCase on the
//! wire; internal domain types never serialize directly to clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use brigade_core::{Order, OrderItem, OrderStatus, PaymentMode, PaymentStatus};

// =============================================================================
// Requests
// =============================================================================

/// One requested line of a new order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderLine {
    pub menu_item_id: String,
    pub quantity: i64,
    /// Free-text customizations ("no onions").
    #[serde(default)]
    pub customizations: Option<String>,
}

/// Input for order creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderRequest {
    pub table_number: i64,
    pub items: Vec<NewOrderLine>,
}

/// Input for scheduling a shift.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewShiftRequest {
    pub staff_id: String,
    pub role: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Input for creating a menu item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMenuItemRequest {
    pub name: String,
    pub category: String,
    pub price_cents: i64,
    pub qty_on_hand: i64,
    #[serde(default)]
    pub promo_bps: Option<u32>,
    #[serde(default)]
    pub promo_starts_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub promo_ends_at: Option<DateTime<Utc>>,
}

/// Partial update for a menu item; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMenuItemRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub price_cents: Option<i64>,
    #[serde(default)]
    pub promo_bps: Option<Option<u32>>,
    #[serde(default)]
    pub promo_starts_at: Option<Option<DateTime<Utc>>>,
    #[serde(default)]
    pub promo_ends_at: Option<Option<DateTime<Utc>>>,
}

// =============================================================================
// Responses
// =============================================================================

/// One line of an order, as returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemView {
    pub id: String,
    pub menu_item_id: String,
    pub name_snapshot: String,
    pub unit_price_cents: i64,
    pub quantity: i64,
    pub percent_off_bps: u32,
    pub line_total_cents: i64,
    pub customizations: Option<String>,
}

impl From<OrderItem> for OrderItemView {
    fn from(item: OrderItem) -> Self {
        OrderItemView {
            id: item.id,
            menu_item_id: item.menu_item_id,
            name_snapshot: item.name_snapshot,
            unit_price_cents: item.unit_price_cents,
            quantity: item.quantity,
            percent_off_bps: item.percent_off_bps,
            line_total_cents: item.line_total_cents,
            customizations: item.customizations,
        }
    }
}

/// Full order representation returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub id: String,
    pub customer_id: String,
    pub table_number: i64,
    pub status: OrderStatus,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub service_charge_cents: i64,
    pub tip_cents: i64,
    pub total_cents: i64,
    pub payment_mode: PaymentMode,
    pub payment_status: PaymentStatus,
    pub placed_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub items: Vec<OrderItemView>,
}

impl OrderView {
    /// Assembles a view from an order and its line items.
    pub fn from_parts(order: Order, items: Vec<OrderItem>) -> Self {
        OrderView {
            id: order.id,
            customer_id: order.customer_id,
            table_number: order.table_number,
            status: order.status,
            subtotal_cents: order.subtotal_cents,
            tax_cents: order.tax_cents,
            service_charge_cents: order.service_charge_cents,
            tip_cents: order.tip_cents,
            total_cents: order.total_cents,
            payment_mode: order.payment_mode,
            payment_status: order.payment_status,
            placed_at: order.placed_at,
            closed_at: order.closed_at,
            items: items.into_iter().map(OrderItemView::from).collect(),
        }
    }
}

/// Lightweight status view; two reads with no mutation in between return
/// identical values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusView {
    pub id: String,
    pub status: OrderStatus,
    pub placed_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Order> for OrderStatusView {
    fn from(order: &Order) -> Self {
        OrderStatusView {
            id: order.id.clone(),
            status: order.status,
            placed_at: order.placed_at,
            closed_at: order.closed_at,
            updated_at: order.updated_at,
        }
    }
}

/// Order list entry (no line items).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub id: String,
    pub customer_id: String,
    pub table_number: i64,
    pub status: OrderStatus,
    pub total_cents: i64,
    pub placed_at: Option<DateTime<Utc>>,
}

impl From<&Order> for OrderSummary {
    fn from(order: &Order) -> Self {
        OrderSummary {
            id: order.id.clone(),
            customer_id: order.customer_id.clone(),
            table_number: order.table_number,
            status: order.status,
            total_cents: order.total_cents,
            placed_at: order.placed_at,
        }
    }
}
