//! # Domain Types
//!
//! Core domain types used throughout Brigade.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                │
//! │                                                                     │
//! │  ┌───────────────┐   ┌───────────────┐   ┌───────────────┐          │
//! │  │   MenuItem    │   │     Order     │   │   OrderItem   │          │
//! │  │  ───────────  │   │  ───────────  │   │  ───────────  │          │
//! │  │  id (UUID)    │   │  id (UUID)    │   │  id (UUID)    │          │
//! │  │  price_cents  │   │  status       │   │  name_snapshot│          │
//! │  │  qty_on_hand  │   │  total_cents  │   │  unit_price   │          │
//! │  │  promo window │   │  table_number │   │  quantity     │          │
//! │  └───────────────┘   └───────────────┘   └───────────────┘          │
//! │                                                                     │
//! │  ┌───────────────┐   ┌───────────────┐   ┌───────────────┐          │
//! │  │    TaxRate    │   │  OrderStatus  │   │     Shift     │          │
//! │  │  bps (u32)    │   │  Draft..Closed│   │  scheduling   │          │
//! │  └───────────────┘   └───────────────┘   └───────────────┘          │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pricing
//! An [`OrderItem`] freezes the menu item's name and unit price at order
//! time. Later catalog edits never retroactively change historical orders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::money::Money;
use crate::policy::Role;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01% = 1/10000; 800 bps = the fixed 8% dine-in rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Menu Item
// =============================================================================

/// An item on the menu, available for ordering.
///
/// Invariants: `price_cents >= 0`, `qty_on_hand >= 0`. Stock is only
/// decremented at kitchen entry, never at order creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct MenuItem {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown to customers and on tickets.
    pub name: String,

    /// Menu section (e.g. "mains", "drinks", "desserts").
    pub category: String,

    /// Price in cents.
    pub price_cents: i64,

    /// Current stock level.
    pub qty_on_hand: i64,

    /// Whether the item is orderable (soft delete).
    pub is_active: bool,

    /// Promotional discount in basis points, if a promotion is configured.
    pub promo_bps: Option<u32>,

    /// Start of the promotional window.
    pub promo_starts_at: Option<DateTime<Utc>>,

    /// End of the promotional window.
    pub promo_ends_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MenuItem {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Returns the discount in effect at `now`, in basis points.
    ///
    /// Zero unless a promotion is configured and `now` falls inside its
    /// window. Open-ended bounds are treated as always-started /
    /// never-ending respectively.
    pub fn active_promo_bps(&self, now: DateTime<Utc>) -> u32 {
        let Some(bps) = self.promo_bps else {
            return 0;
        };
        if let Some(starts) = self.promo_starts_at {
            if now < starts {
                return 0;
            }
        }
        if let Some(ends) = self.promo_ends_at {
            if now > ends {
                return 0;
            }
        }
        bps
    }

    /// Checks if there is any stock at all.
    #[inline]
    pub fn is_in_stock(&self) -> bool {
        self.qty_on_hand > 0
    }

    /// Checks whether the requested quantity can be fulfilled from stock.
    #[inline]
    pub fn can_fulfill(&self, quantity: i64) -> bool {
        self.qty_on_hand >= quantity
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// The status of an order in its lifecycle.
///
/// Legal transitions live in [`crate::lifecycle`]; everything else mutates
/// orders through that table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Being assembled; fleeting, observable only on failure paths.
    Draft,
    /// Accepted from the customer; awaiting the kitchen.
    Placed,
    /// Being prepared; stock was committed on entry.
    InKitchen,
    /// Prepared and waiting to be run to the table.
    Ready,
    /// Delivered to the table.
    Served,
    /// Paid and archived (terminal).
    Closed,
    /// Abandoned before the kitchen (terminal).
    Cancelled,
}

impl OrderStatus {
    /// Stable lowercase name, matching the stored representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Draft => "draft",
            OrderStatus::Placed => "placed",
            OrderStatus::InKitchen => "in_kitchen",
            OrderStatus::Ready => "ready",
            OrderStatus::Served => "served",
            OrderStatus::Closed => "closed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Draft
    }
}

// =============================================================================
// Payment
// =============================================================================

/// How the customer intends to settle the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum PaymentMode {
    /// Physical cash at the table or counter.
    Cash,
    /// Card on an external terminal.
    Card,
}

impl Default for PaymentMode {
    fn default() -> Self {
        PaymentMode::Cash
    }
}

/// Settlement state of the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Unpaid,
    Paid,
    Refunded,
}

impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus::Unpaid
    }
}

// =============================================================================
// Order
// =============================================================================

/// A customer order for one table.
///
/// Invariant: `total_cents = subtotal_cents + tax_cents +
/// service_charge_cents + tip_cents`. Only the lifecycle controller
/// mutates an order after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Order {
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
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Returns the grand total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Checks whether the order has reached a terminal status.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self.status, OrderStatus::Closed | OrderStatus::Cancelled)
    }
}

// =============================================================================
// Order Item
// =============================================================================

/// A line item in an order.
/// Uses the snapshot pattern to freeze menu data at order time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: String,
    pub order_id: String,
    pub menu_item_id: String,
    /// Menu item name at order time (frozen).
    pub name_snapshot: String,
    /// Unit price in cents at order time (frozen).
    pub unit_price_cents: i64,
    /// Quantity ordered.
    pub quantity: i64,
    /// Promotional discount applied to this line, in basis points.
    pub percent_off_bps: u32,
    /// Discounted line total: unit_price × quantity × (1 − percent_off).
    pub line_total_cents: i64,
    /// Free-text customizations from the customer ("no onions").
    pub customizations: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl OrderItem {
    /// Returns the frozen unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the discounted line total as Money.
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.line_total_cents)
    }
}

// =============================================================================
// User
// =============================================================================

/// A user of the system; customers and staff share this type.
///
/// Role membership drives the access policy (see [`crate::policy`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub roles: Vec<Role>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Shift
// =============================================================================

/// The status of a staff shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum ShiftStatus {
    Scheduled,
    CheckedIn,
    Completed,
    Cancelled,
}

impl ShiftStatus {
    /// Stable lowercase name, matching the stored representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ShiftStatus::Scheduled => "scheduled",
            ShiftStatus::CheckedIn => "checked_in",
            ShiftStatus::Completed => "completed",
            ShiftStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ShiftStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for ShiftStatus {
    fn default() -> Self {
        ShiftStatus::Scheduled
    }
}

/// A scheduled block of work for one staff member.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Shift {
    pub id: String,
    pub staff_id: String,
    /// The role worked during this shift ("server", "line cook", ...).
    pub role: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub status: ShiftStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn menu_item() -> MenuItem {
        let now = Utc::now();
        MenuItem {
            id: "item-1".to_string(),
            name: "Margherita".to_string(),
            category: "mains".to_string(),
            price_cents: 1299,
            qty_on_hand: 10,
            is_active: true,
            promo_bps: None,
            promo_starts_at: None,
            promo_ends_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_stock_checks() {
        let mut item = menu_item();
        assert!(item.is_in_stock());
        assert!(item.can_fulfill(10));
        assert!(!item.can_fulfill(11));

        item.qty_on_hand = 0;
        assert!(!item.is_in_stock());
        assert!(!item.can_fulfill(1));
    }

    #[test]
    fn test_promo_window() {
        let now = Utc::now();
        let mut item = menu_item();

        // No promotion configured
        assert_eq!(item.active_promo_bps(now), 0);

        // Inside the window
        item.promo_bps = Some(1500);
        item.promo_starts_at = Some(now - Duration::hours(1));
        item.promo_ends_at = Some(now + Duration::hours(1));
        assert_eq!(item.active_promo_bps(now), 1500);

        // Before the window
        assert_eq!(item.active_promo_bps(now - Duration::hours(2)), 0);

        // After the window
        assert_eq!(item.active_promo_bps(now + Duration::hours(2)), 0);

        // Open-ended window
        item.promo_starts_at = None;
        item.promo_ends_at = None;
        assert_eq!(item.active_promo_bps(now), 1500);
    }

    #[test]
    fn test_order_status_names() {
        assert_eq!(OrderStatus::InKitchen.to_string(), "in_kitchen");
        assert_eq!(OrderStatus::Placed.to_string(), "placed");
        assert_eq!(OrderStatus::default(), OrderStatus::Draft);
    }

    #[test]
    fn test_payment_defaults() {
        assert_eq!(PaymentMode::default(), PaymentMode::Cash);
        assert_eq!(PaymentStatus::default(), PaymentStatus::Unpaid);
    }

    #[test]
    fn test_shift_status_names() {
        assert_eq!(ShiftStatus::CheckedIn.to_string(), "checked_in");
        assert_eq!(ShiftStatus::default(), ShiftStatus::Scheduled);
    }
}
