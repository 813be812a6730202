//! # Order Totals Calculator
//!
//! Pure functions computing subtotal, tax and total for an order.
//!
//! ## Contract
//! - subtotal = Σ line totals (for undiscounted lines this is exactly
//!   Σ unit_price × quantity)
//! - tax = subtotal × 8% (fixed dine-in rate), half-up rounding applied
//!   once at the final step, never on intermediates
//! - total = subtotal + tax
//! - empty input → {0, 0, 0}
//!
//! No side effects; calling twice over the same lines yields identical
//! results. Integer-cents arithmetic makes "round to two decimals" exact.

use crate::money::Money;
use crate::types::{OrderItem, TaxRate};
use crate::TAX_RATE_BPS;

// =============================================================================
// Totals
// =============================================================================

/// The computed money breakdown of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OrderTotals {
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
}

impl OrderTotals {
    /// Computes totals from already-computed line totals.
    ///
    /// ## Example
    /// ```rust
    /// use brigade_core::money::Money;
    /// use brigade_core::totals::OrderTotals;
    ///
    /// // Two Margheritas at $12.99
    /// let totals = OrderTotals::from_line_totals([Money::from_cents(2598)]);
    /// assert_eq!(totals.subtotal.cents(), 2598);
    /// assert_eq!(totals.tax.cents(), 208);
    /// assert_eq!(totals.total.cents(), 2806);
    /// ```
    pub fn from_line_totals<I>(line_totals: I) -> Self
    where
        I: IntoIterator<Item = Money>,
    {
        let subtotal = line_totals
            .into_iter()
            .fold(Money::zero(), |acc, line| acc + line);
        let tax = subtotal.calculate_tax(TaxRate::from_bps(TAX_RATE_BPS));

        OrderTotals {
            subtotal,
            tax,
            total: subtotal + tax,
        }
    }

    /// Computes totals over an order's line items.
    pub fn for_items<'a, I>(items: I) -> Self
    where
        I: IntoIterator<Item = &'a OrderItem>,
    {
        Self::from_line_totals(items.into_iter().map(|i| i.line_total()))
    }
}

/// Computes one discounted line total.
///
/// `unit_price × quantity`, reduced by `percent_off_bps` basis points.
/// Zero basis points is the common case and is exact multiplication.
pub fn line_total(unit_price: Money, quantity: i64, percent_off_bps: u32) -> Money {
    let gross = unit_price.multiply_quantity(quantity);
    if percent_off_bps == 0 {
        gross
    } else {
        gross.apply_percentage_discount(percent_off_bps)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn item(unit_price_cents: i64, quantity: i64, percent_off_bps: u32) -> OrderItem {
        let unit_price = Money::from_cents(unit_price_cents);
        OrderItem {
            id: "line-1".to_string(),
            order_id: "order-1".to_string(),
            menu_item_id: "item-1".to_string(),
            name_snapshot: "Test Dish".to_string(),
            unit_price_cents,
            quantity,
            percent_off_bps,
            line_total_cents: line_total(unit_price, quantity, percent_off_bps).cents(),
            customizations: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_order_is_all_zeroes() {
        let totals = OrderTotals::from_line_totals([]);
        assert_eq!(totals.subtotal, Money::zero());
        assert_eq!(totals.tax, Money::zero());
        assert_eq!(totals.total, Money::zero());
    }

    /// The worked example: 2 × $12.99 → $25.98 / $2.08 / $28.06.
    #[test]
    fn test_worked_example() {
        let items = [item(1299, 2, 0)];
        let totals = OrderTotals::for_items(&items);

        assert_eq!(totals.subtotal.cents(), 2598);
        assert_eq!(totals.tax.cents(), 208);
        assert_eq!(totals.total.cents(), 2806);
    }

    /// total == subtotal + tax and tax == half_up(subtotal × 8%), for a
    /// spread of item lists.
    #[test]
    fn test_totals_algebra() {
        let cases: &[&[(i64, i64)]] = &[
            &[(100, 1)],
            &[(1299, 2), (450, 3)],
            &[(999, 1), (999, 1), (1, 7)],
            &[(12_345, 9), (1, 1)],
        ];

        for lines in cases {
            let items: Vec<OrderItem> =
                lines.iter().map(|&(price, qty)| item(price, qty, 0)).collect();
            let totals = OrderTotals::for_items(&items);

            let subtotal: i64 = lines.iter().map(|&(price, qty)| price * qty).sum();
            let expected_tax = (subtotal as i128 * 800 + 5000) / 10000;

            assert_eq!(totals.subtotal.cents(), subtotal);
            assert_eq!(totals.tax.cents(), expected_tax as i64);
            assert_eq!(totals.total.cents(), totals.subtotal.cents() + totals.tax.cents());
        }
    }

    #[test]
    fn test_discounted_line_feeds_subtotal() {
        // $20.00 × 1 at 15% off → $17.00 line total
        let items = [item(2000, 1, 1500)];
        let totals = OrderTotals::for_items(&items);

        assert_eq!(totals.subtotal.cents(), 1700);
        assert_eq!(totals.total.cents(), totals.subtotal.cents() + totals.tax.cents());
    }

    #[test]
    fn test_idempotent() {
        let items = [item(1299, 2, 0), item(450, 1, 0)];
        let first = OrderTotals::for_items(&items);
        let second = OrderTotals::for_items(&items);
        assert_eq!(first, second);
    }

    #[test]
    fn test_line_total_discount() {
        assert_eq!(line_total(Money::from_cents(2000), 1, 1500).cents(), 1700);
        assert_eq!(line_total(Money::from_cents(1299), 2, 0).cents(), 2598);
    }
}
