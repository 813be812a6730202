//! # Validation Module
//!
//! Business-rule validation for Brigade.
//!
//! ## Two Kinds of Validation
//!
//! - **Order line validation** ([`validate_order_line`]): runs EVERY check
//!   and collects the failures as human-readable messages. Nothing
//!   short-circuits, so the caller can report a complete summary to the
//!   client in one round trip instead of one failure per resubmission.
//! - **Field validation** (`validate_*` functions): early single-field
//!   checks returning a typed [`ValidationError`], applied by the services
//!   before any storage work happens.

use crate::error::ValidationError;
use crate::types::MenuItem;
use crate::MAX_LINE_QUANTITY;

/// Result type for field validation.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Order Line Validation
// =============================================================================

/// Outcome of validating one requested order line against its menu item.
#[derive(Debug, Clone, Default)]
pub struct LineValidation {
    /// Human-readable failure messages; empty means the line is valid.
    pub errors: Vec<String>,
}

impl LineValidation {
    /// True when every check passed.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validates a requested `{menu_item, quantity}` line.
///
/// All checks run independently; failures accumulate:
/// - quantity must be a positive number (and within the per-line cap)
/// - the item must have any stock at all
/// - the requested quantity must not exceed the stock on hand
/// - the item must be active
/// - the item's price must be non-negative
///
/// ## Example
/// ```rust
/// use brigade_core::validation::validate_order_line;
/// # use brigade_core::types::MenuItem;
/// # use chrono::Utc;
/// # let now = Utc::now();
/// # let sold_out = MenuItem {
/// #     id: "i".into(), name: "Tiramisu".into(), category: "desserts".into(),
/// #     price_cents: 850, qty_on_hand: 0, is_active: true,
/// #     promo_bps: None, promo_starts_at: None, promo_ends_at: None,
/// #     created_at: now, updated_at: now,
/// # };
/// let result = validate_order_line(&sold_out, 2);
/// assert!(!result.is_valid());
/// assert!(result.errors.iter().any(|e| e.contains("not available")));
/// ```
pub fn validate_order_line(item: &MenuItem, quantity: i64) -> LineValidation {
    let mut errors = Vec::new();

    if quantity <= 0 {
        errors.push(format!(
            "Quantity for {} must be a positive number",
            item.name
        ));
    } else if quantity > MAX_LINE_QUANTITY {
        errors.push(format!(
            "Quantity {} for {} exceeds the maximum of {}",
            quantity, item.name, MAX_LINE_QUANTITY
        ));
    }

    // Reported whenever the shelf is empty, regardless of the requested
    // quantity.
    if !item.is_in_stock() {
        errors.push(format!("{} is not available", item.name));
    }

    if quantity > 0 && quantity > item.qty_on_hand {
        errors.push(format!(
            "Insufficient stock for {}: available {}, requested {}",
            item.name, item.qty_on_hand, quantity
        ));
    }

    if !item.is_active {
        errors.push(format!("{} is not currently on the menu", item.name));
    }

    if item.price_cents < 0 {
        errors.push(format!("{} has an invalid price", item.name));
    }

    LineValidation { errors }
}

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a table number.
///
/// ## Rules
/// - Must be positive
/// - Must not exceed 500 (largest dining room we serve)
pub fn validate_table_number(table: i64) -> ValidationResult<()> {
    if table <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "table_number".to_string(),
        });
    }

    if table > 500 {
        return Err(ValidationError::OutOfRange {
            field: "table_number".to_string(),
            min: 1,
            max: 500,
        });
    }

    Ok(())
}

/// Validates a menu item name.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 200 characters
pub fn validate_menu_item_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a price in cents.
///
/// Zero is allowed (comped items); negative is not.
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a promotional discount in basis points (0% to 100%).
pub fn validate_promo_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "promo_bps".to_string(),
            min: 0,
            max: 10000,
        });
    }

    Ok(())
}

/// Validates a UUID string format.
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

/// Validates a shift window (end strictly after start).
pub fn validate_shift_window(
    starts_at: chrono::DateTime<chrono::Utc>,
    ends_at: chrono::DateTime<chrono::Utc>,
) -> ValidationResult<()> {
    if ends_at <= starts_at {
        return Err(ValidationError::InvalidFormat {
            field: "ends_at".to_string(),
            reason: "must be after starts_at".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn menu_item(price_cents: i64, qty_on_hand: i64, is_active: bool) -> MenuItem {
        let now = Utc::now();
        MenuItem {
            id: "item-1".to_string(),
            name: "Carbonara".to_string(),
            category: "mains".to_string(),
            price_cents,
            qty_on_hand,
            is_active,
            promo_bps: None,
            promo_starts_at: None,
            promo_ends_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_valid_line() {
        let item = menu_item(1450, 10, true);
        assert!(validate_order_line(&item, 2).is_valid());
    }

    /// With zero stock, "not available" is reported no matter the quantity.
    #[test]
    fn test_out_of_stock_always_reported() {
        let item = menu_item(1450, 0, true);

        for qty in [1, 5, 99, -1, 0] {
            let result = validate_order_line(&item, qty);
            assert!(
                result.errors.iter().any(|e| e.contains("not available")),
                "qty {qty} should report not available: {:?}",
                result.errors
            );
        }
    }

    /// The insufficient-stock message carries both numbers.
    #[test]
    fn test_insufficient_stock_names_both_numbers() {
        let item = menu_item(1450, 3, true);
        let result = validate_order_line(&item, 5);

        assert!(!result.is_valid());
        assert!(result
            .errors
            .iter()
            .any(|e| e.contains("available 3") && e.contains("requested 5")));
    }

    /// Checks do not short-circuit: an inactive, sold-out item with a bad
    /// quantity reports every failure at once.
    #[test]
    fn test_all_checks_run() {
        let item = menu_item(-100, 0, false);
        let result = validate_order_line(&item, 0);

        let joined = result.errors.join("; ");
        assert!(joined.contains("positive"), "{joined}");
        assert!(joined.contains("not available"), "{joined}");
        assert!(joined.contains("not currently on the menu"), "{joined}");
        assert!(joined.contains("invalid price"), "{joined}");
    }

    #[test]
    fn test_quantity_bounds() {
        let item = menu_item(1450, 1000, true);

        assert!(!validate_order_line(&item, 0).is_valid());
        assert!(!validate_order_line(&item, -3).is_valid());
        assert!(!validate_order_line(&item, MAX_LINE_QUANTITY + 1).is_valid());
        assert!(validate_order_line(&item, MAX_LINE_QUANTITY).is_valid());
    }

    #[test]
    fn test_validate_table_number() {
        assert!(validate_table_number(1).is_ok());
        assert!(validate_table_number(500).is_ok());
        assert!(validate_table_number(0).is_err());
        assert!(validate_table_number(-4).is_err());
        assert!(validate_table_number(501).is_err());
    }

    #[test]
    fn test_validate_menu_item_name() {
        assert!(validate_menu_item_name("Margherita").is_ok());
        assert!(validate_menu_item_name("").is_err());
        assert!(validate_menu_item_name("   ").is_err());
        assert!(validate_menu_item_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(1299).is_ok());
        assert!(validate_price_cents(-1).is_err());
    }

    #[test]
    fn test_validate_promo_bps() {
        assert!(validate_promo_bps(0).is_ok());
        assert!(validate_promo_bps(1500).is_ok());
        assert!(validate_promo_bps(10001).is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("").is_err());
        assert!(validate_uuid("not-a-uuid").is_err());
    }

    #[test]
    fn test_validate_shift_window() {
        let now = Utc::now();
        assert!(validate_shift_window(now, now + chrono::Duration::hours(8)).is_ok());
        assert!(validate_shift_window(now, now).is_err());
        assert!(validate_shift_window(now, now - chrono::Duration::hours(1)).is_err());
    }
}
