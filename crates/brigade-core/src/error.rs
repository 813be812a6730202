//! # Error Types
//!
//! Domain-specific error types for brigade-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                 │
//! │                                                                     │
//! │  brigade-core errors (this file)                                    │
//! │  ├── CoreError        - Domain rule violations                      │
//! │  └── ValidationError  - Input validation failures                   │
//! │                                                                     │
//! │  brigade-db errors (separate crate)                                 │
//! │  └── DbError          - Database operation failures                 │
//! │                                                                     │
//! │  brigade-service errors                                             │
//! │  └── ServiceError     - What callers see (Validation/NotFound/      │
//! │                         Authorization/Transition/Internal)          │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. `thiserror` derives, never manual impls
//! 2. Context in every message (ids, names, both states of a transition)
//! 3. Errors are enum variants, never bare strings

use thiserror::Error;

use crate::policy::Action;
use crate::types::{OrderStatus, ShiftStatus};

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Menu item cannot be found.
    #[error("Menu item not found: {0}")]
    MenuItemNotFound(String),

    /// Order cannot be found.
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// Insufficient stock to commit an order line to the kitchen.
    ///
    /// The message carries both numbers so the caller can report exactly
    /// what was available versus requested.
    #[error("Insufficient stock for {name}: available {available}, requested {requested}")]
    InsufficientStock {
        name: String,
        available: i64,
        requested: i64,
    },

    /// An order status change not present in the transition table.
    #[error("Invalid order transition: {from} -> {to}")]
    InvalidOrderTransition { from: OrderStatus, to: OrderStatus },

    /// A shift status change not present in the transition table.
    #[error("Invalid shift transition: {from} -> {to}")]
    InvalidShiftTransition { from: ShiftStatus, to: ShiftStatus },

    /// The identity is not allowed to perform the action.
    ///
    /// Raised by the policy evaluator; never a silent no-op.
    #[error("Not authorized to {action}")]
    Forbidden { action: Action },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Used for early field validation before business logic runs. Business
/// rule failures on order lines are collected as message lists instead
/// (see [`crate::validation`]).
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g. invalid UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_stock_message_names_both_numbers() {
        let err = CoreError::InsufficientStock {
            name: "Margherita".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for Margherita: available 3, requested 5"
        );
    }

    #[test]
    fn test_transition_message_names_both_states() {
        let err = CoreError::InvalidOrderTransition {
            from: OrderStatus::Served,
            to: OrderStatus::InKitchen,
        };
        assert_eq!(err.to_string(), "Invalid order transition: served -> in_kitchen");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "table_number".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
