//! # Service Error Type
//!
//! The error taxonomy callers of the services see:
//!
//! - `Validation` - bad input shape or business-rule violation; carries the
//!   COMPLETE list of messages so the client gets one round trip
//! - `NotFound` - referenced order/menu item/user/shift absent
//! - `Authorization` - role or ownership check failed
//! - `Transition` - illegal status change, naming both states
//! - `Internal` - unexpected persistence failure (details are logged, a
//!   generic message propagates)
//!
//! Business-rule violations are collected and returned as data; only truly
//! exceptional storage failures surface as `Internal`. No retries happen
//! anywhere - a failed write is reported and the caller resubmits.

use thiserror::Error;

use brigade_core::CoreError;
use crate::store::StoreError;

/// Error type returned by every service operation.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// One or more business-rule violations, reported together.
    #[error("Validation failed: {}", .errors.join("; "))]
    Validation { errors: Vec<String> },

    /// Referenced entity absent.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Role or ownership check failed. Never a silent no-op.
    #[error("{0}")]
    Authorization(String),

    /// Illegal status change; the message names both states.
    #[error("Invalid transition: {from} -> {to}")]
    Transition { from: String, to: String },

    /// Unexpected persistence failure.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Creates a validation error from collected messages.
    pub fn validation(errors: Vec<String>) -> Self {
        ServiceError::Validation { errors }
    }

    /// Creates a single-message validation error.
    pub fn invalid(message: impl Into<String>) -> Self {
        ServiceError::Validation {
            errors: vec![message.into()],
        }
    }

    /// Creates a not-found error.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        ServiceError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

/// Converts core domain errors to service errors.
impl From<CoreError> for ServiceError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::MenuItemNotFound(id) => ServiceError::not_found("Menu item", id),
            CoreError::OrderNotFound(id) => ServiceError::not_found("Order", id),

            // Business-rule failures travel as message lists, not faults.
            CoreError::InsufficientStock { .. } => ServiceError::invalid(err.to_string()),
            CoreError::Validation(e) => ServiceError::invalid(e.to_string()),

            CoreError::InvalidOrderTransition { from, to } => ServiceError::Transition {
                from: from.to_string(),
                to: to.to_string(),
            },
            CoreError::InvalidShiftTransition { from, to } => ServiceError::Transition {
                from: from.to_string(),
                to: to.to_string(),
            },

            CoreError::Forbidden { .. } => ServiceError::Authorization(err.to_string()),
        }
    }
}

/// Converts storage errors to service errors.
///
/// Backend failures are logged with their detail; the caller receives a
/// generic internal-error message.
impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => ServiceError::NotFound { entity, id },
            StoreError::Conflict(message) => ServiceError::invalid(message),
            StoreError::Backend(detail) => {
                tracing::error!("Storage backend error: {detail}");
                ServiceError::Internal("storage operation failed".to_string())
            }
        }
    }
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use brigade_core::OrderStatus;

    #[test]
    fn test_validation_joins_messages() {
        let err = ServiceError::validation(vec![
            "Tiramisu is not available".to_string(),
            "Quantity for Espresso must be a positive number".to_string(),
        ]);
        let msg = err.to_string();
        assert!(msg.contains("Tiramisu"));
        assert!(msg.contains("Espresso"));
    }

    #[test]
    fn test_transition_from_core() {
        let err: ServiceError = CoreError::InvalidOrderTransition {
            from: OrderStatus::Closed,
            to: OrderStatus::Ready,
        }
        .into();
        assert_eq!(err.to_string(), "Invalid transition: closed -> ready");
    }

    #[test]
    fn test_insufficient_stock_becomes_validation() {
        let err: ServiceError = CoreError::InsufficientStock {
            name: "Branzino".to_string(),
            available: 1,
            requested: 4,
        }
        .into();
        assert!(matches!(err, ServiceError::Validation { .. }));
        assert!(err.to_string().contains("available 1, requested 4"));
    }
}
