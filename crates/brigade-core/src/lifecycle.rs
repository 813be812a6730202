//! # Lifecycle Module
//!
//! Authoritative status transition tables for orders and shifts.
//!
//! ## Order Lifecycle
//! ```text
//! DRAFT ──► PLACED ──► IN_KITCHEN ──► READY ──► SERVED ──► CLOSED
//!              │
//!              └─────► CANCELLED
//!
//! (expired drafts are purged by the lazy sweep, not transitioned)
//! ```
//!
//! The tables here are the single source of truth: any attempted change
//! not listed is rejected with an error naming both states. Callers never
//! update a status column without consulting these checks, and the storage
//! layer additionally guards its UPDATEs with `WHERE status = <from>` so a
//! concurrent loser observes the rejection instead of a double write.

use crate::error::{CoreError, CoreResult};
use crate::types::{OrderStatus, ShiftStatus};

// =============================================================================
// Order Transitions
// =============================================================================

/// Returns true when `from -> to` appears in the order transition table.
pub fn order_transition_allowed(from: OrderStatus, to: OrderStatus) -> bool {
    use OrderStatus::*;

    matches!(
        (from, to),
        (Draft, Placed)
            | (Placed, InKitchen)
            | (Placed, Cancelled)
            | (InKitchen, Ready)
            | (Ready, Served)
            | (Served, Closed)
    )
}

/// Checks an order transition, rejecting anything outside the table.
///
/// ## Example
/// ```rust
/// use brigade_core::lifecycle::check_order_transition;
/// use brigade_core::types::OrderStatus;
///
/// assert!(check_order_transition(OrderStatus::Placed, OrderStatus::InKitchen).is_ok());
/// assert!(check_order_transition(OrderStatus::Closed, OrderStatus::Ready).is_err());
/// ```
pub fn check_order_transition(from: OrderStatus, to: OrderStatus) -> CoreResult<()> {
    if order_transition_allowed(from, to) {
        Ok(())
    } else {
        Err(CoreError::InvalidOrderTransition { from, to })
    }
}

/// Checks whether a status can never change again.
pub fn order_status_is_terminal(status: OrderStatus) -> bool {
    matches!(status, OrderStatus::Closed | OrderStatus::Cancelled)
}

// =============================================================================
// Shift Transitions
// =============================================================================

/// Returns true when `from -> to` appears in the shift transition table.
pub fn shift_transition_allowed(from: ShiftStatus, to: ShiftStatus) -> bool {
    use ShiftStatus::*;

    matches!(
        (from, to),
        (Scheduled, CheckedIn) | (Scheduled, Cancelled) | (CheckedIn, Completed)
    )
}

/// Checks a shift transition, rejecting anything outside the table.
pub fn check_shift_transition(from: ShiftStatus, to: ShiftStatus) -> CoreResult<()> {
    if shift_transition_allowed(from, to) {
        Ok(())
    } else {
        Err(CoreError::InvalidShiftTransition { from, to })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use OrderStatus::*;

    const ALL_ORDER_STATUSES: [OrderStatus; 7] =
        [Draft, Placed, InKitchen, Ready, Served, Closed, Cancelled];

    #[test]
    fn test_happy_path_is_allowed() {
        assert!(order_transition_allowed(Draft, Placed));
        assert!(order_transition_allowed(Placed, InKitchen));
        assert!(order_transition_allowed(InKitchen, Ready));
        assert!(order_transition_allowed(Ready, Served));
        assert!(order_transition_allowed(Served, Closed));
        assert!(order_transition_allowed(Placed, Cancelled));
    }

    /// Every (state, target) pair outside the table must be rejected with
    /// an error naming both states.
    #[test]
    fn test_every_unlisted_pair_is_rejected() {
        let allowed = [
            (Draft, Placed),
            (Placed, InKitchen),
            (Placed, Cancelled),
            (InKitchen, Ready),
            (Ready, Served),
            (Served, Closed),
        ];

        for from in ALL_ORDER_STATUSES {
            for to in ALL_ORDER_STATUSES {
                if allowed.contains(&(from, to)) {
                    assert!(check_order_transition(from, to).is_ok());
                    continue;
                }

                let err = check_order_transition(from, to).unwrap_err();
                let msg = err.to_string();
                assert!(msg.contains(from.as_str()), "message missing {from}: {msg}");
                assert!(msg.contains(to.as_str()), "message missing {to}: {msg}");
            }
        }
    }

    #[test]
    fn test_terminal_states_have_no_exits() {
        for to in ALL_ORDER_STATUSES {
            assert!(!order_transition_allowed(Closed, to));
            assert!(!order_transition_allowed(Cancelled, to));
        }
        assert!(order_status_is_terminal(Closed));
        assert!(order_status_is_terminal(Cancelled));
        assert!(!order_status_is_terminal(Placed));
    }

    #[test]
    fn test_shift_transitions() {
        use ShiftStatus::*;

        assert!(shift_transition_allowed(Scheduled, CheckedIn));
        assert!(shift_transition_allowed(Scheduled, Cancelled));
        assert!(shift_transition_allowed(CheckedIn, Completed));

        assert!(check_shift_transition(Completed, CheckedIn).is_err());
        assert!(check_shift_transition(Cancelled, CheckedIn).is_err());
        assert!(check_shift_transition(CheckedIn, Cancelled).is_err());
    }
}
