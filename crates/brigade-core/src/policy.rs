//! # Access Policy
//!
//! Role-derived authorization for every operation in the system.
//!
//! ## Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        Access Policy                                │
//! │                                                                     │
//! │  Identity { user_id, roles } ──► authorize(identity, action, owner) │
//! │                                                                     │
//! │  customer          may read/act on ORDERS THEY OWN                  │
//! │  staff-like        may read/act on ANY order, manage menu & shifts  │
//! │  (staff-like = roles ∩ {staff, manager, admin} ≠ ∅)                 │
//! │                                                                     │
//! │  Denial is an error, never a silent no-op.                          │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is exactly one evaluation point: [`authorize`]. Services never
//! test role membership by hand.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, CoreResult};

// =============================================================================
// Roles
// =============================================================================

/// A role attached to an identity by the external claims provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Customer,
    Staff,
    Manager,
    Admin,
}

impl Role {
    /// True for roles at or above "staff" in the hierarchy.
    #[inline]
    pub const fn is_staff_like(&self) -> bool {
        matches!(self, Role::Staff | Role::Manager | Role::Admin)
    }
}

// =============================================================================
// Identity
// =============================================================================

/// The authenticated caller of an operation.
///
/// Produced per request by the external authentication middleware; the
/// services only ever see this resolved form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: String,
    pub roles: Vec<Role>,
}

impl Identity {
    /// Creates an identity with the given roles.
    pub fn new(user_id: impl Into<String>, roles: Vec<Role>) -> Self {
        Identity {
            user_id: user_id.into(),
            roles,
        }
    }

    /// Convenience constructor for a plain customer.
    pub fn customer(user_id: impl Into<String>) -> Self {
        Identity::new(user_id, vec![Role::Customer])
    }

    /// Convenience constructor for a staff member.
    pub fn staff(user_id: impl Into<String>) -> Self {
        Identity::new(user_id, vec![Role::Staff])
    }

    /// True when any role is staff-like.
    #[inline]
    pub fn is_staff_like(&self) -> bool {
        self.roles.iter().any(Role::is_staff_like)
    }
}

// =============================================================================
// Actions
// =============================================================================

/// The typed set of permissions the policy understands.
///
/// One variant per guarded operation; adding an operation means adding a
/// variant here and a rule in [`authorize`], nowhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Read an order or its status.
    ViewOrder,
    /// Create or confirm an order.
    PlaceOrder,
    /// Move an order through the lifecycle.
    UpdateOrderStatus,
    /// Create, update, deactivate or restock menu items.
    ManageMenu,
    /// Schedule or transition staff shifts.
    ManageShifts,
    /// Create or deactivate staff accounts.
    ManageStaff,
    /// Read shift schedules.
    ViewShifts,
}

impl Action {
    /// Human-readable phrase used in authorization failure messages.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Action::ViewOrder => "view this order",
            Action::PlaceOrder => "place an order",
            Action::UpdateOrderStatus => "update order status",
            Action::ManageMenu => "manage the menu",
            Action::ManageShifts => "manage shifts",
            Action::ManageStaff => "manage staff",
            Action::ViewShifts => "view shifts",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Evaluation
// =============================================================================

/// Evaluates whether `identity` may perform `action`.
///
/// `owner_id` is the owning user of the target resource where ownership
/// matters (an order's customer, a shift's staff member); pass `None` for
/// collection-level operations.
///
/// ## Example
/// ```rust
/// use brigade_core::policy::{authorize, Action, Identity};
///
/// let alice = Identity::customer("alice");
/// assert!(authorize(&alice, Action::ViewOrder, Some("alice")).is_ok());
/// assert!(authorize(&alice, Action::ViewOrder, Some("bob")).is_err());
/// assert!(authorize(&Identity::staff("carol"), Action::ViewOrder, Some("bob")).is_ok());
/// ```
pub fn authorize(identity: &Identity, action: Action, owner_id: Option<&str>) -> CoreResult<()> {
    let allowed = match action {
        // Anyone authenticated may place an order for themselves; acting
        // on an EXISTING draft (confirm) requires ownership or staff.
        Action::PlaceOrder => match owner_id {
            None => true,
            Some(owner) => identity.is_staff_like() || owner == identity.user_id,
        },

        // Owner or staff-like may read.
        Action::ViewOrder | Action::ViewShifts => {
            identity.is_staff_like() || owner_id == Some(identity.user_id.as_str())
        }

        // Mutating staff operations.
        Action::UpdateOrderStatus
        | Action::ManageMenu
        | Action::ManageShifts
        | Action::ManageStaff => identity.is_staff_like(),
    };

    if allowed {
        Ok(())
    } else {
        Err(CoreError::Forbidden { action })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staff_like_roles() {
        assert!(!Role::Customer.is_staff_like());
        assert!(Role::Staff.is_staff_like());
        assert!(Role::Manager.is_staff_like());
        assert!(Role::Admin.is_staff_like());
    }

    #[test]
    fn test_customer_owns_order() {
        let alice = Identity::customer("alice");

        assert!(authorize(&alice, Action::ViewOrder, Some("alice")).is_ok());
        assert!(authorize(&alice, Action::ViewOrder, Some("bob")).is_err());
        assert!(authorize(&alice, Action::ViewOrder, None).is_err());
    }

    #[test]
    fn test_staff_reads_any_order() {
        for role in [Role::Staff, Role::Manager, Role::Admin] {
            let identity = Identity::new("carol", vec![role]);
            assert!(authorize(&identity, Action::ViewOrder, Some("bob")).is_ok());
        }
    }

    #[test]
    fn test_mutations_require_staff_like() {
        let customer = Identity::customer("alice");
        let staff = Identity::staff("carol");

        for action in [
            Action::UpdateOrderStatus,
            Action::ManageMenu,
            Action::ManageShifts,
            Action::ManageStaff,
        ] {
            let err = authorize(&customer, action, None).unwrap_err();
            assert!(matches!(err, CoreError::Forbidden { .. }));
            assert!(authorize(&staff, action, None).is_ok());
        }
    }

    #[test]
    fn test_confirm_requires_ownership() {
        let alice = Identity::customer("alice");

        assert!(authorize(&alice, Action::PlaceOrder, None).is_ok());
        assert!(authorize(&alice, Action::PlaceOrder, Some("alice")).is_ok());
        assert!(authorize(&alice, Action::PlaceOrder, Some("bob")).is_err());
        assert!(authorize(&Identity::staff("carol"), Action::PlaceOrder, Some("bob")).is_ok());
    }

    #[test]
    fn test_mixed_roles() {
        // A staff member who is also a customer is staff-like.
        let identity = Identity::new("dave", vec![Role::Customer, Role::Staff]);
        assert!(identity.is_staff_like());
        assert!(authorize(&identity, Action::UpdateOrderStatus, None).is_ok());
    }

    #[test]
    fn test_denial_message_names_action() {
        let err = authorize(&Identity::customer("alice"), Action::ManageMenu, None).unwrap_err();
        assert_eq!(err.to_string(), "Not authorized to manage the menu");
    }
}
