//! # brigade-core: Pure Business Logic for Brigade
//!
//! This crate is the heart of the Brigade restaurant ordering backend. It
//! contains all business logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Brigade Architecture                           │
//! │                                                                     │
//! │  ┌───────────────────────────────────────────────────────────────┐  │
//! │  │                   brigade-service                             │  │
//! │  │   OrderService ── StaffService ── MenuService                 │  │
//! │  └───────────────────────────┬───────────────────────────────────┘  │
//! │                              │                                      │
//! │  ┌───────────────────────────▼───────────────────────────────────┐  │
//! │  │               ★ brigade-core (THIS CRATE) ★                   │  │
//! │  │                                                               │  │
//! │  │  ┌─────────┐ ┌────────┐ ┌────────┐ ┌───────────┐ ┌────────┐  │  │
//! │  │  │  types  │ │ money  │ │ totals │ │ lifecycle │ │ policy │  │  │
//! │  │  │ Order   │ │ Money  │ │ 8% tax │ │ status    │ │ roles  │  │  │
//! │  │  │ MenuItem│ │ TaxRate│ │ math   │ │ table     │ │ actions│  │  │
//! │  │  └─────────┘ └────────┘ └────────┘ └───────────┘ └────────┘  │  │
//! │  │                                                               │  │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS          │  │
//! │  └───────────────────────────┬───────────────────────────────────┘  │
//! │                              │                                      │
//! │  ┌───────────────────────────▼───────────────────────────────────┐  │
//! │  │                 brigade-db (Database Layer)                   │  │
//! │  │            SQLite queries, migrations, repositories           │  │
//! │  └───────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (MenuItem, Order, OrderItem, Shift, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`totals`] - Order totals calculator (subtotal / tax / total)
//! - [`validation`] - Order line validation (error-collecting)
//! - [`lifecycle`] - Order and shift status transition rules
//! - [`policy`] - Role-based access policy evaluation
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: every function is deterministic given its inputs
//! 2. **No I/O**: database, network and file system access is FORBIDDEN here
//! 3. **Integer Money**: all monetary values are cents (i64), never floats
//! 4. **Explicit Errors**: all errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod lifecycle;
pub mod money;
pub mod policy;
pub mod totals;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use policy::{Action, Identity, Role};
pub use totals::OrderTotals;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Dine-in tax rate in basis points (800 = 8%).
///
/// The rate is fixed for every order; it is applied to the subtotal once,
/// with half-up rounding at the final step only.
pub const TAX_RATE_BPS: u32 = 800;

/// Maximum distinct line items allowed in a single order.
pub const MAX_ORDER_LINES: usize = 50;

/// Maximum quantity of a single menu item per line.
///
/// Guards against fat-finger quantities (e.g. typing 500 instead of 5).
pub const MAX_LINE_QUANTITY: i64 = 99;

/// Minutes a draft order may sit idle before the lazy sweep purges it.
pub const DRAFT_TTL_MINUTES: i64 = 30;
