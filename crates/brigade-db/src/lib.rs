//! # brigade-db: Database Layer for Brigade
//!
//! SQLite storage for the Brigade restaurant ordering backend, built on
//! sqlx with async connection pooling.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        Brigade Data Flow                            │
//! │                                                                     │
//! │  brigade-service (OrderService, StaffService, MenuService)          │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ┌───────────────────────────────────────────────────────────────┐  │
//! │  │                    brigade-db (THIS CRATE)                    │  │
//! │  │                                                               │  │
//! │  │   ┌─────────────┐   ┌────────────────┐   ┌────────────────┐   │  │
//! │  │   │  Database   │   │  Repositories  │   │   Migrations   │   │  │
//! │  │   │  (pool.rs)  │◄──│  menu / order  │   │   (embedded)   │   │  │
//! │  │   │  SqlitePool │   │  staff+shifts  │   │  001_init.sql  │   │  │
//! │  │   └─────────────┘   └────────────────┘   └────────────────┘   │  │
//! │  └───────────────────────────────────────────────────────────────┘  │
//! │       │                                                             │
//! │       ▼                                                             │
//! │                   SQLite database (WAL mode)                        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (menu, order, staff)

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::menu::MenuRepository;
pub use repository::order::{KitchenCommit, OrderRepository};
pub use repository::staff::StaffRepository;
