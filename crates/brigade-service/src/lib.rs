//! # brigade-service: Orchestration for Brigade
//!
//! The services in this crate tie the pure rules in brigade-core to the
//! storage behind the `store` traits:
//!
//! - [`orders::OrderService`] - the order lifecycle controller: creation
//!   (validate → snapshot → persist atomically → place), the defensive
//!   confirm path, staff status transitions with the transactional kitchen
//!   commit, policy-checked reads, and the lazy draft sweep.
//! - [`staff::StaffService`] - shift scheduling and shift status
//!   transitions, staff directory reads.
//! - [`menu::MenuService`] - staff-gated menu management and public
//!   catalog reads.
//!
//! ## Storage Injection
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │   OrderService::new(menu: Arc<dyn MenuStore>,                       │
//! │                     orders: Arc<dyn OrderStore>)                    │
//! │                                                                     │
//! │   production:  brigade-db repositories (SQLite, transactional)      │
//! │   tests:       store::memory::MemoryStore (no database needed)      │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Identity arrives from the external authentication middleware as
//! [`brigade_core::Identity`]; every operation evaluates the access policy
//! before touching storage.

pub mod dto;
pub mod error;
pub mod menu;
pub mod orders;
pub mod staff;
pub mod store;

pub use error::{ServiceError, ServiceResult};
pub use menu::MenuService;
pub use orders::OrderService;
pub use staff::StaffService;
