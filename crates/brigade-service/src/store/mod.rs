//! # Storage Interfaces
//!
//! Abstractions over persistent storage for the services. Storage is
//! always injected through these traits - never reached through a global -
//! so the lifecycle controller runs unchanged against SQLite in
//! production and against [`memory::MemoryStore`] in tests.
//!
//! Implementations:
//! - [`sqlite`] - brigade-db repositories (transactional, guarded updates)
//! - [`memory`] - Mutex'd maps with the same guard semantics

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use brigade_core::{MenuItem, Order, OrderItem, OrderStatus, Shift, ShiftStatus, User};

// The kitchen-commit vocabulary is shared with the SQLite layer; both
// implementations speak the same outcome type.
pub use brigade_db::repository::order::{KitchenCommit, KitchenLine};

pub mod memory;
pub mod sqlite;

// =============================================================================
// Errors
// =============================================================================

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested row does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A uniqueness or integrity rule was violated.
    #[error("{0}")]
    Conflict(String),

    /// The storage backend failed.
    #[error("Backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

impl From<brigade_db::DbError> for StoreError {
    fn from(err: brigade_db::DbError) -> Self {
        use brigade_db::DbError;

        match err {
            DbError::NotFound { entity, id } => StoreError::NotFound { entity, id },
            DbError::UniqueViolation { .. } | DbError::ForeignKeyViolation { .. } => {
                StoreError::Conflict(err.to_string())
            }
            other => StoreError::Backend(other.to_string()),
        }
    }
}

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Traits
// =============================================================================

/// Menu catalog storage: lookup-by-id-set for order resolution, CRUD and
/// stock adjustment for menu management.
#[async_trait]
pub trait MenuStore: Send + Sync {
    async fn get(&self, id: &str) -> StoreResult<Option<MenuItem>>;

    /// Resolves a set of ids in one call; missing ids are simply absent.
    async fn find_by_ids(&self, ids: &[String]) -> StoreResult<Vec<MenuItem>>;

    async fn list_active(&self, limit: u32) -> StoreResult<Vec<MenuItem>>;

    async fn insert(&self, item: &MenuItem) -> StoreResult<()>;

    async fn update(&self, item: &MenuItem) -> StoreResult<()>;

    async fn set_active(&self, id: &str, active: bool) -> StoreResult<()>;

    /// Adjusts stock by a delta (positive for restocking). Fails rather
    /// than letting stock go negative.
    async fn adjust_stock(&self, id: &str, delta: i64) -> StoreResult<()>;
}

/// Order storage. Multi-row writes (order + items, kitchen commit) are
/// all-or-nothing; guarded updates return false instead of writing when
/// the expected previous state is gone.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persists an order and every line item atomically.
    async fn insert_order_with_items(&self, order: &Order, items: &[OrderItem])
        -> StoreResult<()>;

    async fn get(&self, id: &str) -> StoreResult<Option<Order>>;

    async fn get_items(&self, order_id: &str) -> StoreResult<Vec<OrderItem>>;

    /// Stamps a draft as placed; false when no draft row matched.
    async fn mark_placed(&self, order_id: &str, placed_at: DateTime<Utc>) -> StoreResult<bool>;

    /// Compare-and-swap status update; false when the guard missed.
    async fn update_status(
        &self,
        order_id: &str,
        from: OrderStatus,
        to: OrderStatus,
        closed_at: Option<DateTime<Utc>>,
    ) -> StoreResult<bool>;

    /// Atomically moves a placed order into the kitchen and decrements
    /// stock for every line, or does nothing at all.
    async fn send_to_kitchen(
        &self,
        order_id: &str,
        lines: &[KitchenLine],
    ) -> StoreResult<KitchenCommit>;

    /// Deletes drafts created before `cutoff` (items cascade). Returns the
    /// purge count.
    async fn purge_stale_drafts(&self, cutoff: DateTime<Utc>) -> StoreResult<u64>;

    async fn list_by_customer(&self, customer_id: &str, limit: u32) -> StoreResult<Vec<Order>>;

    async fn list_by_status(&self, status: OrderStatus, limit: u32) -> StoreResult<Vec<Order>>;
}

/// User and shift storage.
#[async_trait]
pub trait StaffStore: Send + Sync {
    async fn insert_user(&self, user: &User) -> StoreResult<()>;

    async fn get_user(&self, id: &str) -> StoreResult<Option<User>>;

    async fn list_staff(&self) -> StoreResult<Vec<User>>;

    async fn insert_shift(&self, shift: &Shift) -> StoreResult<()>;

    async fn get_shift(&self, id: &str) -> StoreResult<Option<Shift>>;

    /// Compare-and-swap shift status update; false when the guard missed.
    async fn update_shift_status(
        &self,
        id: &str,
        from: ShiftStatus,
        to: ShiftStatus,
    ) -> StoreResult<bool>;

    async fn list_shifts_for_staff(&self, staff_id: &str, limit: u32) -> StoreResult<Vec<Shift>>;
}
