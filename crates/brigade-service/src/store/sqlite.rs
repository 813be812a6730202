//! # SQLite Store Implementations
//!
//! Implements the storage-interface traits directly on brigade-db's
//! repositories, so a [`brigade_db::Database`] plugs straight into the
//! services:
//!
//! ```rust,ignore
//! let db = Database::new(DbConfig::new("./brigade.db")).await?;
//! let orders = OrderService::new(
//!     Arc::new(db.menu()),
//!     Arc::new(db.orders()),
//! );
//! ```
//!
//! The repositories already carry the transaction and guard semantics the
//! traits promise; this layer only translates errors.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use brigade_core::{MenuItem, Order, OrderItem, OrderStatus, Shift, ShiftStatus, User};
use brigade_db::{MenuRepository, OrderRepository, StaffRepository};

use super::{KitchenCommit, KitchenLine, MenuStore, OrderStore, StaffStore, StoreResult};

#[async_trait]
impl MenuStore for MenuRepository {
    async fn get(&self, id: &str) -> StoreResult<Option<MenuItem>> {
        Ok(self.get_by_id(id).await?)
    }

    async fn find_by_ids(&self, ids: &[String]) -> StoreResult<Vec<MenuItem>> {
        Ok(MenuRepository::find_by_ids(self, ids).await?)
    }

    async fn list_active(&self, limit: u32) -> StoreResult<Vec<MenuItem>> {
        Ok(MenuRepository::list_active(self, limit).await?)
    }

    async fn insert(&self, item: &MenuItem) -> StoreResult<()> {
        Ok(MenuRepository::insert(self, item).await?)
    }

    async fn update(&self, item: &MenuItem) -> StoreResult<()> {
        Ok(MenuRepository::update(self, item).await?)
    }

    async fn set_active(&self, id: &str, active: bool) -> StoreResult<()> {
        Ok(MenuRepository::set_active(self, id, active).await?)
    }

    async fn adjust_stock(&self, id: &str, delta: i64) -> StoreResult<()> {
        Ok(MenuRepository::adjust_stock(self, id, delta).await?)
    }
}

#[async_trait]
impl OrderStore for OrderRepository {
    async fn insert_order_with_items(
        &self,
        order: &Order,
        items: &[OrderItem],
    ) -> StoreResult<()> {
        Ok(OrderRepository::insert_order_with_items(self, order, items).await?)
    }

    async fn get(&self, id: &str) -> StoreResult<Option<Order>> {
        Ok(self.get_by_id(id).await?)
    }

    async fn get_items(&self, order_id: &str) -> StoreResult<Vec<OrderItem>> {
        Ok(OrderRepository::get_items(self, order_id).await?)
    }

    async fn mark_placed(&self, order_id: &str, placed_at: DateTime<Utc>) -> StoreResult<bool> {
        Ok(OrderRepository::mark_placed(self, order_id, placed_at).await?)
    }

    async fn update_status(
        &self,
        order_id: &str,
        from: OrderStatus,
        to: OrderStatus,
        closed_at: Option<DateTime<Utc>>,
    ) -> StoreResult<bool> {
        Ok(OrderRepository::update_status(self, order_id, from, to, closed_at).await?)
    }

    async fn send_to_kitchen(
        &self,
        order_id: &str,
        lines: &[KitchenLine],
    ) -> StoreResult<KitchenCommit> {
        Ok(OrderRepository::send_to_kitchen(self, order_id, lines).await?)
    }

    async fn purge_stale_drafts(&self, cutoff: DateTime<Utc>) -> StoreResult<u64> {
        Ok(OrderRepository::purge_stale_drafts(self, cutoff).await?)
    }

    async fn list_by_customer(&self, customer_id: &str, limit: u32) -> StoreResult<Vec<Order>> {
        Ok(OrderRepository::list_by_customer(self, customer_id, limit).await?)
    }

    async fn list_by_status(&self, status: OrderStatus, limit: u32) -> StoreResult<Vec<Order>> {
        Ok(OrderRepository::list_by_status(self, status, limit).await?)
    }
}

#[async_trait]
impl StaffStore for StaffRepository {
    async fn insert_user(&self, user: &User) -> StoreResult<()> {
        Ok(StaffRepository::insert_user(self, user).await?)
    }

    async fn get_user(&self, id: &str) -> StoreResult<Option<User>> {
        Ok(StaffRepository::get_user(self, id).await?)
    }

    async fn list_staff(&self) -> StoreResult<Vec<User>> {
        Ok(StaffRepository::list_staff(self).await?)
    }

    async fn insert_shift(&self, shift: &Shift) -> StoreResult<()> {
        Ok(StaffRepository::insert_shift(self, shift).await?)
    }

    async fn get_shift(&self, id: &str) -> StoreResult<Option<Shift>> {
        Ok(StaffRepository::get_shift(self, id).await?)
    }

    async fn update_shift_status(
        &self,
        id: &str,
        from: ShiftStatus,
        to: ShiftStatus,
    ) -> StoreResult<bool> {
        Ok(StaffRepository::update_shift_status(self, id, from, to).await?)
    }

    async fn list_shifts_for_staff(&self, staff_id: &str, limit: u32) -> StoreResult<Vec<Shift>> {
        Ok(StaffRepository::list_shifts_for_staff(self, staff_id, limit).await?)
    }
}
