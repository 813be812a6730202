//! # In-Memory Store
//!
//! A complete in-memory implementation of the storage interfaces, used by
//! the service tests and suitable for demos or embedding where SQLite is
//! unnecessary.
//!
//! All maps live behind one `Mutex`, so every operation is atomic exactly
//! the way the SQLite transactions are: the kitchen commit checks every
//! stock row before touching any of them, and guarded updates verify the
//! expected previous status under the same lock that applies the change.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use brigade_core::{MenuItem, Order, OrderItem, OrderStatus, Role, Shift, ShiftStatus, User};

use super::{
    KitchenCommit, KitchenLine, MenuStore, OrderStore, StaffStore, StoreError, StoreResult,
};

#[derive(Debug, Default)]
struct Inner {
    menu: HashMap<String, MenuItem>,
    orders: HashMap<String, Order>,
    /// Line items keyed by order id.
    order_items: HashMap<String, Vec<OrderItem>>,
    users: HashMap<String, User>,
    shifts: HashMap<String, Shift>,
}

/// Shared in-memory storage implementing all three store traits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        MemoryStore::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("Store mutex poisoned")
    }
}

// =============================================================================
// MenuStore
// =============================================================================

#[async_trait]
impl MenuStore for MemoryStore {
    async fn get(&self, id: &str) -> StoreResult<Option<MenuItem>> {
        Ok(self.lock().menu.get(id).cloned())
    }

    async fn find_by_ids(&self, ids: &[String]) -> StoreResult<Vec<MenuItem>> {
        let inner = self.lock();
        Ok(ids.iter().filter_map(|id| inner.menu.get(id).cloned()).collect())
    }

    async fn list_active(&self, limit: u32) -> StoreResult<Vec<MenuItem>> {
        let inner = self.lock();
        let mut items: Vec<MenuItem> =
            inner.menu.values().filter(|i| i.is_active).cloned().collect();
        items.sort_by(|a, b| (&a.category, &a.name).cmp(&(&b.category, &b.name)));
        items.truncate(limit as usize);
        Ok(items)
    }

    async fn insert(&self, item: &MenuItem) -> StoreResult<()> {
        self.lock().menu.insert(item.id.clone(), item.clone());
        Ok(())
    }

    async fn update(&self, item: &MenuItem) -> StoreResult<()> {
        let mut inner = self.lock();
        match inner.menu.get_mut(&item.id) {
            Some(existing) => {
                *existing = item.clone();
                Ok(())
            }
            None => Err(StoreError::not_found("MenuItem", &item.id)),
        }
    }

    async fn set_active(&self, id: &str, active: bool) -> StoreResult<()> {
        let mut inner = self.lock();
        let item = inner
            .menu
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found("MenuItem", id))?;
        item.is_active = active;
        item.updated_at = Utc::now();
        Ok(())
    }

    async fn adjust_stock(&self, id: &str, delta: i64) -> StoreResult<()> {
        let mut inner = self.lock();
        let item = inner
            .menu
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found("MenuItem", id))?;

        if item.qty_on_hand + delta < 0 {
            return Err(StoreError::Conflict(format!(
                "stock for {} cannot go negative",
                item.name
            )));
        }

        item.qty_on_hand += delta;
        item.updated_at = Utc::now();
        Ok(())
    }
}

// =============================================================================
// OrderStore
// =============================================================================

#[async_trait]
impl OrderStore for MemoryStore {
    async fn insert_order_with_items(
        &self,
        order: &Order,
        items: &[OrderItem],
    ) -> StoreResult<()> {
        let mut inner = self.lock();
        inner.orders.insert(order.id.clone(), order.clone());
        inner.order_items.insert(order.id.clone(), items.to_vec());
        Ok(())
    }

    async fn get(&self, id: &str) -> StoreResult<Option<Order>> {
        Ok(self.lock().orders.get(id).cloned())
    }

    async fn get_items(&self, order_id: &str) -> StoreResult<Vec<OrderItem>> {
        Ok(self.lock().order_items.get(order_id).cloned().unwrap_or_default())
    }

    async fn mark_placed(&self, order_id: &str, placed_at: DateTime<Utc>) -> StoreResult<bool> {
        let mut inner = self.lock();
        match inner.orders.get_mut(order_id) {
            Some(order) if order.status == OrderStatus::Draft => {
                order.status = OrderStatus::Placed;
                order.placed_at = Some(placed_at);
                order.updated_at = placed_at;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn update_status(
        &self,
        order_id: &str,
        from: OrderStatus,
        to: OrderStatus,
        closed_at: Option<DateTime<Utc>>,
    ) -> StoreResult<bool> {
        let mut inner = self.lock();
        match inner.orders.get_mut(order_id) {
            Some(order) if order.status == from => {
                order.status = to;
                if closed_at.is_some() {
                    order.closed_at = closed_at;
                }
                order.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn send_to_kitchen(
        &self,
        order_id: &str,
        lines: &[KitchenLine],
    ) -> StoreResult<KitchenCommit> {
        let mut inner = self.lock();

        match inner.orders.get(order_id) {
            Some(order) if order.status == OrderStatus::Placed => {}
            _ => return Ok(KitchenCommit::StatusConflict),
        }

        // Verify every line before mutating anything, so a shortfall
        // leaves stock and status untouched - same all-or-nothing contract
        // as the SQLite transaction.
        for line in lines {
            let available = inner
                .menu
                .get(&line.menu_item_id)
                .map(|i| i.qty_on_hand)
                .unwrap_or(0);

            if available < line.quantity {
                return Ok(KitchenCommit::OutOfStock {
                    name: line.name.clone(),
                    available,
                    requested: line.quantity,
                });
            }
        }

        let now = Utc::now();
        for line in lines {
            if let Some(item) = inner.menu.get_mut(&line.menu_item_id) {
                item.qty_on_hand -= line.quantity;
                item.updated_at = now;
            }
        }

        if let Some(order) = inner.orders.get_mut(order_id) {
            order.status = OrderStatus::InKitchen;
            order.updated_at = now;
        }

        Ok(KitchenCommit::Committed)
    }

    async fn purge_stale_drafts(&self, cutoff: DateTime<Utc>) -> StoreResult<u64> {
        let mut inner = self.lock();

        let stale: Vec<String> = inner
            .orders
            .values()
            .filter(|o| o.status == OrderStatus::Draft && o.created_at < cutoff)
            .map(|o| o.id.clone())
            .collect();

        for id in &stale {
            inner.orders.remove(id);
            inner.order_items.remove(id);
        }

        Ok(stale.len() as u64)
    }

    async fn list_by_customer(&self, customer_id: &str, limit: u32) -> StoreResult<Vec<Order>> {
        let inner = self.lock();
        let mut orders: Vec<Order> = inner
            .orders
            .values()
            .filter(|o| o.customer_id == customer_id)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        orders.truncate(limit as usize);
        Ok(orders)
    }

    async fn list_by_status(&self, status: OrderStatus, limit: u32) -> StoreResult<Vec<Order>> {
        let inner = self.lock();
        let mut orders: Vec<Order> = inner
            .orders
            .values()
            .filter(|o| o.status == status)
            .cloned()
            .collect();
        orders.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        orders.truncate(limit as usize);
        Ok(orders)
    }
}

// =============================================================================
// StaffStore
// =============================================================================

#[async_trait]
impl StaffStore for MemoryStore {
    async fn insert_user(&self, user: &User) -> StoreResult<()> {
        let mut inner = self.lock();

        if inner.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict(format!(
                "email '{}' already exists",
                user.email
            )));
        }

        inner.users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn get_user(&self, id: &str) -> StoreResult<Option<User>> {
        Ok(self.lock().users.get(id).cloned())
    }

    async fn list_staff(&self) -> StoreResult<Vec<User>> {
        let inner = self.lock();
        let mut staff: Vec<User> = inner
            .users
            .values()
            .filter(|u| u.is_active && u.roles.iter().any(Role::is_staff_like))
            .cloned()
            .collect();
        staff.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(staff)
    }

    async fn insert_shift(&self, shift: &Shift) -> StoreResult<()> {
        self.lock().shifts.insert(shift.id.clone(), shift.clone());
        Ok(())
    }

    async fn get_shift(&self, id: &str) -> StoreResult<Option<Shift>> {
        Ok(self.lock().shifts.get(id).cloned())
    }

    async fn update_shift_status(
        &self,
        id: &str,
        from: ShiftStatus,
        to: ShiftStatus,
    ) -> StoreResult<bool> {
        let mut inner = self.lock();
        match inner.shifts.get_mut(id) {
            Some(shift) if shift.status == from => {
                shift.status = to;
                shift.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn list_shifts_for_staff(&self, staff_id: &str, limit: u32) -> StoreResult<Vec<Shift>> {
        let inner = self.lock();
        let mut shifts: Vec<Shift> = inner
            .shifts
            .values()
            .filter(|s| s.staff_id == staff_id)
            .cloned()
            .collect();
        shifts.sort_by(|a, b| a.starts_at.cmp(&b.starts_at));
        shifts.truncate(limit as usize);
        Ok(shifts)
    }
}
