//! # Order Service
//!
//! The order lifecycle controller: orchestrates validation, persistence
//! and status transitions.
//!
//! ## Creation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      create_order                                   │
//! │                                                                     │
//! │  1. policy check, field validation                                  │
//! │  2. lazy sweep: purge drafts older than 30 minutes                  │
//! │  3. resolve every requested menu item in one lookup                 │
//! │  4. validate EVERY line, collecting all failures                    │
//! │       └── any failure → abort, nothing persisted                    │
//! │  5. snapshot name/price (+ active promo) into line items,           │
//! │     compute totals, persist order + items in ONE transaction        │
//! │  6. place: DRAFT → PLACED via the shared placement step             │
//! │                                                                     │
//! │  DRAFT is fleeting - observable only if step 6 fails, in which      │
//! │  case confirm_order can finish the job or the sweep reclaims it.    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Inventory is committed exactly once, at kitchen entry
//! (PLACED → IN_KITCHEN), not at creation - abandoned orders never hold
//! stock hostage. The kitchen commit is a single guarded transaction, so
//! two racing status updates cannot double-decrement.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use brigade_core::lifecycle::check_order_transition;
use brigade_core::policy::{authorize, Action};
use brigade_core::totals::{line_total, OrderTotals};
use brigade_core::validation::{validate_order_line, validate_table_number};
use brigade_core::{
    CoreError, Identity, MenuItem, Order, OrderItem, OrderStatus, PaymentMode, PaymentStatus,
    DRAFT_TTL_MINUTES, MAX_ORDER_LINES,
};

use crate::dto::{NewOrderRequest, OrderStatusView, OrderSummary, OrderView};
use crate::error::{ServiceError, ServiceResult};
use crate::store::{KitchenCommit, KitchenLine, MenuStore, OrderStore};

/// Order lifecycle controller.
///
/// Storage arrives through constructor injection; see [`crate::store`].
pub struct OrderService {
    menu: Arc<dyn MenuStore>,
    orders: Arc<dyn OrderStore>,
}

impl OrderService {
    /// Creates a new OrderService over the given stores.
    pub fn new(menu: Arc<dyn MenuStore>, orders: Arc<dyn OrderStore>) -> Self {
        OrderService { menu, orders }
    }

    // =========================================================================
    // Creation & Placement
    // =========================================================================

    /// Creates an order for the caller and immediately places it.
    ///
    /// Every requested line is validated against the live catalog and ALL
    /// failures are reported together; nothing is persisted unless the
    /// whole request is valid.
    pub async fn create_order(
        &self,
        identity: &Identity,
        req: NewOrderRequest,
    ) -> ServiceResult<OrderView> {
        authorize(identity, Action::PlaceOrder, None)?;

        validate_table_number(req.table_number)
            .map_err(|e| ServiceError::invalid(e.to_string()))?;

        if req.items.is_empty() {
            return Err(ServiceError::invalid("Order must contain at least one item"));
        }
        if req.items.len() > MAX_ORDER_LINES {
            return Err(ServiceError::invalid(format!(
                "Order cannot have more than {MAX_ORDER_LINES} lines"
            )));
        }

        // Lazy sweep: reclaim drafts that went stale instead of running a
        // background timer.
        let cutoff = Utc::now() - Duration::minutes(DRAFT_TTL_MINUTES);
        let purged = self.orders.purge_stale_drafts(cutoff).await?;
        if purged > 0 {
            debug!(purged = purged, "Draft sweep before order creation");
        }

        // Resolve every requested menu item in one lookup.
        let ids: Vec<String> = req.items.iter().map(|l| l.menu_item_id.clone()).collect();
        let resolved = self.menu.find_by_ids(&ids).await?;
        let by_id: HashMap<&str, &MenuItem> =
            resolved.iter().map(|m| (m.id.as_str(), m)).collect();

        // Validate all lines; collect every failure.
        let mut errors = Vec::new();
        for line in &req.items {
            match by_id.get(line.menu_item_id.as_str()) {
                None => errors.push(format!("Menu item {} not found", line.menu_item_id)),
                Some(menu_item) => {
                    errors.extend(validate_order_line(menu_item, line.quantity).errors)
                }
            }
        }
        if !errors.is_empty() {
            return Err(ServiceError::Validation { errors });
        }

        // Snapshot pricing: freeze name, unit price and any active promo
        // into the line items at this instant.
        let now = Utc::now();
        let order_id = Uuid::new_v4().to_string();

        let items: Vec<OrderItem> = req
            .items
            .iter()
            .map(|line| {
                let menu_item = by_id[line.menu_item_id.as_str()];
                let percent_off_bps = menu_item.active_promo_bps(now);
                let total = line_total(menu_item.price(), line.quantity, percent_off_bps);

                OrderItem {
                    id: Uuid::new_v4().to_string(),
                    order_id: order_id.clone(),
                    menu_item_id: menu_item.id.clone(),
                    name_snapshot: menu_item.name.clone(),
                    unit_price_cents: menu_item.price_cents,
                    quantity: line.quantity,
                    percent_off_bps,
                    line_total_cents: total.cents(),
                    customizations: line.customizations.clone(),
                    created_at: now,
                }
            })
            .collect();

        let totals = OrderTotals::for_items(&items);

        let order = Order {
            id: order_id.clone(),
            customer_id: identity.user_id.clone(),
            table_number: req.table_number,
            status: OrderStatus::Draft,
            subtotal_cents: totals.subtotal.cents(),
            tax_cents: totals.tax.cents(),
            service_charge_cents: 0,
            tip_cents: 0,
            total_cents: totals.total.cents(),
            payment_mode: PaymentMode::default(),
            payment_status: PaymentStatus::default(),
            placed_at: None,
            closed_at: None,
            created_at: now,
            updated_at: now,
        };

        // Order, items and totals land in one transaction.
        self.orders.insert_order_with_items(&order, &items).await?;

        let placed = self.place(&order_id, OrderStatus::Draft).await?;

        info!(
            order_id = %order_id,
            customer_id = %placed.customer_id,
            table = placed.table_number,
            total = placed.total_cents,
            lines = items.len(),
            "Order placed"
        );

        Ok(OrderView::from_parts(placed, items))
    }

    /// Places a draft order that bypassed the immediate-placement path.
    ///
    /// Defensive: requires the order to still be DRAFT and the caller to
    /// own it, and re-validates stock/activation against the live catalog
    /// (it may have changed since creation) before the shared placement
    /// step runs.
    pub async fn confirm_order(
        &self,
        identity: &Identity,
        order_id: &str,
    ) -> ServiceResult<OrderView> {
        let order = self.load_order(order_id).await?;

        authorize(identity, Action::PlaceOrder, Some(&order.customer_id))?;
        check_order_transition(order.status, OrderStatus::Placed)?;

        let items = self.orders.get_items(order_id).await?;

        let ids: Vec<String> = items.iter().map(|i| i.menu_item_id.clone()).collect();
        let resolved = self.menu.find_by_ids(&ids).await?;
        let by_id: HashMap<&str, &MenuItem> =
            resolved.iter().map(|m| (m.id.as_str(), m)).collect();

        let mut errors = Vec::new();
        for item in &items {
            match by_id.get(item.menu_item_id.as_str()) {
                None => errors.push(format!("{} is no longer on the menu", item.name_snapshot)),
                Some(menu_item) => {
                    errors.extend(validate_order_line(menu_item, item.quantity).errors)
                }
            }
        }
        if !errors.is_empty() {
            return Err(ServiceError::Validation { errors });
        }

        let placed = self.place(order_id, order.status).await?;

        info!(order_id = %order_id, "Draft order confirmed");

        Ok(OrderView::from_parts(placed, items))
    }

    /// The single DRAFT → PLACED step shared by creation and confirmation.
    ///
    /// Consults the transition table, then applies the guarded stamp. A
    /// missed guard means a concurrent caller won; the loser gets the
    /// transition error for the state it actually found.
    async fn place(&self, order_id: &str, current: OrderStatus) -> ServiceResult<Order> {
        check_order_transition(current, OrderStatus::Placed)?;

        let placed_at = Utc::now();
        if !self.orders.mark_placed(order_id, placed_at).await? {
            return Err(match self.orders.get(order_id).await? {
                None => ServiceError::not_found("Order", order_id),
                Some(order) => CoreError::InvalidOrderTransition {
                    from: order.status,
                    to: OrderStatus::Placed,
                }
                .into(),
            });
        }

        self.load_order(order_id).await
    }

    // =========================================================================
    // Status Transitions
    // =========================================================================

    /// Moves an order through the lifecycle. Staff only.
    ///
    /// PLACED → IN_KITCHEN additionally commits inventory: each line's
    /// quantity is decremented from its menu item exactly once, inside the
    /// same transaction as the status change. Entering CLOSED stamps
    /// `closed_at`.
    pub async fn update_order_status(
        &self,
        identity: &Identity,
        order_id: &str,
        new_status: OrderStatus,
    ) -> ServiceResult<OrderView> {
        authorize(identity, Action::UpdateOrderStatus, None)?;

        let order = self.load_order(order_id).await?;
        check_order_transition(order.status, new_status)?;

        if order.status == OrderStatus::Placed && new_status == OrderStatus::InKitchen {
            let items = self.orders.get_items(order_id).await?;
            let lines: Vec<KitchenLine> = items
                .iter()
                .map(|i| KitchenLine {
                    menu_item_id: i.menu_item_id.clone(),
                    name: i.name_snapshot.clone(),
                    quantity: i.quantity,
                })
                .collect();

            match self.orders.send_to_kitchen(order_id, &lines).await? {
                KitchenCommit::Committed => {}
                KitchenCommit::StatusConflict => {
                    let current = self.load_order(order_id).await?;
                    return Err(CoreError::InvalidOrderTransition {
                        from: current.status,
                        to: new_status,
                    }
                    .into());
                }
                KitchenCommit::OutOfStock {
                    name,
                    available,
                    requested,
                } => {
                    return Err(CoreError::InsufficientStock {
                        name,
                        available,
                        requested,
                    }
                    .into())
                }
            }
        } else {
            let closed_at = (new_status == OrderStatus::Closed).then(Utc::now);

            if !self
                .orders
                .update_status(order_id, order.status, new_status, closed_at)
                .await?
            {
                let current = self.load_order(order_id).await?;
                return Err(CoreError::InvalidOrderTransition {
                    from: current.status,
                    to: new_status,
                }
                .into());
            }
        }

        let updated = self.load_order(order_id).await?;
        let items = self.orders.get_items(order_id).await?;

        info!(
            order_id = %order_id,
            from = %order.status,
            to = %new_status,
            "Order status updated"
        );

        Ok(OrderView::from_parts(updated, items))
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Gets a full order. Customers see their own; staff see any.
    pub async fn get_order(&self, identity: &Identity, order_id: &str) -> ServiceResult<OrderView> {
        let order = self.load_order(order_id).await?;
        authorize(identity, Action::ViewOrder, Some(&order.customer_id))?;

        let items = self.orders.get_items(order_id).await?;
        Ok(OrderView::from_parts(order, items))
    }

    /// Gets an order's status and timestamps. Same policy as
    /// [`Self::get_order`]; reads never mutate, so repeated calls return
    /// identical values.
    pub async fn get_order_status(
        &self,
        identity: &Identity,
        order_id: &str,
    ) -> ServiceResult<OrderStatusView> {
        let order = self.load_order(order_id).await?;
        authorize(identity, Action::ViewOrder, Some(&order.customer_id))?;

        Ok(OrderStatusView::from(&order))
    }

    /// Lists a customer's orders, newest first.
    pub async fn list_orders_for_customer(
        &self,
        identity: &Identity,
        customer_id: &str,
        limit: u32,
    ) -> ServiceResult<Vec<OrderSummary>> {
        authorize(identity, Action::ViewOrder, Some(customer_id))?;

        let orders = self.orders.list_by_customer(customer_id, limit).await?;
        Ok(orders.iter().map(OrderSummary::from).collect())
    }

    /// Lists orders in a given status, oldest first (kitchen queue view).
    /// Staff only.
    pub async fn list_orders_by_status(
        &self,
        identity: &Identity,
        status: OrderStatus,
        limit: u32,
    ) -> ServiceResult<Vec<OrderSummary>> {
        authorize(identity, Action::ViewOrder, None)?;

        let orders = self.orders.list_by_status(status, limit).await?;
        Ok(orders.iter().map(OrderSummary::from).collect())
    }

    // =========================================================================
    // Internals
    // =========================================================================

    async fn load_order(&self, order_id: &str) -> ServiceResult<Order> {
        self.orders
            .get(order_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Order", order_id))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::NewOrderLine;
    use crate::store::memory::MemoryStore;

    fn service() -> (Arc<MemoryStore>, OrderService) {
        let store = Arc::new(MemoryStore::new());
        let svc = OrderService::new(
            store.clone() as Arc<dyn MenuStore>,
            store.clone() as Arc<dyn OrderStore>,
        );
        (store, svc)
    }

    async fn seed_item(store: &MemoryStore, id: &str, name: &str, price: i64, qty: i64) -> MenuItem {
        let now = Utc::now();
        let item = MenuItem {
            id: id.to_string(),
            name: name.to_string(),
            category: "mains".to_string(),
            price_cents: price,
            qty_on_hand: qty,
            is_active: true,
            promo_bps: None,
            promo_starts_at: None,
            promo_ends_at: None,
            created_at: now,
            updated_at: now,
        };
        MenuStore::insert(store, &item).await.unwrap();
        item
    }

    fn request(lines: &[(&str, i64)]) -> NewOrderRequest {
        NewOrderRequest {
            table_number: 7,
            items: lines
                .iter()
                .map(|&(id, quantity)| NewOrderLine {
                    menu_item_id: id.to_string(),
                    quantity,
                    customizations: None,
                })
                .collect(),
        }
    }

    /// The worked example: 2 × $12.99 → 25.98 / 2.08 / 28.06, PLACED.
    #[tokio::test]
    async fn test_create_order_worked_example() {
        let (store, svc) = service();
        seed_item(&store, "pizza", "Margherita", 1299, 10).await;

        let alice = Identity::customer("alice");
        let view = svc.create_order(&alice, request(&[("pizza", 2)])).await.unwrap();

        assert_eq!(view.status, OrderStatus::Placed);
        assert_eq!(view.subtotal_cents, 2598);
        assert_eq!(view.tax_cents, 208);
        assert_eq!(view.total_cents, 2806);
        assert!(view.placed_at.is_some());

        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].name_snapshot, "Margherita");
        assert_eq!(view.items[0].unit_price_cents, 1299);
        assert_eq!(view.items[0].line_total_cents, 2598);

        // Inventory is NOT committed at creation
        let item = MenuStore::get(&*store, "pizza").await.unwrap().unwrap();
        assert_eq!(item.qty_on_hand, 10);
    }

    /// All validation failures come back together and nothing persists.
    #[tokio::test]
    async fn test_create_order_aggregates_errors_and_aborts() {
        let (store, svc) = service();
        seed_item(&store, "pizza", "Margherita", 1299, 10).await;
        seed_item(&store, "cake", "Tiramisu", 850, 0).await;

        let alice = Identity::customer("alice");
        let err = svc
            .create_order(&alice, request(&[("pizza", 0), ("cake", 1), ("ghost", 1)]))
            .await
            .unwrap_err();

        match err {
            ServiceError::Validation { errors } => {
                let joined = errors.join("; ");
                assert!(joined.contains("positive"), "{joined}");
                assert!(joined.contains("Tiramisu is not available"), "{joined}");
                assert!(joined.contains("Menu item ghost not found"), "{joined}");
            }
            other => panic!("expected validation error, got {other:?}"),
        }

        // No partial order was persisted
        let alice_orders = svc
            .list_orders_for_customer(&alice, "alice", 10)
            .await
            .unwrap();
        assert!(alice_orders.is_empty());
    }

    #[tokio::test]
    async fn test_create_order_rejects_empty_and_bad_table() {
        let (_store, svc) = service();
        let alice = Identity::customer("alice");

        let err = svc.create_order(&alice, request(&[])).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation { .. }));

        let mut req = request(&[("pizza", 1)]);
        req.table_number = 0;
        let err = svc.create_order(&alice, req).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation { .. }));
    }

    /// An active promotion is frozen into the line at order time.
    #[tokio::test]
    async fn test_create_order_snapshots_active_promo() {
        let (store, svc) = service();
        let now = Utc::now();
        let mut item = seed_item(&store, "wine", "House Red (glass)", 1000, 50).await;
        item.promo_bps = Some(1500);
        item.promo_starts_at = Some(now - Duration::hours(1));
        item.promo_ends_at = Some(now + Duration::hours(1));
        MenuStore::update(&*store, &item).await.unwrap();

        let alice = Identity::customer("alice");
        let view = svc.create_order(&alice, request(&[("wine", 2)])).await.unwrap();

        assert_eq!(view.items[0].percent_off_bps, 1500);
        assert_eq!(view.items[0].unit_price_cents, 1000);
        // $20.00 at 15% off → $17.00
        assert_eq!(view.items[0].line_total_cents, 1700);
        assert_eq!(view.subtotal_cents, 1700);
        assert_eq!(view.total_cents, view.subtotal_cents + view.tax_cents);
    }

    /// Creation sweeps drafts older than 30 minutes.
    #[tokio::test]
    async fn test_create_order_sweeps_stale_drafts() {
        let (store, svc) = service();
        let menu_item = seed_item(&store, "pizza", "Margherita", 1299, 10).await;

        let stale_created = Utc::now() - Duration::minutes(45);
        let stale = Order {
            id: "stale-draft".to_string(),
            customer_id: "bob".to_string(),
            table_number: 3,
            status: OrderStatus::Draft,
            subtotal_cents: 1299,
            tax_cents: 104,
            service_charge_cents: 0,
            tip_cents: 0,
            total_cents: 1403,
            payment_mode: PaymentMode::Cash,
            payment_status: PaymentStatus::Unpaid,
            placed_at: None,
            closed_at: None,
            created_at: stale_created,
            updated_at: stale_created,
        };
        let stale_items = vec![OrderItem {
            id: "stale-line".to_string(),
            order_id: stale.id.clone(),
            menu_item_id: menu_item.id.clone(),
            name_snapshot: menu_item.name.clone(),
            unit_price_cents: menu_item.price_cents,
            quantity: 1,
            percent_off_bps: 0,
            line_total_cents: menu_item.price_cents,
            customizations: None,
            created_at: stale_created,
        }];
        OrderStore::insert_order_with_items(&*store, &stale, &stale_items)
            .await
            .unwrap();

        let alice = Identity::customer("alice");
        svc.create_order(&alice, request(&[("pizza", 1)])).await.unwrap();

        assert!(OrderStore::get(&*store, "stale-draft").await.unwrap().is_none());
        assert!(OrderStore::get_items(&*store, "stale-draft").await.unwrap().is_empty());
    }

    /// PLACED → IN_KITCHEN decrements each line's stock exactly once.
    #[tokio::test]
    async fn test_kitchen_entry_decrements_inventory_once() {
        let (store, svc) = service();
        seed_item(&store, "pizza", "Margherita", 1299, 10).await;
        seed_item(&store, "cake", "Tiramisu", 850, 5).await;

        let alice = Identity::customer("alice");
        let staff = Identity::staff("carol");

        let view = svc
            .create_order(&alice, request(&[("pizza", 3), ("cake", 2)]))
            .await
            .unwrap();

        let updated = svc
            .update_order_status(&staff, &view.id, OrderStatus::InKitchen)
            .await
            .unwrap();
        assert_eq!(updated.status, OrderStatus::InKitchen);

        assert_eq!(MenuStore::get(&*store, "pizza").await.unwrap().unwrap().qty_on_hand, 7);
        assert_eq!(MenuStore::get(&*store, "cake").await.unwrap().unwrap().qty_on_hand, 3);

        // A replay is rejected by the transition table; stock is untouched
        let err = svc
            .update_order_status(&staff, &view.id, OrderStatus::InKitchen)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Transition { .. }));
        assert_eq!(MenuStore::get(&*store, "pizza").await.unwrap().unwrap().qty_on_hand, 7);
    }

    /// Stock gone by kitchen time: the commit reports both numbers and
    /// leaves everything untouched.
    #[tokio::test]
    async fn test_kitchen_entry_insufficient_stock() {
        let (store, svc) = service();
        seed_item(&store, "fish", "Branzino", 2450, 10).await;

        let alice = Identity::customer("alice");
        let staff = Identity::staff("carol");

        let view = svc.create_order(&alice, request(&[("fish", 4)])).await.unwrap();

        // Stock drains between placement and kitchen entry
        MenuStore::adjust_stock(&*store, "fish", -9).await.unwrap();

        let err = svc
            .update_order_status(&staff, &view.id, OrderStatus::InKitchen)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("available 1, requested 4"), "{err}");

        let order = OrderStore::get(&*store, &view.id).await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Placed);
        assert_eq!(MenuStore::get(&*store, "fish").await.unwrap().unwrap().qty_on_hand, 1);
    }

    #[tokio::test]
    async fn test_update_status_requires_staff() {
        let (store, svc) = service();
        seed_item(&store, "pizza", "Margherita", 1299, 10).await;

        let alice = Identity::customer("alice");
        let view = svc.create_order(&alice, request(&[("pizza", 1)])).await.unwrap();

        let err = svc
            .update_order_status(&alice, &view.id, OrderStatus::InKitchen)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Authorization(_)));
    }

    /// Unlisted transitions are rejected with both states in the message.
    #[tokio::test]
    async fn test_illegal_transitions_rejected() {
        let (store, svc) = service();
        seed_item(&store, "pizza", "Margherita", 1299, 10).await;

        let alice = Identity::customer("alice");
        let staff = Identity::staff("carol");
        let view = svc.create_order(&alice, request(&[("pizza", 1)])).await.unwrap();

        for bad in [OrderStatus::Ready, OrderStatus::Served, OrderStatus::Closed] {
            let err = svc
                .update_order_status(&staff, &view.id, bad)
                .await
                .unwrap_err();
            let msg = err.to_string();
            assert!(msg.contains("placed"), "{msg}");
            assert!(msg.contains(bad.as_str()), "{msg}");
        }
    }

    #[tokio::test]
    async fn test_cancel_is_terminal() {
        let (store, svc) = service();
        seed_item(&store, "pizza", "Margherita", 1299, 10).await;

        let alice = Identity::customer("alice");
        let staff = Identity::staff("carol");
        let view = svc.create_order(&alice, request(&[("pizza", 1)])).await.unwrap();

        let cancelled = svc
            .update_order_status(&staff, &view.id, OrderStatus::Cancelled)
            .await
            .unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);

        // Cancellation never touched inventory
        assert_eq!(MenuStore::get(&*store, "pizza").await.unwrap().unwrap().qty_on_hand, 10);

        let err = svc
            .update_order_status(&staff, &view.id, OrderStatus::InKitchen)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Transition { .. }));
    }

    /// Full happy path to CLOSED; closed_at is stamped only at the end.
    #[tokio::test]
    async fn test_full_lifecycle_stamps_closed_at() {
        let (store, svc) = service();
        seed_item(&store, "pizza", "Margherita", 1299, 10).await;

        let alice = Identity::customer("alice");
        let staff = Identity::staff("carol");
        let view = svc.create_order(&alice, request(&[("pizza", 1)])).await.unwrap();

        for next in [OrderStatus::InKitchen, OrderStatus::Ready, OrderStatus::Served] {
            let updated = svc.update_order_status(&staff, &view.id, next).await.unwrap();
            assert_eq!(updated.status, next);
            assert!(updated.closed_at.is_none());
        }

        let closed = svc
            .update_order_status(&staff, &view.id, OrderStatus::Closed)
            .await
            .unwrap();
        assert_eq!(closed.status, OrderStatus::Closed);
        assert!(closed.closed_at.is_some());
    }

    /// Customers read their own orders; other customers are refused;
    /// staff read anything.
    #[tokio::test]
    async fn test_get_order_access_policy() {
        let (store, svc) = service();
        seed_item(&store, "pizza", "Margherita", 1299, 10).await;

        let alice = Identity::customer("alice");
        let bob = Identity::customer("bob");
        let staff = Identity::staff("carol");

        let view = svc.create_order(&alice, request(&[("pizza", 1)])).await.unwrap();

        assert!(svc.get_order(&alice, &view.id).await.is_ok());
        assert!(svc.get_order(&staff, &view.id).await.is_ok());

        let err = svc.get_order(&bob, &view.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::Authorization(_)));

        let err = svc.get_order(&alice, "missing").await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
    }

    /// Two status reads with no mutation in between are identical.
    #[tokio::test]
    async fn test_get_order_status_idempotent() {
        let (store, svc) = service();
        seed_item(&store, "pizza", "Margherita", 1299, 10).await;

        let alice = Identity::customer("alice");
        let view = svc.create_order(&alice, request(&[("pizza", 1)])).await.unwrap();

        let first = svc.get_order_status(&alice, &view.id).await.unwrap();
        let second = svc.get_order_status(&alice, &view.id).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.status, OrderStatus::Placed);
    }

    /// The defensive confirm path: validates ownership, re-checks the
    /// catalog, and shares the placement step with creation.
    #[tokio::test]
    async fn test_confirm_order_recovers_stranded_draft() {
        let (store, svc) = service();
        let menu_item = seed_item(&store, "pizza", "Margherita", 1299, 10).await;

        // A draft stranded by a failed placement stamp
        let now = Utc::now();
        let draft = Order {
            id: "draft-1".to_string(),
            customer_id: "alice".to_string(),
            table_number: 4,
            status: OrderStatus::Draft,
            subtotal_cents: 1299,
            tax_cents: 104,
            service_charge_cents: 0,
            tip_cents: 0,
            total_cents: 1403,
            payment_mode: PaymentMode::Cash,
            payment_status: PaymentStatus::Unpaid,
            placed_at: None,
            closed_at: None,
            created_at: now,
            updated_at: now,
        };
        let draft_items = vec![OrderItem {
            id: "line-1".to_string(),
            order_id: draft.id.clone(),
            menu_item_id: menu_item.id.clone(),
            name_snapshot: menu_item.name.clone(),
            unit_price_cents: menu_item.price_cents,
            quantity: 1,
            percent_off_bps: 0,
            line_total_cents: menu_item.price_cents,
            customizations: None,
            created_at: now,
        }];
        OrderStore::insert_order_with_items(&*store, &draft, &draft_items)
            .await
            .unwrap();

        // Another customer cannot confirm it
        let bob = Identity::customer("bob");
        let err = svc.confirm_order(&bob, "draft-1").await.unwrap_err();
        assert!(matches!(err, ServiceError::Authorization(_)));

        // The owner can
        let alice = Identity::customer("alice");
        let view = svc.confirm_order(&alice, "draft-1").await.unwrap();
        assert_eq!(view.status, OrderStatus::Placed);
        assert!(view.placed_at.is_some());

        // Confirming again is an illegal transition (placed -> placed)
        let err = svc.confirm_order(&alice, "draft-1").await.unwrap_err();
        assert!(matches!(err, ServiceError::Transition { .. }));
    }

    /// Confirm re-validates against the live catalog.
    #[tokio::test]
    async fn test_confirm_order_revalidates_catalog() {
        let (store, svc) = service();
        let menu_item = seed_item(&store, "pizza", "Margherita", 1299, 10).await;

        let now = Utc::now();
        let draft = Order {
            id: "draft-2".to_string(),
            customer_id: "alice".to_string(),
            table_number: 4,
            status: OrderStatus::Draft,
            subtotal_cents: 1299,
            tax_cents: 104,
            service_charge_cents: 0,
            tip_cents: 0,
            total_cents: 1403,
            payment_mode: PaymentMode::Cash,
            payment_status: PaymentStatus::Unpaid,
            placed_at: None,
            closed_at: None,
            created_at: now,
            updated_at: now,
        };
        let draft_items = vec![OrderItem {
            id: "line-2".to_string(),
            order_id: draft.id.clone(),
            menu_item_id: menu_item.id.clone(),
            name_snapshot: menu_item.name.clone(),
            unit_price_cents: menu_item.price_cents,
            quantity: 1,
            percent_off_bps: 0,
            line_total_cents: menu_item.price_cents,
            customizations: None,
            created_at: now,
        }];
        OrderStore::insert_order_with_items(&*store, &draft, &draft_items)
            .await
            .unwrap();

        // The item was deactivated since the draft was created
        MenuStore::set_active(&*store, "pizza", false).await.unwrap();

        let alice = Identity::customer("alice");
        let err = svc.confirm_order(&alice, "draft-2").await.unwrap_err();
        match err {
            ServiceError::Validation { errors } => {
                assert!(errors.iter().any(|e| e.contains("not currently on the menu")));
            }
            other => panic!("expected validation error, got {other:?}"),
        }

        // Still a draft; nothing was placed
        let order = OrderStore::get(&*store, "draft-2").await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Draft);
    }

    #[tokio::test]
    async fn test_list_policies() {
        let (store, svc) = service();
        seed_item(&store, "pizza", "Margherita", 1299, 10).await;

        let alice = Identity::customer("alice");
        let bob = Identity::customer("bob");
        let staff = Identity::staff("carol");

        svc.create_order(&alice, request(&[("pizza", 1)])).await.unwrap();
        svc.create_order(&alice, request(&[("pizza", 2)])).await.unwrap();

        assert_eq!(
            svc.list_orders_for_customer(&alice, "alice", 10).await.unwrap().len(),
            2
        );
        assert!(svc.list_orders_for_customer(&bob, "alice", 10).await.is_err());
        assert_eq!(
            svc.list_orders_for_customer(&staff, "alice", 10).await.unwrap().len(),
            2
        );

        // Status listing is a staff view
        assert!(svc.list_orders_by_status(&alice, OrderStatus::Placed, 10).await.is_err());
        assert_eq!(
            svc.list_orders_by_status(&staff, OrderStatus::Placed, 10)
                .await
                .unwrap()
                .len(),
            2
        );
    }
}
