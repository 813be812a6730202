//! # Menu Service
//!
//! Menu catalog management. Reads are public (the catalog is what
//! customers order from); every mutation - create, update, deactivate,
//! restock - is staff-gated through the access policy.
//!
//! Deactivation is a soft delete: historical order items keep their
//! snapshots, and an item removed by mistake can be reactivated.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use brigade_core::policy::{authorize, Action};
use brigade_core::validation::{
    validate_menu_item_name, validate_price_cents, validate_promo_bps,
};
use brigade_core::{Identity, MenuItem};

use crate::dto::{NewMenuItemRequest, UpdateMenuItemRequest};
use crate::error::{ServiceError, ServiceResult};
use crate::store::MenuStore;

/// Menu catalog service.
pub struct MenuService {
    menu: Arc<dyn MenuStore>,
}

impl MenuService {
    /// Creates a new MenuService over the given store.
    pub fn new(menu: Arc<dyn MenuStore>) -> Self {
        MenuService { menu }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Lists the active menu, ordered by category then name.
    pub async fn list_menu(&self, limit: u32) -> ServiceResult<Vec<MenuItem>> {
        Ok(self.menu.list_active(limit).await?)
    }

    /// Gets one menu item.
    pub async fn get_item(&self, id: &str) -> ServiceResult<MenuItem> {
        self.menu
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Menu item", id))
    }

    // =========================================================================
    // Mutations (staff only)
    // =========================================================================

    /// Creates a menu item.
    pub async fn create_item(
        &self,
        identity: &Identity,
        req: NewMenuItemRequest,
    ) -> ServiceResult<MenuItem> {
        authorize(identity, Action::ManageMenu, None)?;

        self.check_fields(&req.name, req.price_cents, req.promo_bps)?;
        if req.qty_on_hand < 0 {
            return Err(ServiceError::invalid("qty_on_hand must not be negative"));
        }

        let now = Utc::now();
        let item = MenuItem {
            id: Uuid::new_v4().to_string(),
            name: req.name.trim().to_string(),
            category: req.category.trim().to_string(),
            price_cents: req.price_cents,
            qty_on_hand: req.qty_on_hand,
            is_active: true,
            promo_bps: req.promo_bps,
            promo_starts_at: req.promo_starts_at,
            promo_ends_at: req.promo_ends_at,
            created_at: now,
            updated_at: now,
        };

        self.menu.insert(&item).await?;

        info!(id = %item.id, name = %item.name, "Menu item created");
        Ok(item)
    }

    /// Applies a partial update to a menu item; absent fields are left
    /// unchanged. Price changes never touch existing orders (snapshots).
    pub async fn update_item(
        &self,
        identity: &Identity,
        id: &str,
        req: UpdateMenuItemRequest,
    ) -> ServiceResult<MenuItem> {
        authorize(identity, Action::ManageMenu, None)?;

        let mut item = self.get_item(id).await?;

        if let Some(name) = req.name {
            item.name = name.trim().to_string();
        }
        if let Some(category) = req.category {
            item.category = category.trim().to_string();
        }
        if let Some(price_cents) = req.price_cents {
            item.price_cents = price_cents;
        }
        if let Some(promo_bps) = req.promo_bps {
            item.promo_bps = promo_bps;
        }
        if let Some(promo_starts_at) = req.promo_starts_at {
            item.promo_starts_at = promo_starts_at;
        }
        if let Some(promo_ends_at) = req.promo_ends_at {
            item.promo_ends_at = promo_ends_at;
        }

        self.check_fields(&item.name, item.price_cents, item.promo_bps)?;

        item.updated_at = Utc::now();
        self.menu.update(&item).await?;

        info!(id = %item.id, "Menu item updated");
        Ok(item)
    }

    /// Deactivates a menu item (soft delete).
    pub async fn deactivate_item(&self, identity: &Identity, id: &str) -> ServiceResult<()> {
        authorize(identity, Action::ManageMenu, None)?;
        self.menu.set_active(id, false).await?;

        info!(id = %id, "Menu item deactivated");
        Ok(())
    }

    /// Reactivates a previously deactivated menu item.
    pub async fn reactivate_item(&self, identity: &Identity, id: &str) -> ServiceResult<()> {
        authorize(identity, Action::ManageMenu, None)?;
        self.menu.set_active(id, true).await?;

        info!(id = %id, "Menu item reactivated");
        Ok(())
    }

    /// Adds stock for a menu item.
    pub async fn restock(
        &self,
        identity: &Identity,
        id: &str,
        quantity: i64,
    ) -> ServiceResult<MenuItem> {
        authorize(identity, Action::ManageMenu, None)?;

        if quantity <= 0 {
            return Err(ServiceError::invalid("Restock quantity must be positive"));
        }

        self.menu.adjust_stock(id, quantity).await?;

        info!(id = %id, quantity = quantity, "Menu item restocked");
        self.get_item(id).await
    }

    fn check_fields(
        &self,
        name: &str,
        price_cents: i64,
        promo_bps: Option<u32>,
    ) -> ServiceResult<()> {
        let mut errors = Vec::new();

        if let Err(e) = validate_menu_item_name(name) {
            errors.push(e.to_string());
        }
        if let Err(e) = validate_price_cents(price_cents) {
            errors.push(e.to_string());
        }
        if let Some(bps) = promo_bps {
            if let Err(e) = validate_promo_bps(bps) {
                errors.push(e.to_string());
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ServiceError::Validation { errors })
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
