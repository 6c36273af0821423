//! # Cart Service
//!
//! Cart flows that combine the session registry with the live catalog.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────────┐                    │
//! │  │  Empty   │────►│  Lines   │────►│  Checked out │                    │
//! │  │  Cart    │     │  in cart │     │  (orders)    │                    │
//! │  └──────────┘     └──────────┘     └──────────────┘                    │
//! │                        │                  ▲                             │
//! │                   add()                   │                             │
//! │                   update_quantity()   CheckoutEngine                    │
//! │                   remove()            (checkout.rs)                     │
//! │                        │                                                │
//! │                        ▼                                                │
//! │                   clear() ───────────────────► (back to empty)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Stock is read for validation only; nothing here mutates inventory.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{AddStockPolicy, StoreConfig};
use crate::error::StoreResult;
use crate::session::SessionCarts;
use velora_core::validation::validate_quantity;
use velora_core::{Cart, CartLine, CoreError, VariantKey};
use velora_db::Database;

// =============================================================================
// Views
// =============================================================================

/// One cart line annotated with its rendered key, as shown to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineView {
    /// Rendered variant key (`product_id|size|color`) for referencing the
    /// line in update/remove/checkout calls.
    pub key: String,
    pub product_id: String,
    pub name: String,
    pub unit_price_cents: i64,
    pub image_url: Option<String>,
    pub size: String,
    pub color: String,
    pub quantity: i64,
    pub line_total_cents: i64,
}

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        CartLineView {
            key: line.key().to_string(),
            product_id: line.product_id.clone(),
            name: line.name.clone(),
            unit_price_cents: line.unit_price_cents,
            image_url: line.image_url.clone(),
            size: line.size.clone(),
            color: line.color.clone(),
            quantity: line.quantity,
            line_total_cents: line.line_total_cents(),
        }
    }
}

/// Cart contents plus totals, in insertion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    /// Subtotal over ALL lines, not just a selection.
    pub subtotal_cents: i64,
    pub line_count: usize,
    pub total_quantity: i64,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        CartView {
            lines: cart.lines().iter().map(CartLineView::from).collect(),
            subtotal_cents: cart.subtotal_cents(),
            line_count: cart.line_count(),
            total_quantity: cart.total_quantity(),
        }
    }
}

// =============================================================================
// Cart Service
// =============================================================================

/// Session cart operations backed by the live catalog for stock checks.
#[derive(Debug, Clone)]
pub struct CartService {
    db: Database,
    carts: Arc<SessionCarts>,
    policy: AddStockPolicy,
}

impl CartService {
    /// Creates a cart service.
    pub fn new(db: Database, carts: Arc<SessionCarts>, config: &StoreConfig) -> Self {
        CartService {
            db,
            carts,
            policy: config.add_stock_policy,
        }
    }

    /// Adds a variant to the session's cart.
    ///
    /// ## Behavior
    /// - Variant already in cart: quantity increases (one line per variant)
    /// - New variant: a line is added snapshotting name/price/image
    /// - Fails with `OutOfStock` when current stock can't cover the request
    ///
    /// Which quantity is checked against stock depends on
    /// [`AddStockPolicy`]; see `config.rs`.
    pub async fn add(
        &self,
        session_id: &str,
        product_id: &str,
        size: &str,
        color: &str,
        quantity: i64,
    ) -> StoreResult<CartView> {
        debug!(session_id = %session_id, product_id = %product_id, quantity = %quantity, "cart add");

        validate_quantity(quantity)?;

        let product = self
            .db
            .products()
            .get_by_id(product_id)
            .await?
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;

        let key = VariantKey::new(product_id, size, color);
        let requested = match self.policy {
            AddStockPolicy::RequestedOnly => quantity,
            AddStockPolicy::CombinedTotal => {
                let existing = self
                    .carts
                    .with_cart(session_id, |c| c.line(&key).map_or(0, |l| l.quantity));
                existing + quantity
            }
        };

        if !product.can_fulfill(requested) {
            return Err(CoreError::OutOfStock {
                name: product.name.clone(),
                available: product.stock,
                requested,
            }
            .into());
        }

        let view = self.carts.with_cart_mut(session_id, |cart| {
            cart.add_line(&product, size, color, quantity)?;
            Ok::<CartView, CoreError>(CartView::from(&*cart))
        })?;

        info!(session_id = %session_id, key = %key, quantity = %quantity, "Added to cart");
        Ok(view)
    }

    /// Returns the session's cart with per-line keys and the subtotal.
    pub fn list(&self, session_id: &str) -> CartView {
        debug!(session_id = %session_id, "cart list");
        self.carts.with_cart(session_id, |c| CartView::from(c))
    }

    /// Overwrites a line's quantity after re-checking current stock.
    ///
    /// ## Behavior
    /// - Quantity must be >= 1 (`ValidationError` otherwise; the line
    ///   keeps its prior quantity)
    /// - Stale key: `LineNotFound`
    /// - Current stock below the new quantity: `OutOfStock`
    pub async fn update_quantity(
        &self,
        session_id: &str,
        key: &VariantKey,
        quantity: i64,
    ) -> StoreResult<CartView> {
        debug!(session_id = %session_id, key = %key, quantity = %quantity, "cart update");

        validate_quantity(quantity)?;

        let line = self
            .carts
            .with_cart(session_id, |c| c.line(key).cloned())
            .ok_or_else(|| CoreError::LineNotFound(key.to_string()))?;

        let product = self
            .db
            .products()
            .get_by_id(&line.product_id)
            .await?
            .ok_or_else(|| CoreError::ProductNotFound(line.product_id.clone()))?;

        if !product.can_fulfill(quantity) {
            return Err(CoreError::OutOfStock {
                name: product.name.clone(),
                available: product.stock,
                requested: quantity,
            }
            .into());
        }

        let view = self.carts.with_cart_mut(session_id, |cart| {
            cart.set_quantity(key, quantity)?;
            Ok::<CartView, CoreError>(CartView::from(&*cart))
        })?;

        info!(session_id = %session_id, key = %key, quantity = %quantity, "Cart line updated");
        Ok(view)
    }

    /// Removes a line by key. Removing an absent key succeeds and leaves
    /// the cart unchanged.
    pub fn remove(&self, session_id: &str, key: &VariantKey) -> CartView {
        let removed = self
            .carts
            .with_cart_mut(session_id, |cart| cart.remove(key));

        if removed {
            info!(session_id = %session_id, key = %key, "Removed from cart");
        } else {
            debug!(session_id = %session_id, key = %key, "Remove on absent key (no-op)");
        }

        self.list(session_id)
    }

    /// Clears the session's cart.
    pub fn clear(&self, session_id: &str) -> CartView {
        info!(session_id = %session_id, "Clearing cart");
        self.carts.with_cart_mut(session_id, |cart| {
            cart.clear();
            CartView::from(&*cart)
        })
    }
}
