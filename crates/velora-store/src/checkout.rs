//! # Checkout Engine
//!
//! Converts selected cart lines into persisted orders.
//!
//! ## Checkout Phases
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Checkout Phases                                    │
//! │                                                                         │
//! │  1. VALIDATE                                                            │
//! │     └── order details (payment method, address, name, contact)          │
//! │                                                                         │
//! │  2. RESOLVE TARGET SET                                                  │
//! │     └── no keys supplied   → every cart line                            │
//! │     └── keys supplied      → intersection with current cart lines       │
//! │     └── EmptyCart / NoValidSelection when nothing remains               │
//! │                                                                         │
//! │  3. PRE-FLIGHT (all-or-nothing gate, read-only)                         │
//! │     └── every target line's product must exist with enough stock        │
//! │     └── ANY failure fails the WHOLE checkout before any write           │
//! │                                                                         │
//! │  4. COMMIT (one transaction)                                            │
//! │     └── per line: insert order + guarded stock decrement                │
//! │     └── a failed guard rolls the whole transaction back                 │
//! │                                                                         │
//! │  5. REWRITE CART                                                        │
//! │     └── remove exactly the committed lines; the rest stay untouched     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Why both a pre-flight AND a guarded decrement?
//! The pre-flight gives the whole-selection answer before anything is
//! written. But another session can sell the same stock between the
//! pre-flight read and the commit write; the conditional decrement
//! (`stock >= quantity`) re-checks at write time and aborts the
//! transaction on a lost race, so stock can never go negative and no
//! partial order set survives.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::StoreResult;
use crate::session::SessionCarts;
use velora_core::validation::{validate_order_details, validate_quantity};
use velora_core::{CartLine, CoreError, Order, OrderDetails, OrderStatus, ValidationError, VariantKey};
use velora_db::repository::order::OrderRepository;
use velora_db::repository::product::ProductRepository;
use velora_db::{Database, DbError, StockDecrement};

/// Result of a successful checkout.
#[derive(Debug, Clone)]
pub struct CheckoutReceipt {
    /// The created orders, in cart insertion order.
    pub orders: Vec<Order>,
}

impl CheckoutReceipt {
    /// Number of orders created.
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    /// Sum of the order totals in centavos.
    pub fn total_cents(&self) -> i64 {
        self.orders.iter().map(|o| o.total_amount_cents).sum()
    }
}

/// The checkout engine: session cart in, persisted orders out.
#[derive(Debug, Clone)]
pub struct CheckoutEngine {
    db: Database,
    carts: Arc<SessionCarts>,
}

impl CheckoutEngine {
    /// Creates a checkout engine.
    pub fn new(db: Database, carts: Arc<SessionCarts>) -> Self {
        CheckoutEngine { db, carts }
    }

    /// Checks out the session's cart, or a selected subset of it.
    ///
    /// ## Arguments
    /// * `session_id` - Cart handle from the session provider
    /// * `selected_keys` - `None` targets every line; `Some` targets the
    ///   intersection of the keys with current cart lines
    /// * `details` - Delivery and payment details for all created orders
    /// * `user_id` - Acting user, for order attribution
    ///
    /// ## Guarantees
    /// - Any failure leaves the cart and all stock levels unmodified
    /// - On success exactly the targeted lines leave the cart; the rest
    ///   keep their quantity, price, size and color
    /// - Each order's total is the line's snapshot price × quantity
    pub async fn checkout(
        &self,
        session_id: &str,
        selected_keys: Option<&[VariantKey]>,
        details: &OrderDetails,
        user_id: &str,
    ) -> StoreResult<CheckoutReceipt> {
        debug!(session_id = %session_id, user_id = %user_id, "checkout requested");

        // Phase 1: input validation, before anything is read or written.
        validate_order_details(details)?;

        // Phase 2: resolve the target set against a snapshot of the cart.
        let lines = self.carts.with_cart(session_id, |c| c.lines().to_vec());

        if lines.is_empty() {
            return Err(CoreError::EmptyCart.into());
        }

        let targets: Vec<CartLine> = match selected_keys {
            None => lines,
            Some(keys) => lines
                .into_iter()
                .filter(|line| keys.contains(&line.key()))
                .collect(),
        };

        if targets.is_empty() {
            return Err(CoreError::NoValidSelection.into());
        }

        // Phase 3: pre-flight stock check over ALL targets before any
        // mutation. One failing line fails the whole request.
        let products = self.db.products();
        for line in &targets {
            let product = products.get_by_id(&line.product_id).await?;
            let available = product.as_ref().map_or(0, |p| p.stock);
            if product.is_none() || available < line.quantity {
                debug!(key = %line.key(), available, requested = line.quantity, "pre-flight failed");
                return Err(CoreError::InsufficientStock {
                    name: line.name.clone(),
                    available,
                    requested: line.quantity,
                }
                .into());
            }
        }

        // Phase 4: commit. One transaction covers every order insert and
        // stock decrement; a lost race on any line rolls back all of it.
        let mut tx = self.db.begin().await?;

        let mut orders = Vec::with_capacity(targets.len());
        for line in &targets {
            let order = build_order(
                user_id,
                &line.product_id,
                details,
                line.unit_price_cents * line.quantity,
                &line.size,
                &line.color,
                line.quantity,
            );
            OrderRepository::insert_tx(&mut tx, &order).await?;

            let outcome =
                ProductRepository::decrement_stock_tx(&mut tx, &line.product_id, line.quantity)
                    .await?;
            if let StockDecrement::Insufficient { available } = outcome {
                // Lost the race against a concurrent checkout.
                warn!(key = %line.key(), available, requested = line.quantity,
                      "stock changed under checkout, rolling back");
                tx.rollback()
                    .await
                    .map_err(|e| DbError::TransactionFailed(e.to_string()))?;
                return Err(CoreError::InsufficientStock {
                    name: line.name.clone(),
                    available,
                    requested: line.quantity,
                }
                .into());
            }

            orders.push(order);
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        // Phase 5: rewrite the cart. Only now, with the orders durable,
        // do the committed lines leave the cart; the rest stay as-is.
        self.carts.with_cart_mut(session_id, |cart| {
            for line in &targets {
                cart.remove(&line.key());
            }
        });

        info!(
            session_id = %session_id,
            user_id = %user_id,
            orders = orders.len(),
            total = %velora_core::Money::from_cents(orders.iter().map(|o| o.total_amount_cents).sum()),
            "Checkout complete"
        );

        Ok(CheckoutReceipt { orders })
    }

    /// Places a single order directly, bypassing the cart ("buy now").
    ///
    /// The caller supplies the total it showed the customer; it must equal
    /// the current unit price × quantity or the order is rejected, so a
    /// stale or tampered total never reaches the order store.
    pub async fn place_order(
        &self,
        user_id: &str,
        product_id: &str,
        size: &str,
        color: &str,
        quantity: i64,
        total_amount_cents: i64,
        details: &OrderDetails,
    ) -> StoreResult<Order> {
        debug!(user_id = %user_id, product_id = %product_id, quantity = %quantity, "place_order requested");

        validate_order_details(details)?;
        validate_quantity(quantity)?;

        let product = self
            .db
            .products()
            .get_by_id(product_id)
            .await?
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;

        if !product.can_fulfill(quantity) {
            return Err(CoreError::InsufficientStock {
                name: product.name.clone(),
                available: product.stock,
                requested: quantity,
            }
            .into());
        }

        let expected = product.price_cents * quantity;
        if total_amount_cents != expected {
            return Err(ValidationError::TotalMismatch {
                supplied: total_amount_cents,
                expected,
            }
            .into());
        }

        let order = build_order(
            user_id,
            product_id,
            details,
            expected,
            size,
            color,
            quantity,
        );

        let mut tx = self.db.begin().await?;
        OrderRepository::insert_tx(&mut tx, &order).await?;

        let outcome =
            ProductRepository::decrement_stock_tx(&mut tx, product_id, quantity).await?;
        if let StockDecrement::Insufficient { available } = outcome {
            warn!(product_id = %product_id, available, requested = quantity,
                  "stock changed under place_order, rolling back");
            tx.rollback()
                .await
                .map_err(|e| DbError::TransactionFailed(e.to_string()))?;
            return Err(CoreError::InsufficientStock {
                name: product.name,
                available,
                requested: quantity,
            }
            .into());
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(order_id = %order.id, user_id = %user_id, total = %order.total_amount(), "Order placed");

        Ok(order)
    }
}

/// Builds a pending order snapshotting the given total and variant.
fn build_order(
    user_id: &str,
    product_id: &str,
    details: &OrderDetails,
    total_amount_cents: i64,
    size: &str,
    color: &str,
    quantity: i64,
) -> Order {
    let now = Utc::now();
    Order {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        product_id: product_id.to_string(),
        payment_method: details.payment_method,
        delivery_address: details.delivery_address.clone(),
        customer_name: details.customer_name.clone(),
        contact_number: details.contact_number.clone(),
        total_amount_cents,
        size: size.to_string(),
        color: color.to_string(),
        quantity,
        status: OrderStatus::Pending,
        created_at: now,
        updated_at: now,
    }
}
