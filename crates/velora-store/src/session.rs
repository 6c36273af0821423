//! # Session Cart Registry
//!
//! Per-session cart storage.
//!
//! ## Thread Safety
//! The registry is wrapped in a `Mutex` because:
//! 1. Multiple service calls may touch carts concurrently
//! 2. Only one call should modify a cart at a time
//!
//! A session id is the external cart handle supplied by the (out of scope)
//! session/identity provider. Carts are not shared across sessions and
//! have no durability beyond the registry's lifetime.
//!
//! ## Why Not RwLock?
//! Cart operations are quick and most of them modify state. A RwLock
//! would add complexity with minimal benefit.

use std::collections::HashMap;
use std::sync::Mutex;

use velora_core::Cart;

/// Registry of session-scoped carts.
#[derive(Debug, Default)]
pub struct SessionCarts {
    carts: Mutex<HashMap<String, Cart>>,
}

impl SessionCarts {
    /// Creates an empty registry.
    pub fn new() -> Self {
        SessionCarts {
            carts: Mutex::new(HashMap::new()),
        }
    }

    /// Executes a function with read access to a session's cart.
    ///
    /// An unknown session reads as an empty cart; no entry is created.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let subtotal = carts.with_cart("session-1", |cart| cart.subtotal_cents());
    /// ```
    pub fn with_cart<F, R>(&self, session_id: &str, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let carts = self.carts.lock().expect("cart registry mutex poisoned");
        match carts.get(session_id) {
            Some(cart) => f(cart),
            None => f(&Cart::new()),
        }
    }

    /// Executes a function with write access to a session's cart,
    /// creating the cart on first use.
    ///
    /// The closure runs under the registry lock; callers never hold it
    /// across an `.await`.
    pub fn with_cart_mut<F, R>(&self, session_id: &str, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut carts = self.carts.lock().expect("cart registry mutex poisoned");
        let cart = carts.entry(session_id.to_string()).or_default();
        f(cart)
    }

    /// Drops a session's cart entirely (session ended).
    pub fn remove_session(&self, session_id: &str) {
        let mut carts = self.carts.lock().expect("cart registry mutex poisoned");
        carts.remove(session_id);
    }

    /// Returns the number of sessions with a cart entry.
    pub fn session_count(&self) -> usize {
        let carts = self.carts.lock().expect("cart registry mutex poisoned");
        carts.len()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use velora_core::Product;

    fn test_product(id: &str) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            brand: "Velora".to_string(),
            category: "t-shirt".to_string(),
            description: None,
            price_cents: 10000,
            image_url: None,
            size: None,
            color: None,
            stock: 10,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_unknown_session_reads_empty() {
        let carts = SessionCarts::new();

        let is_empty = carts.with_cart("nobody", |c| c.is_empty());
        assert!(is_empty);
        // Read access must not create an entry
        assert_eq!(carts.session_count(), 0);
    }

    #[test]
    fn test_sessions_are_isolated() {
        let carts = SessionCarts::new();
        let product = test_product("p1");

        carts.with_cart_mut("alice", |c| c.add_line(&product, "M", "Black", 1).unwrap());

        assert_eq!(carts.with_cart("alice", |c| c.line_count()), 1);
        assert_eq!(carts.with_cart("bob", |c| c.line_count()), 0);
    }

    #[test]
    fn test_remove_session_drops_cart() {
        let carts = SessionCarts::new();
        let product = test_product("p1");

        carts.with_cart_mut("alice", |c| c.add_line(&product, "M", "Black", 1).unwrap());
        assert_eq!(carts.session_count(), 1);

        carts.remove_session("alice");
        assert_eq!(carts.session_count(), 0);
        assert!(carts.with_cart("alice", |c| c.is_empty()));
    }
}
