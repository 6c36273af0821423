//! # Cart Module
//!
//! The variant-keyed shopping cart container.
//!
//! ## Cart Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Cart (one per session)                             │
//! │                                                                         │
//! │  VariantKey (product, size, color)      CartLine                        │
//! │  ──────────────────────────────────     ───────────────────────────     │
//! │  (P1, "M", "Black")  ───────────────►   Denim Jacket  ₱500.00  x2      │
//! │  (P2, "L", "Red")    ───────────────►   Summer Dress  ₱300.00  x1      │
//! │                                                                         │
//! │  • At most ONE line per variant key (repeat add merges quantity)        │
//! │  • Lines keep insertion order for display                               │
//! │  • Line data is a snapshot: later product edits don't touch the cart    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Why a struct key?
//! The key is a real `(product_id, size, color)` tuple with structural
//! equality. The rendered `id|size|color` form exists only for the
//! presentation layer; equality never depends on the delimiter, so a color
//! containing `|` cannot collide with another variant.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::Product;
use crate::{MAX_CART_LINES, MAX_LINE_QUANTITY};

// =============================================================================
// Variant Key
// =============================================================================

/// Identity of a cart line: one product in one size and color.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariantKey {
    pub product_id: String,
    pub size: String,
    pub color: String,
}

impl VariantKey {
    /// Creates a key from its parts.
    pub fn new(
        product_id: impl Into<String>,
        size: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        VariantKey {
            product_id: product_id.into(),
            size: size.into(),
            color: color.into(),
        }
    }
}

/// Renders the key in the `product_id|size|color` form used by the
/// presentation layer to reference cart lines.
impl fmt::Display for VariantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}|{}", self.product_id, self.size, self.color)
    }
}

impl FromStr for VariantKey {
    type Err = ValidationError;

    /// Parses the rendered form back into a structural key.
    ///
    /// Splits on the first two `|` only; a color containing `|` survives
    /// the round trip.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, '|');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(product_id), Some(size), Some(color)) if !product_id.is_empty() => {
                Ok(VariantKey::new(product_id, size, color))
            }
            _ => Err(ValidationError::InvalidFormat {
                field: "key".to_string(),
                reason: "expected product_id|size|color".to_string(),
            }),
        }
    }
}

// =============================================================================
// Cart Line
// =============================================================================

/// One entry in the cart.
///
/// ## Snapshot Pattern
/// `name`, `unit_price_cents` and `image_url` are frozen copies of the
/// product at the moment of adding. The cart displays consistent data even
/// if the product is edited afterwards; checkout re-reads the live catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Product ID (UUID), for catalog lookup at checkout.
    pub product_id: String,

    /// Product name at time of adding (frozen).
    pub name: String,

    /// Price in centavos at time of adding (frozen).
    pub unit_price_cents: i64,

    /// Image URL at time of adding (frozen).
    pub image_url: Option<String>,

    /// Chosen size (S, M, L, XL).
    pub size: String,

    /// Chosen color.
    pub color: String,

    /// Quantity in cart. Always >= 1; a zero-quantity line never exists.
    pub quantity: i64,

    /// When this line was first added to the cart.
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    /// Creates a new cart line from a product and a chosen variant.
    pub fn from_product(
        product: &Product,
        size: impl Into<String>,
        color: impl Into<String>,
        quantity: i64,
    ) -> Self {
        CartLine {
            product_id: product.id.clone(),
            name: product.name.clone(),
            unit_price_cents: product.price_cents,
            image_url: product.image_url.clone(),
            size: size.into(),
            color: color.into(),
            quantity,
            added_at: Utc::now(),
        }
    }

    /// Returns this line's variant key.
    pub fn key(&self) -> VariantKey {
        VariantKey::new(
            self.product_id.clone(),
            self.size.clone(),
            self.color.clone(),
        )
    }

    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Calculates the line total (unit price × quantity).
    #[inline]
    pub fn line_total_cents(&self) -> i64 {
        self.unit_price_cents * self.quantity
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart.
///
/// ## Invariants
/// - Lines are unique by variant key (adding the same variant merges)
/// - Quantity is always >= 1 (removal, never zeroing)
/// - Maximum lines: [`MAX_CART_LINES`]
/// - Maximum quantity per line: [`MAX_LINE_QUANTITY`]
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Lines in insertion order.
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    /// Adds a variant to the cart, merging into an existing line when the
    /// same variant is already present.
    ///
    /// ## Behavior
    /// - Variant already in cart: quantity increases by `quantity`
    /// - New variant: a line is appended with a product snapshot
    ///
    /// Stock is NOT consulted here; the cart is pure data. The service
    /// layer checks stock before calling.
    pub fn add_line(
        &mut self,
        product: &Product,
        size: &str,
        color: &str,
        quantity: i64,
    ) -> CoreResult<VariantKey> {
        let key = VariantKey::new(product.id.clone(), size, color);

        if let Some(line) = self.lines.iter_mut().find(|l| l.key() == key) {
            let merged = line.quantity + quantity;
            if merged > MAX_LINE_QUANTITY {
                return Err(CoreError::Validation(ValidationError::OutOfRange {
                    field: "quantity".to_string(),
                    min: 1,
                    max: MAX_LINE_QUANTITY,
                }));
            }
            line.quantity = merged;
            return Ok(key);
        }

        if self.lines.len() >= MAX_CART_LINES {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_LINES,
            });
        }

        self.lines
            .push(CartLine::from_product(product, size, color, quantity));
        Ok(key)
    }

    /// Overwrites the quantity of an existing line.
    ///
    /// Quantity 0 is rejected, not treated as removal; callers that want a
    /// line gone use [`Cart::remove`].
    pub fn set_quantity(&mut self, key: &VariantKey, quantity: i64) -> CoreResult<()> {
        if quantity <= 0 {
            return Err(CoreError::Validation(ValidationError::MustBePositive {
                field: "quantity".to_string(),
            }));
        }

        if quantity > MAX_LINE_QUANTITY {
            return Err(CoreError::Validation(ValidationError::OutOfRange {
                field: "quantity".to_string(),
                min: 1,
                max: MAX_LINE_QUANTITY,
            }));
        }

        match self.lines.iter_mut().find(|l| &l.key() == key) {
            Some(line) => {
                line.quantity = quantity;
                Ok(())
            }
            None => Err(CoreError::LineNotFound(key.to_string())),
        }
    }

    /// Removes a line by key. Returns whether a line was actually removed;
    /// removing an absent key is a no-op, not an error.
    pub fn remove(&mut self, key: &VariantKey) -> bool {
        let initial_len = self.lines.len();
        self.lines.retain(|l| &l.key() != key);
        self.lines.len() != initial_len
    }

    /// Looks up a line by key.
    pub fn line(&self, key: &VariantKey) -> Option<&CartLine> {
        self.lines.iter().find(|l| &l.key() == key)
    }

    /// Returns all lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Returns the keys of all lines in insertion order.
    pub fn keys(&self) -> Vec<VariantKey> {
        self.lines.iter().map(CartLine::key).collect()
    }

    /// Clears all lines from the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Returns the number of lines in the cart.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns the total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Calculates the subtotal over ALL lines (not just a selection).
    pub fn subtotal_cents(&self) -> i64 {
        self.lines.iter().map(|l| l.line_total_cents()).sum()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_product(id: &str, price_cents: i64, stock: i64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            brand: "Velora".to_string(),
            category: "t-shirt".to_string(),
            description: None,
            price_cents,
            image_url: Some(format!("https://img.example/{}.jpg", id)),
            size: None,
            color: None,
            stock,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_add_line_snapshots_product() {
        let mut cart = Cart::new();
        let product = test_product("p1", 50000, 5);

        let key = cart.add_line(&product, "M", "Black", 2).unwrap();

        let line = cart.line(&key).unwrap();
        assert_eq!(line.name, "Product p1");
        assert_eq!(line.unit_price_cents, 50000);
        assert_eq!(line.image_url.as_deref(), Some("https://img.example/p1.jpg"));
        assert_eq!(line.quantity, 2);
        assert_eq!(cart.subtotal_cents(), 100000);
    }

    #[test]
    fn test_repeat_add_merges_into_one_line() {
        // Same variant added twice collapses into a single line
        let mut cart = Cart::new();
        let product = test_product("p1", 50000, 10);

        cart.add_line(&product, "M", "Black", 2).unwrap();
        cart.add_line(&product, "M", "Black", 3).unwrap();

        assert_eq!(cart.line_count(), 1);
        let key = VariantKey::new("p1", "M", "Black");
        assert_eq!(cart.line(&key).unwrap().quantity, 5);
    }

    #[test]
    fn test_different_variants_get_distinct_lines() {
        let mut cart = Cart::new();
        let product = test_product("p1", 50000, 10);

        cart.add_line(&product, "M", "Black", 1).unwrap();
        cart.add_line(&product, "L", "Black", 1).unwrap();
        cart.add_line(&product, "M", "White", 1).unwrap();

        assert_eq!(cart.line_count(), 3);
    }

    #[test]
    fn test_lines_keep_insertion_order() {
        let mut cart = Cart::new();
        let p1 = test_product("p1", 100, 10);
        let p2 = test_product("p2", 200, 10);

        cart.add_line(&p2, "M", "Red", 1).unwrap();
        cart.add_line(&p1, "M", "Black", 1).unwrap();

        let ids: Vec<&str> = cart.lines().iter().map(|l| l.product_id.as_str()).collect();
        assert_eq!(ids, vec!["p2", "p1"]);
    }

    #[test]
    fn test_set_quantity_overwrites() {
        let mut cart = Cart::new();
        let product = test_product("p1", 50000, 10);
        let key = cart.add_line(&product, "M", "Black", 2).unwrap();

        cart.set_quantity(&key, 7).unwrap();
        assert_eq!(cart.line(&key).unwrap().quantity, 7);
    }

    #[test]
    fn test_set_quantity_zero_is_rejected() {
        // Zeroing is not removal; the line keeps its prior quantity
        let mut cart = Cart::new();
        let product = test_product("p1", 50000, 10);
        let key = cart.add_line(&product, "M", "Black", 2).unwrap();

        let err = cart.set_quantity(&key, 0).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::MustBePositive { .. })
        ));
        assert_eq!(cart.line(&key).unwrap().quantity, 2);
    }

    #[test]
    fn test_set_quantity_on_stale_key() {
        let mut cart = Cart::new();
        let key = VariantKey::new("ghost", "M", "Black");

        let err = cart.set_quantity(&key, 1).unwrap_err();
        assert!(matches!(err, CoreError::LineNotFound(_)));
    }

    #[test]
    fn test_remove_absent_key_is_noop() {
        let mut cart = Cart::new();
        let product = test_product("p1", 50000, 10);
        cart.add_line(&product, "M", "Black", 2).unwrap();

        let removed = cart.remove(&VariantKey::new("ghost", "M", "Black"));
        assert!(!removed);
        assert_eq!(cart.line_count(), 1);
    }

    #[test]
    fn test_remove_deletes_only_that_line() {
        let mut cart = Cart::new();
        let p1 = test_product("p1", 100, 10);
        let p2 = test_product("p2", 200, 10);
        let key1 = cart.add_line(&p1, "M", "Black", 1).unwrap();
        cart.add_line(&p2, "L", "Red", 1).unwrap();

        assert!(cart.remove(&key1));
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.lines()[0].product_id, "p2");
    }

    #[test]
    fn test_variant_key_display_and_parse() {
        let key = VariantKey::new("p1", "M", "Black");
        assert_eq!(key.to_string(), "p1|M|Black");

        let parsed: VariantKey = "p1|M|Black".parse().unwrap();
        assert_eq!(parsed, key);
    }

    #[test]
    fn test_variant_key_color_with_delimiter() {
        // The first two separators bind; the color keeps the rest verbatim
        let parsed: VariantKey = "p1|M|Black|White".parse().unwrap();
        assert_eq!(parsed.color, "Black|White");
        assert_eq!(parsed, VariantKey::new("p1", "M", "Black|White"));
    }

    #[test]
    fn test_variant_key_rejects_malformed_input() {
        assert!("p1|M".parse::<VariantKey>().is_err());
        assert!("|M|Black".parse::<VariantKey>().is_err());
    }

    #[test]
    fn test_cart_line_cap() {
        let mut cart = Cart::new();
        for i in 0..MAX_CART_LINES {
            let product = test_product(&format!("p{}", i), 100, 10);
            cart.add_line(&product, "M", "Black", 1).unwrap();
        }

        let overflow = test_product("poverflow", 100, 10);
        let err = cart.add_line(&overflow, "M", "Black", 1).unwrap_err();
        assert!(matches!(err, CoreError::CartTooLarge { .. }));
    }
}
