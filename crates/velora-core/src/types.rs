//! # Domain Types
//!
//! Core domain types used throughout Velora.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Order      │   │  OrderDetails   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  payment_method │       │
//! │  │  name, brand    │   │  user_id        │   │  delivery_addr  │       │
//! │  │  category       │   │  product_id     │   │  customer_name  │       │
//! │  │  price_cents    │   │  total_amount   │   │  contact_number │       │
//! │  │  stock          │   │  size, color    │   └─────────────────┘       │
//! │  └─────────────────┘   └─────────────────┘                             │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │  PaymentMethod  │   │   OrderStatus   │                             │
//! │  │  ─────────────  │   │  ─────────────  │                             │
//! │  │  CreditCard     │   │  Pending        │                             │
//! │  │  EWallet        │   │  Completed      │                             │
//! │  │  Cod            │   │  Cancelled      │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! An `Order` holds a frozen copy of price × quantity (`total_amount_cents`)
//! and variant data. Later catalog edits never change a placed order.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A catalog product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown in the catalog and on cart lines.
    pub name: String,

    /// Brand label, used by catalog filters.
    pub brand: String,

    /// Category label (skirt, pants, t-shirt, ...), used by catalog filters.
    pub category: String,

    /// Optional long description for the product page.
    pub description: Option<String>,

    /// Price in centavos (smallest currency unit).
    pub price_cents: i64,

    /// Optional image URL, snapshotted onto cart lines at add time.
    pub image_url: Option<String>,

    /// Default size shown on the product page (S, M, L, XL).
    pub size: Option<String>,

    /// Default color shown on the product page.
    pub color: Option<String>,

    /// Current stock level. Never negative.
    pub stock: i64,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Checks whether the requested quantity can be fulfilled from stock.
    #[inline]
    pub fn can_fulfill(&self, quantity: i64) -> bool {
        self.stock >= quantity
    }

    /// Checks if the product is low on stock (threshold from the catalog UI).
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.stock <= 10
    }

    /// Checks if the product is out of stock.
    #[inline]
    pub fn is_out_of_stock(&self) -> bool {
        self.stock <= 0
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How the customer pays for an order.
///
/// This is a stored label only; no gateway integration happens here.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Card payment, recorded as a label.
    CreditCard,
    /// E-wallet payment, recorded as a label.
    EWallet,
    /// Cash on delivery.
    Cod,
}

impl PaymentMethod {
    /// The wire labels accepted by [`PaymentMethod::from_str`].
    pub const LABELS: [&'static str; 3] = ["credit_card", "e_wallet", "cod"];

    /// Returns the stored wire label for this method.
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::EWallet => "e_wallet",
            PaymentMethod::Cod => "cod",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "credit_card" => Ok(PaymentMethod::CreditCard),
            "e_wallet" => Ok(PaymentMethod::EWallet),
            "cod" => Ok(PaymentMethod::Cod),
            _ => Err(ValidationError::NotAllowed {
                field: "payment_method".to_string(),
                allowed: Self::LABELS.iter().map(|s| s.to_string()).collect(),
            }),
        }
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// The status of a placed order.
///
/// Orders are created as `Pending`. The fulfilment screens that move an
/// order to `Completed` or `Cancelled` live outside this workspace; no
/// transition is implemented here.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Completed,
    Cancelled,
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

// =============================================================================
// Order
// =============================================================================

/// A placed purchase line. Append-only: no update path exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Order {
    pub id: String,
    /// The purchasing user (order attribution).
    pub user_id: String,
    /// Weak reference to the product; the order stays valid if the
    /// product is later edited or removed.
    pub product_id: String,
    pub payment_method: PaymentMethod,
    pub delivery_address: String,
    pub customer_name: String,
    pub contact_number: String,
    /// Unit price × quantity in centavos, frozen at order time.
    pub total_amount_cents: i64,
    pub size: String,
    pub color: String,
    pub quantity: i64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Returns the order total as Money.
    #[inline]
    pub fn total_amount(&self) -> Money {
        Money::from_cents(self.total_amount_cents)
    }
}

// =============================================================================
// Order Details
// =============================================================================

/// Delivery and payment details supplied at checkout.
///
/// Shared by the cart checkout and the buy-now flow; validated by
/// [`crate::validation::validate_order_details`] before any mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetails {
    pub payment_method: PaymentMethod,
    pub delivery_address: String,
    pub customer_name: String,
    pub contact_number: String,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_method_round_trip() {
        for label in PaymentMethod::LABELS {
            let method: PaymentMethod = label.parse().unwrap();
            assert_eq!(method.as_str(), label);
        }
    }

    #[test]
    fn test_payment_method_rejects_unknown_label() {
        let err = "bank_transfer".parse::<PaymentMethod>().unwrap_err();
        assert!(matches!(err, ValidationError::NotAllowed { .. }));
    }

    #[test]
    fn test_order_status_default() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
    }

    #[test]
    fn test_product_stock_checks() {
        let product = Product {
            id: "p1".to_string(),
            name: "Denim Jacket".to_string(),
            brand: "Levi's".to_string(),
            category: "jacket".to_string(),
            description: None,
            price_cents: 50000,
            image_url: None,
            size: None,
            color: None,
            stock: 5,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert!(product.can_fulfill(5));
        assert!(!product.can_fulfill(6));
        assert!(product.is_low_stock());
        assert!(!product.is_out_of_stock());
        assert_eq!(product.price().cents(), 50000);
    }
}
