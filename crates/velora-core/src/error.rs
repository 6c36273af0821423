//! # Error Types
//!
//! Domain-specific error types for velora-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  velora-core errors (this file)                                        │
//! │  ├── CoreError        - Cart/checkout domain errors                    │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  velora-db errors (separate crate)                                     │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  velora-store errors (service boundary)                                │
//! │  └── StoreError       - What the presentation layer sees               │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → StoreError → Presentation         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product name, quantities, key)
//! 3. Errors are enum variants, never String
//! 4. Every variant is recoverable by the caller; none is fatal

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Cart and checkout domain errors.
///
/// These errors represent business rule violations. They should be caught
/// by the presentation layer and translated to user-facing messages.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found.
    ///
    /// ## When This Occurs
    /// - Product ID doesn't exist in the catalog
    /// - Product was removed after the cart line was created
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// A cart operation requested more than the available stock.
    ///
    /// ## When This Occurs
    /// - `add` with quantity above current stock
    /// - `update_quantity` raising a line above current stock
    #[error("Not enough stock for {name}: available {available}, requested {requested}")]
    OutOfStock {
        name: String,
        available: i64,
        requested: i64,
    },

    /// A checkout pre-flight or commit found a targeted line without stock.
    ///
    /// Distinct from [`CoreError::OutOfStock`] so the presentation layer can
    /// tell "fix this cart line" apart from "fix this checkout selection".
    #[error("Insufficient stock for {name}: available {available}, requested {requested}")]
    InsufficientStock {
        name: String,
        available: i64,
        requested: i64,
    },

    /// The referenced cart line does not exist (stale key).
    #[error("Cart line not found: {0}")]
    LineNotFound(String),

    /// Checkout was requested on an empty cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// None of the selected keys matched a current cart line.
    ///
    /// ## When This Occurs
    /// - All supplied keys are stale (lines already checked out or removed)
    #[error("No valid items selected for checkout")]
    NoValidSelection,

    /// The cart has reached its maximum number of lines.
    #[error("Cart cannot have more than {max} lines")]
    CartTooLarge { max: usize },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when caller input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID, malformed cart key).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// A caller-supplied order total disagrees with unit price × quantity.
    #[error("total amount {supplied} does not match price × quantity ({expected})")]
    TotalMismatch { supplied: i64, expected: i64 },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
