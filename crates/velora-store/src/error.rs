//! # Store Error Type
//!
//! Unified error type for the service boundary.
//!
//! ## Error Handling Strategy
//! Every failure a service can return is typed and distinguishable, so the
//! presentation layer can render a specific message:
//!
//! ```text
//! CoreError (domain)  ──┐
//!                       ├──► StoreError ── code() ──► ErrorCode
//! DbError (database)  ──┘
//! ```
//!
//! None of these is fatal: the caller corrects input, adjusts the
//! selection, or refreshes the cart view and retries.

use serde::Serialize;
use thiserror::Error;

use velora_core::{CoreError, Permission, ValidationError};
use velora_db::DbError;

/// Service boundary error.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Domain rule violation (stock, cart keys, validation, ...).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Persistence failure, propagated unchanged.
    #[error(transparent)]
    Db(#[from] DbError),

    /// The acting user does not hold the required permission.
    #[error("Permission denied: requires {permission}")]
    PermissionDenied { permission: Permission },
}

impl From<ValidationError> for StoreError {
    fn from(err: ValidationError) -> Self {
        StoreError::Core(CoreError::Validation(err))
    }
}

/// Machine-readable error codes for the presentation layer.
///
/// ## Usage
/// The renderer switches on the code to pick a message or form highlight;
/// [`StoreError`]'s `Display` supplies the human-readable default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Referenced product or order does not exist
    NotFound,

    /// Input validation failed
    ValidationError,

    /// A cart operation asked for more than current stock
    OutOfStock,

    /// A checkout target line cannot be fulfilled
    InsufficientStock,

    /// Stale cart key
    LineNotFound,

    /// Checkout on an empty cart
    EmptyCart,

    /// Selected keys matched no cart line
    NoValidSelection,

    /// Cart container limits hit
    CartError,

    /// Acting user lacks the required permission
    PermissionDenied,

    /// Database operation failed
    DatabaseError,
}

impl StoreError {
    /// Maps the error to its machine-readable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            StoreError::Core(core) => match core {
                CoreError::ProductNotFound(_) => ErrorCode::NotFound,
                CoreError::OutOfStock { .. } => ErrorCode::OutOfStock,
                CoreError::InsufficientStock { .. } => ErrorCode::InsufficientStock,
                CoreError::LineNotFound(_) => ErrorCode::LineNotFound,
                CoreError::EmptyCart => ErrorCode::EmptyCart,
                CoreError::NoValidSelection => ErrorCode::NoValidSelection,
                CoreError::CartTooLarge { .. } => ErrorCode::CartError,
                CoreError::Validation(_) => ErrorCode::ValidationError,
            },
            StoreError::Db(db) => match db {
                DbError::NotFound { .. } => ErrorCode::NotFound,
                _ => ErrorCode::DatabaseError,
            },
            StoreError::PermissionDenied { .. } => ErrorCode::PermissionDenied,
        }
    }
}

/// Result type for service operations.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use velora_core::{Action, Resource};

    #[test]
    fn test_code_mapping() {
        let err: StoreError = CoreError::EmptyCart.into();
        assert_eq!(err.code(), ErrorCode::EmptyCart);

        let err: StoreError = CoreError::InsufficientStock {
            name: "Denim Jacket".to_string(),
            available: 0,
            requested: 2,
        }
        .into();
        assert_eq!(err.code(), ErrorCode::InsufficientStock);

        let err: StoreError = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        }
        .into();
        assert_eq!(err.code(), ErrorCode::ValidationError);

        let err: StoreError = DbError::not_found("Product", "p1").into();
        assert_eq!(err.code(), ErrorCode::NotFound);

        let err = StoreError::PermissionDenied {
            permission: Permission::new(Action::Delete, Resource::Products),
        };
        assert_eq!(err.code(), ErrorCode::PermissionDenied);
    }

    #[test]
    fn test_messages_surface_context() {
        let err: StoreError = CoreError::OutOfStock {
            name: "Denim Jacket".to_string(),
            available: 3,
            requested: 5,
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Not enough stock for Denim Jacket: available 3, requested 5"
        );
    }
}
