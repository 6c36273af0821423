//! # Validation Module
//!
//! Input validation utilities for Velora.
//!
//! ## Validation Strategy
//! The presentation layer passes primitive inputs (IDs, strings, integers)
//! straight through; these functions are the single place where business
//! rules about those inputs live. Database constraints (NOT NULL, CHECK)
//! are a backstop, never the first line of defense.

use std::str::FromStr;

use crate::error::ValidationError;
use crate::types::{OrderDetails, PaymentMethod};
use crate::{MAX_CONTACT_NUMBER_LEN, MAX_CUSTOMER_NAME_LEN, MAX_LINE_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a cart/order quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed [`MAX_LINE_QUANTITY`]
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in centavos.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (promotional items)
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a stock level supplied by an admin edit.
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::OutOfRange {
            field: "stock".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name for admin create/edit.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 255 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > 255 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 255,
        });
    }

    Ok(())
}

/// Validates a catalog search query.
///
/// ## Rules
/// - Can be empty (returns unfiltered results)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

/// Validates a UUID string format.
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Order Details
// =============================================================================

/// Validates the delivery and payment details supplied at checkout.
///
/// ## Rules
/// - `delivery_address`: non-empty
/// - `customer_name`: non-empty, at most [`MAX_CUSTOMER_NAME_LEN`] chars
/// - `contact_number`: non-empty, at most [`MAX_CONTACT_NUMBER_LEN`] chars
///
/// The payment method is already typed; a raw label is parsed with
/// [`parse_payment_method`] before this point.
pub fn validate_order_details(details: &OrderDetails) -> ValidationResult<()> {
    if details.delivery_address.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "delivery_address".to_string(),
        });
    }

    let name = details.customer_name.trim();
    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "customer_name".to_string(),
        });
    }
    if name.chars().count() > MAX_CUSTOMER_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "customer_name".to_string(),
            max: MAX_CUSTOMER_NAME_LEN,
        });
    }

    let contact = details.contact_number.trim();
    if contact.is_empty() {
        return Err(ValidationError::Required {
            field: "contact_number".to_string(),
        });
    }
    if contact.chars().count() > MAX_CONTACT_NUMBER_LEN {
        return Err(ValidationError::TooLong {
            field: "contact_number".to_string(),
            max: MAX_CONTACT_NUMBER_LEN,
        });
    }

    Ok(())
}

/// Parses a raw payment method label into the typed enum.
pub fn parse_payment_method(label: &str) -> ValidationResult<PaymentMethod> {
    PaymentMethod::from_str(label.trim())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn details() -> OrderDetails {
        OrderDetails {
            payment_method: PaymentMethod::Cod,
            delivery_address: "123 Mabini St, Manila".to_string(),
            customer_name: "Maria Santos".to_string(),
            contact_number: "09171234567".to_string(),
        }
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(50000).is_ok());
        assert!(validate_price_cents(-100).is_err());
    }

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Denim Jacket").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name("   ").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_search_query_trims() {
        assert_eq!(validate_search_query("  jacket ").unwrap(), "jacket");
        assert!(validate_search_query(&"q".repeat(200)).is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("").is_err());
        assert!(validate_uuid("not-a-uuid").is_err());
    }

    #[test]
    fn test_validate_order_details_happy_path() {
        assert!(validate_order_details(&details()).is_ok());
    }

    #[test]
    fn test_validate_order_details_rejects_empty_fields() {
        let mut d = details();
        d.delivery_address = "  ".to_string();
        assert!(matches!(
            validate_order_details(&d),
            Err(ValidationError::Required { .. })
        ));

        let mut d = details();
        d.customer_name.clear();
        assert!(validate_order_details(&d).is_err());

        let mut d = details();
        d.contact_number.clear();
        assert!(validate_order_details(&d).is_err());
    }

    #[test]
    fn test_validate_order_details_length_limits() {
        let mut d = details();
        d.customer_name = "x".repeat(256);
        assert!(matches!(
            validate_order_details(&d),
            Err(ValidationError::TooLong { .. })
        ));

        let mut d = details();
        d.contact_number = "9".repeat(21);
        assert!(matches!(
            validate_order_details(&d),
            Err(ValidationError::TooLong { .. })
        ));
    }

    #[test]
    fn test_parse_payment_method() {
        assert_eq!(
            parse_payment_method("e_wallet").unwrap(),
            PaymentMethod::EWallet
        );
        assert!(parse_payment_method("wire").is_err());
    }
}
