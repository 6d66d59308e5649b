//! # Validation Module
//!
//! Input validation for checkout requests.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Caller (POS terminal / sales-order form)                     │
//! │  └── Basic format checks, immediate user feedback                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE, before the transaction opens                    │
//! │  └── Empty cart, missing actor, quantity/price ranges                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  └── NOT NULL, UNIQUE, foreign key constraints                         │
//! │                                                                         │
//! │  Failing here persists nothing — the transaction never starts.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Cart Validators
// =============================================================================

/// Validates the cart shape: non-empty, bounded size.
pub fn validate_cart_size(line_count: usize) -> ValidationResult<()> {
    if line_count == 0 {
        return Err(ValidationError::EmptyCart);
    }

    if line_count > MAX_CART_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "cart items".to_string(),
            min: 1,
            max: MAX_CART_ITEMS as i64,
        });
    }

    Ok(())
}

/// Validates the submitting actor's id.
pub fn validate_staff_id(staff_id: &str) -> ValidationResult<()> {
    if staff_id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "staff_id".to_string(),
        });
    }

    Ok(())
}

/// Validates a line item's product reference.
pub fn validate_product_id(product_id: &str) -> ValidationResult<()> {
    if product_id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "product_id".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates an ordered quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a unit price in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (comped items)
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

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_cart_size() {
        assert!(validate_cart_size(1).is_ok());
        assert!(validate_cart_size(MAX_CART_ITEMS).is_ok());

        assert!(matches!(
            validate_cart_size(0),
            Err(ValidationError::EmptyCart)
        ));
        assert!(validate_cart_size(MAX_CART_ITEMS + 1).is_err());
    }

    #[test]
    fn test_validate_staff_id() {
        assert!(validate_staff_id("staff-7").is_ok());
        assert!(validate_staff_id("").is_err());
        assert!(validate_staff_id("   ").is_err());
    }

    #[test]
    fn test_validate_product_id() {
        assert!(validate_product_id("item-1").is_ok());
        assert!(validate_product_id("").is_err());
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
        assert!(validate_price_cents(450).is_ok());
        assert!(validate_price_cents(-1).is_err());
    }
}
