//! # Validation Module
//!
//! Input validation utilities for Fiado POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        Validation Layers                            │
//! │                                                                     │
//! │  Layer 1: Caller (HTTP layer / UI)                                  │
//! │  ├── Basic format checks (empty, length)                            │
//! │  └── Immediate user feedback                                        │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 2: THIS MODULE + the ledger engine                           │
//! │  ├── Business rule validation before any row is touched             │
//! │  └── Balance/stock rules checked inside the transaction             │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 3: Database (SQLite)                                         │
//! │  ├── NOT NULL / CHECK constraints                                   │
//! │  └── Foreign key constraints                                        │
//! │                                                                     │
//! │  Defense in depth: multiple layers catch different errors           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::SaleLineInput;
use crate::{MAX_ITEM_QUANTITY, MAX_LINE_ITEMS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line-item quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive { field: "quantity" });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity",
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
/// - Zero is allowed (giveaway items)
pub fn validate_unit_price(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::NegativeAmount { field: "unit price" });
    }

    Ok(())
}

/// Validates a flat discount in cents.
///
/// Only the sign is checked here; the discount-vs-subtotal rule needs the
/// computed subtotal and lives with the sale builder.
pub fn validate_discount(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::NegativeAmount { field: "discount" });
    }

    Ok(())
}

/// Validates an abono amount in cents.
///
/// ## Rules
/// - Must be positive (> 0); zero or negative abonos are meaningless
pub fn validate_payment_amount(cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "payment amount",
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates the line items of a new sale as a whole.
///
/// ## Rules
/// - At least one line item
/// - At most MAX_LINE_ITEMS (100)
/// - Every quantity and unit price individually valid
pub fn validate_line_items(items: &[SaleLineInput]) -> ValidationResult<()> {
    if items.is_empty() {
        return Err(ValidationError::EmptyCart);
    }

    if items.len() > MAX_LINE_ITEMS {
        return Err(ValidationError::TooManyItems {
            max: MAX_LINE_ITEMS,
        });
    }

    for item in items {
        validate_quantity(item.quantity)?;
        validate_unit_price(item.unit_price_cents)?;
    }

    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string format.
///
/// ## Example
/// ```rust
/// use fiado_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id",
        reason: "must be a valid UUID",
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn line(qty: i64, price: i64) -> SaleLineInput {
        SaleLineInput {
            product_id: "550e8400-e29b-41d4-a716-446655440000".to_string(),
            quantity: qty,
            unit_price_cents: price,
        }
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(100).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_unit_price() {
        assert!(validate_unit_price(0).is_ok());
        assert!(validate_unit_price(1099).is_ok());
        assert!(validate_unit_price(-100).is_err());
    }

    #[test]
    fn test_validate_discount() {
        assert!(validate_discount(0).is_ok());
        assert!(validate_discount(500).is_ok());
        assert!(validate_discount(-1).is_err());
    }

    #[test]
    fn test_validate_payment_amount() {
        assert!(validate_payment_amount(1).is_ok());
        assert!(validate_payment_amount(0).is_err());
        assert!(validate_payment_amount(-500).is_err());
    }

    #[test]
    fn test_validate_line_items() {
        assert!(validate_line_items(&[line(2, 1000)]).is_ok());
        assert!(validate_line_items(&[]).is_err());
        assert!(validate_line_items(&[line(0, 1000)]).is_err());
        assert!(validate_line_items(&[line(2, -5)]).is_err());

        let too_many: Vec<_> = (0..101).map(|_| line(1, 100)).collect();
        assert!(validate_line_items(&too_many).is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("").is_err());
        assert!(validate_uuid("not-a-uuid").is_err());
        assert!(validate_uuid("123").is_err());
    }
}
