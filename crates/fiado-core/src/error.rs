//! # Error Types
//!
//! Domain-specific error types for fiado-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                          Error Types                                │
//! │                                                                     │
//! │  fiado-core errors (this file)                                      │
//! │  ├── CoreError        - Business rule violations                    │
//! │  └── ValidationError  - Input validation failures                   │
//! │                                                                     │
//! │  fiado-db errors (separate crate)                                   │
//! │  ├── DbError          - Database operation failures                 │
//! │  └── LedgerError      - CoreError | DbError, what engine ops return │
//! │                                                                     │
//! │  Flow: ValidationError → CoreError → LedgerError → Caller           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (ids, amounts)
//! 3. Errors are enum variants, never String
//! 4. Every mutating operation rolls back wholesale on any of these

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations or domain logic failures.
/// Any of them aborts the enclosing transaction; callers never observe
/// partial effects and retrying is always safe.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A referenced entity does not exist.
    ///
    /// ## When This Occurs
    /// - Sale/product/client id doesn't exist in the database
    /// - A sale was already reversed (reversal is not idempotent)
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Insufficient stock to complete a sale.
    ///
    /// ## User Workflow
    /// ```text
    /// Sell (qty: 6)
    ///      │
    ///      ▼
    /// Stock ledger guard: available=5
    ///      │
    ///      ▼
    /// InsufficientStock { name: "Leche 1L", available: 5, requested: 6 }
    ///      │
    ///      ▼
    /// UI shows: "Only 5 Leche 1L in stock"
    /// ```
    #[error("Insufficient stock for {name}: available {available}, requested {requested}")]
    InsufficientStock {
        name: String,
        available: i64,
        requested: i64,
    },

    /// A defensive invariant check failed after a mutation was staged.
    ///
    /// Should be unreachable. Treated as fatal: the enclosing transaction
    /// aborts rather than silently coercing the numbers back into shape.
    #[error("Consistency violation on sale {sale_id}: {detail}")]
    Consistency { sale_id: String, detail: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates a NotFound error for a given entity type and id.
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        CoreError::NotFound {
            entity,
            id: id.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when caller input doesn't meet requirements. Used for early
/// validation before any row is touched.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A sale was requested with no line items.
    #[error("sale must contain at least one line item")]
    EmptyCart,

    /// A sale was requested with too many line items.
    #[error("sale cannot have more than {max} line items")]
    TooManyItems { max: usize },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: &'static str },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    NegativeAmount { field: &'static str },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
    },

    /// The flat discount is larger than the line-item subtotal sum.
    #[error("discount {discount_cents} exceeds subtotal {subtotal_cents}")]
    DiscountExceedsSubtotal {
        discount_cents: i64,
        subtotal_cents: i64,
    },

    /// A credit sale's initial deposit is larger than the sale total.
    #[error("deposit {deposit_cents} exceeds sale total {total_cents}")]
    DepositExceedsTotal {
        deposit_cents: i64,
        total_cents: i64,
    },

    /// An abono is larger than the sale's outstanding balance.
    ///
    /// Rejected outright, never clamped: partial overpayment would make
    /// `amount_paid` exceed `total`.
    #[error("abono {amount_cents} exceeds pending balance {pending_cents}")]
    PaymentExceedsPending {
        amount_cents: i64,
        pending_cents: i64,
    },

    /// Credit terms were requested for the reserved walk-in client.
    #[error("the general client cannot carry a credit sale")]
    CreditSaleToGeneralClient,

    /// Invalid format (e.g., invalid UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat {
        field: &'static str,
        reason: &'static str,
    },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            name: "Leche 1L".to_string(),
            available: 5,
            requested: 6,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for Leche 1L: available 5, requested 6"
        );

        let err = CoreError::not_found("Sale", "abc");
        assert_eq!(err.to_string(), "Sale not found: abc");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::EmptyCart;
        assert_eq!(err.to_string(), "sale must contain at least one line item");

        let err = ValidationError::PaymentExceedsPending {
            amount_cents: 2500,
            pending_cents: 1500,
        };
        assert_eq!(err.to_string(), "abono 2500 exceeds pending balance 1500");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::CreditSaleToGeneralClient;
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
