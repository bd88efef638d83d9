//! # Payment State Machine
//!
//! Derives a sale's payment status from its money, never the other way
//! around.
//!
//! ## State Table
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │            derive_status(total, amount_paid)                        │
//! │                                                                     │
//! │   amount_paid <= 0                    ──►  Pending                  │
//! │   0 < amount_paid < total             ──►  Partial                  │
//! │   amount_paid >= total                ──►  Paid                     │
//! │                                                                     │
//! │   Sale created on credit, no deposit:                               │
//! │     (2000, 0)     ──► Pending                                       │
//! │   Abono of 500:                                                     │
//! │     (2000, 500)   ──► Partial                                       │
//! │   Abono of 1500:                                                    │
//! │     (2000, 2000)  ──► Paid                                          │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The stored `status` column is a materialized cache for queries. Every
//! mutation recomputes it here; callers keep `amount_paid <= total`
//! upstream (the function itself floors nothing and rejects nothing).

use crate::money::Money;
use crate::types::SaleStatus;

/// Derives the payment status of a sale from `(total, amount_paid)`.
///
/// Pure and total: any pair of values maps to exactly one status.
///
/// ## Example
/// ```rust
/// use fiado_core::money::Money;
/// use fiado_core::status::derive_status;
/// use fiado_core::types::SaleStatus;
///
/// let total = Money::from_cents(2000);
/// assert_eq!(derive_status(total, Money::zero()), SaleStatus::Pending);
/// assert_eq!(derive_status(total, Money::from_cents(500)), SaleStatus::Partial);
/// assert_eq!(derive_status(total, total), SaleStatus::Paid);
/// ```
#[inline]
pub fn derive_status(total: Money, amount_paid: Money) -> SaleStatus {
    if amount_paid.cents() <= 0 {
        SaleStatus::Pending
    } else if amount_paid < total {
        SaleStatus::Partial
    } else {
        SaleStatus::Paid
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn status(total: i64, paid: i64) -> SaleStatus {
        derive_status(Money::from_cents(total), Money::from_cents(paid))
    }

    #[test]
    fn test_zero_paid_is_pending() {
        assert_eq!(status(2000, 0), SaleStatus::Pending);
    }

    #[test]
    fn test_negative_paid_is_pending() {
        // Defensive: a negative paid amount must never read as settled.
        assert_eq!(status(2000, -100), SaleStatus::Pending);
    }

    #[test]
    fn test_partial_payment() {
        assert_eq!(status(2000, 1), SaleStatus::Partial);
        assert_eq!(status(2000, 1999), SaleStatus::Partial);
    }

    #[test]
    fn test_exact_payment_is_paid() {
        assert_eq!(status(2000, 2000), SaleStatus::Paid);
    }

    #[test]
    fn test_overpayment_still_reads_paid() {
        // Callers reject overpayment before it is stored; if one slips
        // through, the derived status must still read Paid.
        assert_eq!(status(2000, 2500), SaleStatus::Paid);
    }

    #[test]
    fn test_one_cent_boundaries() {
        assert_eq!(status(100, 99), SaleStatus::Partial);
        assert_eq!(status(100, 100), SaleStatus::Paid);
        assert_eq!(status(100, 0), SaleStatus::Pending);
    }
}
