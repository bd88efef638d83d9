//! # Domain Types
//!
//! Core domain types used throughout Fiado POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                          Domain Types                               │
//! │                                                                     │
//! │  ┌───────────────┐   ┌───────────────┐   ┌───────────────┐         │
//! │  │    Product    │   │     Sale      │   │ Payment(Abono)│         │
//! │  │  ───────────  │   │  ───────────  │   │  ───────────  │         │
//! │  │  id (UUID)    │   │  id (UUID)    │   │  id (UUID)    │         │
//! │  │  price_cents  │   │  status       │   │  sale_id (FK) │         │
//! │  │  stock        │   │  total_cents  │   │  amount_cents │         │
//! │  └───────────────┘   │  amount_paid  │   └───────────────┘         │
//! │                      │  amount_pend. │                             │
//! │  ┌───────────────┐   └───────────────┘   ┌───────────────┐         │
//! │  │    Client     │                       │ StockMovement │         │
//! │  │  ───────────  │   ┌───────────────┐   │  ───────────  │         │
//! │  │  id (UUID)    │   │  SaleStatus   │   │  stock_before │         │
//! │  │  contact info │   │  Pending      │   │  stock_after  │         │
//! │  └───────────────┘   │  Partial      │   │  ref {kind,id}│         │
//! │                      │  Paid         │   └───────────────┘         │
//! │                      └───────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Status Is Derived, Never Trusted
//! `Sale.status` is stored for query convenience but every write recomputes
//! it from `(total, amount_paid)` via [`crate::status::derive_status`]. The
//! stored column is a cache, not a source of truth.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::GENERAL_CLIENT_ID;

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
///
/// `stock` is mutated only through the stock ledger primitive, which pairs
/// every change with a [`StockMovement`] audit row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown on tickets and in debt reports.
    pub name: String,

    /// Purchase cost in cents (for margin calculations).
    pub cost_cents: i64,

    /// Sale price in cents.
    pub price_cents: i64,

    /// Current on-hand quantity.
    pub stock: i64,

    /// Whether product is active (soft delete).
    pub is_active: bool,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the sale price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Returns the purchase cost as a Money type.
    #[inline]
    pub fn cost(&self) -> Money {
        Money::from_cents(self.cost_cents)
    }
}

// =============================================================================
// Client
// =============================================================================

/// A registered buyer.
///
/// One reserved row, [`GENERAL_CLIENT_ID`], represents the anonymous walk-in
/// buyer. That row is seeded by the initial migration, is never edited, and
/// may never carry an unpaid sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Client {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Client {
    /// Whether this is the reserved walk-in client.
    #[inline]
    pub fn is_general(&self) -> bool {
        self.id == GENERAL_CLIENT_ID
    }
}

// =============================================================================
// Sale Status
// =============================================================================

/// The payment status of a sale.
///
/// Always derivable from `(total, amount_paid)`; see
/// [`crate::status::derive_status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    /// Nothing has been paid.
    Pending,
    /// Some, but not all, of the total has been paid.
    Partial,
    /// The full total has been paid.
    Paid,
}

// =============================================================================
// Payment Method
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash payment.
    Cash,
    /// Card payment on an external terminal.
    Card,
    /// Bank transfer.
    Transfer,
}

// =============================================================================
// Payment Terms
// =============================================================================

/// How the caller intends to settle a new sale.
///
/// The caller never supplies a status string; credit-vs-paid intent is this
/// closed enum and the stored status is always derived from the resulting
/// `(total, amount_paid)` pair. A status hint that disagrees with the money
/// simply cannot be expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "terms")]
pub enum PaymentTerms {
    /// Settled in full at the counter.
    Paid,
    /// Sold on credit ("fiado"), optionally with an up-front deposit.
    Credit {
        /// Initial deposit in cents; 0 means nothing down.
        deposit_cents: i64,
    },
}

// =============================================================================
// Sale
// =============================================================================

/// One checkout transaction comprising one or more line items.
///
/// ## Invariant
/// `amount_paid_cents + amount_pending_cents == total_cents` after every
/// operation, exactly (integer cents, no epsilon).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    pub id: String,
    pub client_id: String,
    pub status: SaleStatus,
    /// Sum of line-item subtotals, before discount.
    pub subtotal_cents: i64,
    /// Flat deduction from the subtotal. Never prorated across line items.
    pub discount_cents: i64,
    /// `subtotal_cents - discount_cents`.
    pub total_cents: i64,
    pub amount_paid_cents: i64,
    pub amount_pending_cents: i64,
    pub method: PaymentMethod,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Sale {
    /// Returns the total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Returns the amount paid so far as Money.
    #[inline]
    pub fn amount_paid(&self) -> Money {
        Money::from_cents(self.amount_paid_cents)
    }

    /// Returns the outstanding balance as Money.
    #[inline]
    pub fn amount_pending(&self) -> Money {
        Money::from_cents(self.amount_pending_cents)
    }
}

// =============================================================================
// Sale Line Item
// =============================================================================

/// A line item in a sale.
/// Uses the snapshot pattern to freeze product data at time of sale.
///
/// Immutable once created: line items are never edited, only removed
/// together with their sale by a reversal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleLineItem {
    pub id: String,
    pub sale_id: String,
    pub product_id: String,
    /// Product name at time of sale (frozen).
    pub name_snapshot: String,
    /// Quantity sold.
    pub quantity: i64,
    /// Unit price in cents at time of sale (frozen).
    pub unit_price_cents: i64,
    /// Line subtotal (unit_price × quantity), undiscounted.
    pub subtotal_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl SaleLineItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the line subtotal as Money.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }
}

// =============================================================================
// Payment (Abono)
// =============================================================================

/// A payment applied against a sale's outstanding balance.
///
/// The sum of a sale's payments equals its `amount_paid_cents`. A sale sold
/// on credit with an up-front deposit gets one initial payment row at
/// creation time; later abonos add one row each.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Payment {
    pub id: String,
    pub sale_id: String,
    pub client_id: String,
    /// Amount paid in cents. Always positive.
    pub amount_cents: i64,
    pub method: PaymentMethod,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Payment {
    /// Returns the payment amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

// =============================================================================
// Stock Movements
// =============================================================================

/// Direction of a stock change, derived from the sign of the delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    /// Stock increased (restock, reversal).
    Inbound,
    /// Stock decreased (sale).
    Outbound,
    /// Zero-delta correction entry.
    Adjustment,
}

impl MovementType {
    /// Derives the movement type from a signed stock delta.
    #[inline]
    pub const fn from_delta(delta: i64) -> Self {
        if delta > 0 {
            MovementType::Inbound
        } else if delta < 0 {
            MovementType::Outbound
        } else {
            MovementType::Adjustment
        }
    }
}

/// What caused a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum RefKind {
    /// Movement caused by a sale or its reversal; `ref_id` is the sale id.
    Sale,
    /// Manual correction or initial stocking; no referenced row.
    Manual,
}

/// Reference from a stock movement back to its cause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementRef {
    pub kind: RefKind,
    pub id: Option<String>,
}

impl MovementRef {
    /// Reference to a sale (creation or reversal).
    pub fn sale(sale_id: impl Into<String>) -> Self {
        MovementRef {
            kind: RefKind::Sale,
            id: Some(sale_id.into()),
        }
    }

    /// Manual correction with no referenced row.
    pub const fn manual() -> Self {
        MovementRef {
            kind: RefKind::Manual,
            id: None,
        }
    }
}

/// An audit row recording a single change to a product's on-hand quantity.
///
/// ## Invariant
/// The running sum of a product's movement deltas (initial stocking
/// included) equals its current stock. No stock mutation happens without a
/// movement row: the two writes share one transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StockMovement {
    pub id: String,
    pub product_id: String,
    pub movement_type: MovementType,
    /// Absolute quantity moved.
    pub quantity: i64,
    pub stock_before: i64,
    pub stock_after: i64,
    pub reason: String,
    pub ref_kind: RefKind,
    pub ref_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl StockMovement {
    /// The signed delta this movement applied.
    #[inline]
    pub const fn delta(&self) -> i64 {
        match self.movement_type {
            MovementType::Inbound => self.quantity,
            MovementType::Outbound => -self.quantity,
            MovementType::Adjustment => 0,
        }
    }
}

/// Before/after pair returned by the stock ledger primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockAdjustment {
    pub stock_before: i64,
    pub stock_after: i64,
}

// =============================================================================
// Engine Inputs
// =============================================================================

/// One requested line of a new sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleLineInput {
    pub product_id: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
}

impl SaleLineInput {
    /// Line subtotal (quantity × unit price).
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.unit_price_cents).multiply_quantity(self.quantity)
    }
}

/// Input for creating a sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSaleInput {
    pub client_id: String,
    pub items: Vec<SaleLineInput>,
    /// Flat discount in cents, deducted once from the subtotal.
    pub discount_cents: i64,
    pub method: PaymentMethod,
    pub terms: PaymentTerms,
    pub notes: Option<String>,
}

/// Input for registering an abono against a sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterPaymentInput {
    pub sale_id: String,
    pub client_id: String,
    pub amount_cents: i64,
    pub method: PaymentMethod,
    pub notes: Option<String>,
}

// =============================================================================
// Engine Outputs
// =============================================================================

/// Result of a successful sale creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedSale {
    pub sale_id: String,
    pub total_cents: i64,
}

/// Result of a successful abono registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisteredPayment {
    pub payment_id: String,
    pub new_pending_cents: i64,
}

/// A client's outstanding sales and their summed balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientDebt {
    /// Sales with status pending or partial, oldest first.
    pub debts: Vec<Sale>,
    pub total_debt_cents: i64,
}

/// Portfolio-wide rollup over sales with an outstanding balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub total_pending_sales: i64,
    pub total_pending_cents: i64,
    pub distinct_clients_with_debt: i64,
    pub pending_count: i64,
    pub partial_count: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_type_from_delta() {
        assert_eq!(MovementType::from_delta(5), MovementType::Inbound);
        assert_eq!(MovementType::from_delta(-3), MovementType::Outbound);
        assert_eq!(MovementType::from_delta(0), MovementType::Adjustment);
    }

    #[test]
    fn test_movement_delta_roundtrip() {
        let movement = StockMovement {
            id: "m1".to_string(),
            product_id: "p1".to_string(),
            movement_type: MovementType::Outbound,
            quantity: 4,
            stock_before: 10,
            stock_after: 6,
            reason: "sale".to_string(),
            ref_kind: RefKind::Sale,
            ref_id: Some("s1".to_string()),
            created_at: chrono::Utc::now(),
        };
        assert_eq!(movement.delta(), -4);
        assert_eq!(movement.stock_before + movement.delta(), movement.stock_after);
    }

    #[test]
    fn test_movement_ref_constructors() {
        let sale_ref = MovementRef::sale("abc");
        assert_eq!(sale_ref.kind, RefKind::Sale);
        assert_eq!(sale_ref.id.as_deref(), Some("abc"));

        let manual = MovementRef::manual();
        assert_eq!(manual.kind, RefKind::Manual);
        assert!(manual.id.is_none());
    }

    #[test]
    fn test_line_input_subtotal() {
        let line = SaleLineInput {
            product_id: "p1".to_string(),
            quantity: 3,
            unit_price_cents: 250,
        };
        assert_eq!(line.subtotal().cents(), 750);
    }
}
