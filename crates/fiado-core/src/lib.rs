//! # fiado-core: Pure Business Logic for Fiado POS
//!
//! This crate is the **heart** of Fiado POS. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Fiado POS Architecture                        │
//! │                                                                     │
//! │  ┌─────────────────────────────────────────────────────────────┐   │
//! │  │                  Caller (HTTP layer, CLI, ...)              │   │
//! │  │      create sale ──► register abono ──► debt reports        │   │
//! │  └─────────────────────────────┬───────────────────────────────┘   │
//! │                                │                                    │
//! │  ┌─────────────────────────────▼───────────────────────────────┐   │
//! │  │               ★ fiado-core (THIS CRATE) ★                   │   │
//! │  │                                                             │   │
//! │  │   ┌──────────┐  ┌──────────┐  ┌──────────┐  ┌───────────┐  │   │
//! │  │   │  types   │  │  money   │  │  status  │  │ validation│  │   │
//! │  │   │  Sale    │  │  Money   │  │ derive_  │  │   rules   │  │   │
//! │  │   │ Payment  │  │  cents   │  │  status  │  │  checks   │  │   │
//! │  │   └──────────┘  └──────────┘  └──────────┘  └───────────┘  │   │
//! │  │                                                             │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS        │   │
//! │  └─────────────────────────────┬───────────────────────────────┘   │
//! │                                │                                    │
//! │  ┌─────────────────────────────▼───────────────────────────────┐   │
//! │  │                  fiado-db (Database Layer)                  │   │
//! │  │        SQLite queries, transactions, the ledger engine      │   │
//! │  └─────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Client, Sale, Payment, StockMovement)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`status`] - The payment state machine
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod status;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use fiado_core::Money` instead of
// `use fiado_core::money::Money`

pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use status::derive_status;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Reserved client id for the anonymous walk-in buyer.
///
/// ## Why a constant?
/// The general client is a protected row seeded by the initial migration.
/// It is immutable and may never carry an unpaid sale: a walk-in buyer has
/// no identity to collect a debt from.
pub const GENERAL_CLIENT_ID: &str = "00000000-0000-0000-0000-000000000001";

/// On-hand quantity below which a low-stock notification is dispatched.
///
/// ## Business Reason
/// Gives the shop owner time to reorder before a product actually runs out.
/// Can be made configurable per-product in future versions.
pub const LOW_STOCK_THRESHOLD: i64 = 10;

/// Maximum line items allowed in a single sale
///
/// ## Business Reason
/// Prevents runaway carts and ensures reasonable transaction sizes.
pub const MAX_LINE_ITEMS: usize = 100;

/// Maximum quantity of a single product in a sale
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10)
pub const MAX_ITEM_QUANTITY: i64 = 999;
