//! # Low-Stock Notifier
//!
//! Seam for the external notification collaborator. The ledger engine calls
//! it fire-and-forget after a sale commits; delivery mechanics (push, email)
//! live behind this trait, outside this crate.
//!
//! ## Decoupling Guarantee
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  create_sale transaction                                            │
//! │     ├── sale + items + stock decrements + deposit     (atomic)      │
//! │     └── COMMIT                                                      │
//! │            │                                                        │
//! │            ▼  only after a successful commit                        │
//! │  notifier.send_low_stock_alert(name, stock)   (best effort)         │
//! │                                                                     │
//! │  A notifier that panics, blocks, or is simply NullNotifier never    │
//! │  changes the outcome of the sale.                                   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::warn;

/// Receiver for low-stock alerts. Return value intentionally absent: the
/// engine ignores delivery outcomes.
pub trait LowStockNotifier: Send + Sync {
    /// Called once per product whose stock fell below the threshold.
    fn send_low_stock_alert(&self, product_name: &str, current_stock: i64);
}

/// Default notifier: logs the alert through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl LowStockNotifier for LogNotifier {
    fn send_low_stock_alert(&self, product_name: &str, current_stock: i64) {
        warn!(
            product = %product_name,
            stock = current_stock,
            "Low stock alert"
        );
    }
}

/// No-op notifier for tests and headless tools.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl LowStockNotifier for NullNotifier {
    fn send_low_stock_alert(&self, _product_name: &str, _current_stock: i64) {}
}
