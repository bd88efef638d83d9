//! # Sale & Credit Ledger Engine
//!
//! The transactional core of Fiado POS: sale creation against live stock,
//! abono registration, debt rollups, and sale reversal.
//!
//! ## Control Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        SaleLedger Operations                        │
//! │                                                                     │
//! │  create_sale(input)                                                 │
//! │    ├── validate lines / discount / terms        (fiado-core)        │
//! │    ├── BEGIN                                                        │
//! │    │     ├── resolve client (walk-in rule)                          │
//! │    │     ├── insert sale + line items                               │
//! │    │     ├── stock ledger: -qty per line (guarded)                  │
//! │    │     └── initial deposit payment row (credit w/ deposit)        │
//! │    ├── COMMIT ← all writes or none                                  │
//! │    └── low-stock alerts (best effort, after commit)                 │
//! │                                                                     │
//! │  register_payment(input)                                            │
//! │    └── BEGIN → payment row → recompute (paid, pending, status)      │
//! │        → CAS update → invariant check → COMMIT                      │
//! │                                                                     │
//! │  reverse_sale(id)                                                   │
//! │    └── BEGIN → stock ledger: +qty per line → delete payments,       │
//! │        items, sale → COMMIT                                         │
//! │                                                                     │
//! │  client_debt / portfolio_summary: read-only, derived from           │
//! │  current sale rows on every call                                    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every mutating operation runs as one transaction: an error at any step
//! (missing product, insufficient stock, balance overrun) rolls back every
//! staged effect, including stock decrements earlier in the same call.

pub mod error;
pub mod notify;
pub mod stock;

use std::sync::Arc;

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::repository::client::ClientRepository;
use crate::repository::product::ProductRepository;
use crate::repository::sale::{
    generate_payment_id, generate_sale_id, generate_sale_item_id, SaleRepository,
};
use fiado_core::{
    derive_status, validation, ClientDebt, CoreError, CreateSaleInput, CreatedSale, Money,
    MovementRef, Payment, PaymentTerms, PortfolioSummary, RegisterPaymentInput, RegisteredPayment,
    Sale, SaleLineItem, SaleStatus, ValidationError, LOW_STOCK_THRESHOLD,
};

use error::LedgerResult;
use notify::LowStockNotifier;
use stock::StockLedger;

/// The sale/credit ledger engine.
///
/// Owns every transaction boundary in the system. Clone-cheap: holds the
/// pool and a shared notifier.
#[derive(Clone)]
pub struct SaleLedger {
    pool: SqlitePool,
    notifier: Arc<dyn LowStockNotifier>,
}

impl SaleLedger {
    /// Creates a new SaleLedger.
    pub fn new(pool: SqlitePool, notifier: Arc<dyn LowStockNotifier>) -> Self {
        SaleLedger { pool, notifier }
    }

    // =========================================================================
    // Sale creation
    // =========================================================================

    /// Creates a sale atomically against live stock.
    ///
    /// ## Status Derivation
    /// The caller states intent through `PaymentTerms`; the stored status is
    /// always computed from the resulting `(total, amount_paid)` pair. With
    /// `Paid` terms the sale settles in full; `Credit` terms start from the
    /// deposit (default 0) and leave the rest pending.
    ///
    /// ## Errors
    /// * `Validation` - empty cart, bad quantities/prices, discount over
    ///   subtotal, deposit over total, credit terms for the walk-in client
    /// * `NotFound` - unknown client or product id
    /// * `InsufficientStock` - a line asks for more than is on hand
    ///
    /// Any of these leaves the store exactly as it was.
    pub async fn create_sale(&self, input: CreateSaleInput) -> LedgerResult<CreatedSale> {
        validation::validate_line_items(&input.items)?;
        validation::validate_discount(input.discount_cents)?;

        let subtotal = input
            .items
            .iter()
            .fold(Money::zero(), |acc, line| acc + line.subtotal());
        let discount = Money::from_cents(input.discount_cents);

        if discount > subtotal {
            return Err(ValidationError::DiscountExceedsSubtotal {
                discount_cents: discount.cents(),
                subtotal_cents: subtotal.cents(),
            }
            .into());
        }

        let total = subtotal.apply_discount(discount);

        let amount_paid = match input.terms {
            PaymentTerms::Paid => total,
            PaymentTerms::Credit { deposit_cents } => {
                if deposit_cents < 0 {
                    return Err(ValidationError::NegativeAmount { field: "deposit" }.into());
                }
                if deposit_cents > total.cents() {
                    return Err(ValidationError::DepositExceedsTotal {
                        deposit_cents,
                        total_cents: total.cents(),
                    }
                    .into());
                }
                Money::from_cents(deposit_cents)
            }
        };

        let status = derive_status(total, amount_paid);
        let amount_pending = total - amount_paid;

        let mut tx = self.pool.begin().await?;

        let client = ClientRepository::fetch(&mut *tx, &input.client_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Client", input.client_id.clone()))?;

        // The walk-in client has no identity to collect a debt from.
        if client.is_general() && status != SaleStatus::Paid {
            return Err(ValidationError::CreditSaleToGeneralClient.into());
        }

        let now = Utc::now();
        let sale_id = generate_sale_id();

        let sale = Sale {
            id: sale_id.clone(),
            client_id: client.id.clone(),
            status,
            subtotal_cents: subtotal.cents(),
            discount_cents: discount.cents(),
            total_cents: total.cents(),
            amount_paid_cents: amount_paid.cents(),
            amount_pending_cents: amount_pending.cents(),
            method: input.method,
            notes: input.notes.clone(),
            created_at: now,
            updated_at: now,
        };

        SaleRepository::insert_sale(&mut *tx, &sale).await?;

        let mut low_stock: Vec<(String, i64)> = Vec::new();

        for line in &input.items {
            let product = ProductRepository::fetch(&mut *tx, &line.product_id)
                .await?
                .ok_or_else(|| CoreError::not_found("Product", line.product_id.clone()))?;

            let item = SaleLineItem {
                id: generate_sale_item_id(),
                sale_id: sale_id.clone(),
                product_id: product.id.clone(),
                name_snapshot: product.name.clone(),
                quantity: line.quantity,
                unit_price_cents: line.unit_price_cents,
                subtotal_cents: line.subtotal().cents(),
                created_at: now,
            };
            SaleRepository::insert_item(&mut *tx, &item).await?;

            let adjustment = StockLedger::adjust_in(
                &mut tx,
                &line.product_id,
                -line.quantity,
                "sale",
                MovementRef::sale(&sale_id),
            )
            .await?;

            if adjustment.stock_after < LOW_STOCK_THRESHOLD {
                low_stock.push((product.name, adjustment.stock_after));
            }
        }

        // A credit sale with money down gets its deposit on the payment
        // ledger so the payment rows always sum to amount_paid.
        if amount_paid.is_positive() && status != SaleStatus::Paid {
            let deposit = Payment {
                id: generate_payment_id(),
                sale_id: sale_id.clone(),
                client_id: client.id.clone(),
                amount_cents: amount_paid.cents(),
                method: input.method,
                notes: Some("initial deposit".to_string()),
                created_at: now,
            };
            SaleRepository::insert_payment(&mut *tx, &deposit).await?;
        }

        tx.commit().await?;

        info!(
            sale_id = %sale_id,
            client_id = %client.id,
            total = %total,
            status = ?status,
            items = input.items.len(),
            "Sale created"
        );

        // Best effort, outside the transaction: a notifier failure cannot
        // unwind a committed sale.
        for (name, stock) in low_stock {
            self.notifier.send_low_stock_alert(&name, stock);
        }

        Ok(CreatedSale {
            sale_id,
            total_cents: total.cents(),
        })
    }

    // =========================================================================
    // Abono registration
    // =========================================================================

    /// Applies an installment payment against a sale's outstanding balance.
    ///
    /// ## Errors
    /// * `Validation` - non-positive amount, or amount over the pending
    ///   balance (rejected outright, never clamped)
    /// * `NotFound` - unknown sale id
    /// * `Db(ConcurrentModification)` - a racing abono applied first; the
    ///   caller may retry against the fresh balance
    pub async fn register_payment(
        &self,
        input: RegisterPaymentInput,
    ) -> LedgerResult<RegisteredPayment> {
        validation::validate_payment_amount(input.amount_cents)?;

        let mut tx = self.pool.begin().await?;

        let sale = SaleRepository::fetch(&mut *tx, &input.sale_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Sale", input.sale_id.clone()))?;

        if input.amount_cents > sale.amount_pending_cents {
            return Err(ValidationError::PaymentExceedsPending {
                amount_cents: input.amount_cents,
                pending_cents: sale.amount_pending_cents,
            }
            .into());
        }

        let now = Utc::now();
        let payment = Payment {
            id: generate_payment_id(),
            sale_id: sale.id.clone(),
            client_id: input.client_id.clone(),
            amount_cents: input.amount_cents,
            method: input.method,
            notes: input.notes.clone(),
            created_at: now,
        };
        SaleRepository::insert_payment(&mut *tx, &payment).await?;

        let new_paid = sale.amount_paid() + payment.amount();
        let new_pending = sale.total() - new_paid;
        let new_status = derive_status(sale.total(), new_paid);

        SaleRepository::update_payment_state(
            &mut *tx,
            &sale.id,
            sale.amount_paid_cents,
            new_paid.cents(),
            new_pending.cents(),
            new_status,
            now,
        )
        .await?;

        // Defensive invariant check while everything is still uncommitted.
        // Unreachable if the arithmetic above is right; fatal if it isn't.
        if new_paid + new_pending != sale.total() || new_pending.is_negative() {
            return Err(CoreError::Consistency {
                sale_id: sale.id.clone(),
                detail: format!(
                    "paid {} + pending {} != total {}",
                    new_paid,
                    new_pending,
                    sale.total()
                ),
            }
            .into());
        }

        tx.commit().await?;

        info!(
            sale_id = %sale.id,
            payment_id = %payment.id,
            amount = %payment.amount(),
            new_pending = %new_pending,
            status = ?new_status,
            "Abono registered"
        );

        Ok(RegisteredPayment {
            payment_id: payment.id,
            new_pending_cents: new_pending.cents(),
        })
    }

    // =========================================================================
    // Debt aggregation (read-only)
    // =========================================================================

    /// All outstanding sales for a client and their summed balance.
    pub async fn client_debt(&self, client_id: &str) -> LedgerResult<ClientDebt> {
        let debts = SaleRepository::new(self.pool.clone())
            .debts_for_client(client_id)
            .await?;

        let total_debt_cents = debts.iter().map(|sale| sale.amount_pending_cents).sum();

        debug!(
            client_id = %client_id,
            sales = debts.len(),
            total_debt = total_debt_cents,
            "Client debt computed"
        );

        Ok(ClientDebt {
            debts,
            total_debt_cents,
        })
    }

    /// Portfolio-wide rollup over all sales with an outstanding balance.
    pub async fn portfolio_summary(&self) -> LedgerResult<PortfolioSummary> {
        let summary = SaleRepository::new(self.pool.clone())
            .portfolio_summary()
            .await?;

        Ok(summary)
    }

    // =========================================================================
    // Sale reversal
    // =========================================================================

    /// Reverses a sale: restores stock, then deletes the sale, its line
    /// items, and its payments.
    ///
    /// Destructive by design (administrative correction path). Not
    /// idempotent: a second call on an already-reversed sale fails with
    /// `NotFound`. The restoring stock movements are the only trail left.
    pub async fn reverse_sale(&self, sale_id: &str) -> LedgerResult<()> {
        let mut tx = self.pool.begin().await?;

        let sale = SaleRepository::fetch(&mut *tx, sale_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Sale", sale_id))?;

        let items = SaleRepository::fetch_items(&mut *tx, sale_id).await?;

        for item in &items {
            StockLedger::adjust_in(
                &mut tx,
                &item.product_id,
                item.quantity,
                "sale reversal",
                MovementRef::sale(sale_id),
            )
            .await?;
        }

        let payments_removed = SaleRepository::delete_payments(&mut *tx, sale_id).await?;
        let items_removed = SaleRepository::delete_items(&mut *tx, sale_id).await?;
        SaleRepository::delete_sale(&mut *tx, sale_id).await?;

        tx.commit().await?;

        info!(
            sale_id = %sale_id,
            total = sale.total_cents,
            items_removed = items_removed,
            payments_removed = payments_removed,
            "Sale reversed"
        );

        Ok(())
    }
}
