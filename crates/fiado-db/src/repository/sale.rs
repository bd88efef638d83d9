//! # Sale Repository
//!
//! Database operations for sales, line items, and payments (abonos).
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Sale Lifecycle                              │
//! │                                                                     │
//! │  1. CREATE (one transaction, via the ledger engine)                 │
//! │     └── insert_sale() + insert_item()× + stock adjust×              │
//! │         + optional initial deposit insert_payment()                 │
//! │                                                                     │
//! │  2. ABONOS (one transaction each)                                   │
//! │     └── insert_payment() + update_payment_state()                   │
//! │         (paid/pending/status always move together)                  │
//! │                                                                     │
//! │  3. (OPTIONAL) REVERSAL (one transaction)                           │
//! │     └── stock adjust× + delete_payments() + delete_items()          │
//! │         + delete_sale()                                             │
//! │                                                                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Writes are associated functions over any executor so the ledger engine
//! can compose them inside a single transaction. The pool-holding methods
//! are the read surface.

use sqlx::{Executor, Row, Sqlite, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use fiado_core::{Payment, PortfolioSummary, Sale, SaleLineItem, SaleStatus};

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

const SELECT_SALE: &str = r#"
    SELECT id, client_id, status, subtotal_cents, discount_cents, total_cents,
           amount_paid_cents, amount_pending_cents, method, notes,
           created_at, updated_at
    FROM sales
"#;

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Gets a sale by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        Self::fetch(&self.pool, id).await
    }

    /// Gets a sale by ID on any executor (pool or open transaction).
    pub async fn fetch<'e, E>(executor: E, id: &str) -> DbResult<Option<Sale>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sale = sqlx::query_as::<_, Sale>(&format!("{SELECT_SALE} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(sale)
    }

    /// Gets all line items for a sale.
    pub async fn get_items(&self, sale_id: &str) -> DbResult<Vec<SaleLineItem>> {
        Self::fetch_items(&self.pool, sale_id).await
    }

    /// Gets all line items for a sale on any executor.
    pub async fn fetch_items<'e, E>(executor: E, sale_id: &str) -> DbResult<Vec<SaleLineItem>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let items = sqlx::query_as::<_, SaleLineItem>(
            r#"
            SELECT id, sale_id, product_id, name_snapshot, quantity,
                   unit_price_cents, subtotal_cents, created_at
            FROM sale_items
            WHERE sale_id = ?1
            ORDER BY created_at
            "#,
        )
        .bind(sale_id)
        .fetch_all(executor)
        .await?;

        Ok(items)
    }

    /// Gets all payments for a sale, oldest first.
    pub async fn get_payments(&self, sale_id: &str) -> DbResult<Vec<Payment>> {
        let payments = sqlx::query_as::<_, Payment>(
            r#"
            SELECT id, sale_id, client_id, amount_cents, method, notes, created_at
            FROM payments
            WHERE sale_id = ?1
            ORDER BY created_at
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(payments)
    }

    /// Gets total amount paid for a sale from its payment rows.
    ///
    /// The authoritative running balance lives on the sale row; this sum
    /// exists so tests and audits can assert both agree.
    pub async fn get_total_paid(&self, sale_id: &str) -> DbResult<i64> {
        let total: Option<i64> =
            sqlx::query_scalar("SELECT SUM(amount_cents) FROM payments WHERE sale_id = ?1")
                .bind(sale_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(total.unwrap_or(0))
    }

    /// Sales with an outstanding balance for one client, oldest first.
    pub async fn debts_for_client(&self, client_id: &str) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(&format!(
            "{SELECT_SALE} WHERE client_id = ?1 AND status IN ('pending', 'partial') ORDER BY created_at"
        ))
        .bind(client_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Portfolio-wide rollup over sales with an outstanding balance.
    ///
    /// Derived entirely from current sale rows; there is no separately
    /// maintained running balance to drift out of sync.
    pub async fn portfolio_summary(&self) -> DbResult<PortfolioSummary> {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*)                                        AS total_pending_sales,
                COALESCE(SUM(amount_pending_cents), 0)          AS total_pending_cents,
                COUNT(DISTINCT client_id)                       AS distinct_clients_with_debt,
                COUNT(*) FILTER (WHERE status = 'pending')      AS pending_count,
                COUNT(*) FILTER (WHERE status = 'partial')      AS partial_count
            FROM sales
            WHERE status IN ('pending', 'partial')
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(PortfolioSummary {
            total_pending_sales: row.get("total_pending_sales"),
            total_pending_cents: row.get("total_pending_cents"),
            distinct_clients_with_debt: row.get("distinct_clients_with_debt"),
            pending_count: row.get("pending_count"),
            partial_count: row.get("partial_count"),
        })
    }

    // =========================================================================
    // Transactional writes (composed by the ledger engine)
    // =========================================================================

    /// Inserts a sale row.
    pub async fn insert_sale<'e, E>(executor: E, sale: &Sale) -> DbResult<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        debug!(id = %sale.id, total = %sale.total_cents, "Inserting sale");

        sqlx::query(
            r#"
            INSERT INTO sales (
                id, client_id, status, subtotal_cents, discount_cents,
                total_cents, amount_paid_cents, amount_pending_cents,
                method, notes, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
        )
        .bind(&sale.id)
        .bind(&sale.client_id)
        .bind(sale.status)
        .bind(sale.subtotal_cents)
        .bind(sale.discount_cents)
        .bind(sale.total_cents)
        .bind(sale.amount_paid_cents)
        .bind(sale.amount_pending_cents)
        .bind(sale.method)
        .bind(&sale.notes)
        .bind(sale.created_at)
        .bind(sale.updated_at)
        .execute(executor)
        .await?;

        Ok(())
    }

    /// Inserts a line item.
    ///
    /// ## Snapshot Pattern
    /// The product name is copied onto the row so the sale history survives
    /// later catalog edits.
    pub async fn insert_item<'e, E>(executor: E, item: &SaleLineItem) -> DbResult<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            r#"
            INSERT INTO sale_items (
                id, sale_id, product_id, name_snapshot, quantity,
                unit_price_cents, subtotal_cents, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&item.id)
        .bind(&item.sale_id)
        .bind(&item.product_id)
        .bind(&item.name_snapshot)
        .bind(item.quantity)
        .bind(item.unit_price_cents)
        .bind(item.subtotal_cents)
        .bind(item.created_at)
        .execute(executor)
        .await?;

        Ok(())
    }

    /// Inserts a payment (abono) row.
    pub async fn insert_payment<'e, E>(executor: E, payment: &Payment) -> DbResult<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        debug!(sale_id = %payment.sale_id, amount = %payment.amount_cents, "Recording payment");

        sqlx::query(
            r#"
            INSERT INTO payments (
                id, sale_id, client_id, amount_cents, method, notes, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&payment.id)
        .bind(&payment.sale_id)
        .bind(&payment.client_id)
        .bind(payment.amount_cents)
        .bind(payment.method)
        .bind(&payment.notes)
        .bind(payment.created_at)
        .execute(executor)
        .await?;

        Ok(())
    }

    /// Moves a sale's payment state: paid, pending, and status together.
    ///
    /// ## Compare-And-Set Guard
    /// The update only applies while `amount_paid_cents` still holds the
    /// value the caller read. Two abonos racing on one sale cannot both
    /// apply against the same balance; the loser gets
    /// `ConcurrentModification` and its transaction rolls back.
    pub async fn update_payment_state<'e, E>(
        executor: E,
        sale_id: &str,
        expected_paid_cents: i64,
        new_paid_cents: i64,
        new_pending_cents: i64,
        new_status: SaleStatus,
        updated_at: chrono::DateTime<chrono::Utc>,
    ) -> DbResult<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            r#"
            UPDATE sales SET
                amount_paid_cents = ?3,
                amount_pending_cents = ?4,
                status = ?5,
                updated_at = ?6
            WHERE id = ?1 AND amount_paid_cents = ?2
            "#,
        )
        .bind(sale_id)
        .bind(expected_paid_cents)
        .bind(new_paid_cents)
        .bind(new_pending_cents)
        .bind(new_status)
        .bind(updated_at)
        .execute(executor)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::concurrent("Sale", sale_id));
        }

        Ok(())
    }

    /// Deletes all payments for a sale. Returns the number removed.
    pub async fn delete_payments<'e, E>(executor: E, sale_id: &str) -> DbResult<u64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM payments WHERE sale_id = ?1")
            .bind(sale_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }

    /// Deletes all line items for a sale. Returns the number removed.
    pub async fn delete_items<'e, E>(executor: E, sale_id: &str) -> DbResult<u64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM sale_items WHERE sale_id = ?1")
            .bind(sale_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }

    /// Deletes a sale row.
    pub async fn delete_sale<'e, E>(executor: E, sale_id: &str) -> DbResult<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM sales WHERE id = ?1")
            .bind(sale_id)
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sale", sale_id));
        }

        Ok(())
    }
}

/// Generates a new sale ID.
pub fn generate_sale_id() -> String {
    Uuid::new_v4().to_string()
}

/// Generates a new sale item ID.
pub fn generate_sale_item_id() -> String {
    Uuid::new_v4().to_string()
}

/// Generates a new payment ID.
pub fn generate_payment_id() -> String {
    Uuid::new_v4().to_string()
}
