//! # Stock Ledger
//!
//! The single primitive through which product stock ever changes.
//!
//! ## One Statement, No Race
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                   Stock Adjustment Strategy                         │
//! │                                                                     │
//! │  ❌ WRONG: check-then-act (racy)                                    │
//! │     SELECT stock FROM products WHERE id = ?    -- both sellers      │
//! │     -- both see 5, both decide 5 >= 3 is fine  -- read 5 here       │
//! │     UPDATE products SET stock = 2              -- stock ends at 2,  │
//! │                                                -- 6 units left shop │
//! │                                                                     │
//! │  ✅ CORRECT: guarded delta update                                   │
//! │     UPDATE products SET stock = stock + ?delta                      │
//! │     WHERE id = ? AND stock + ?delta >= 0                            │
//! │     RETURNING stock                                                 │
//! │                                                                     │
//! │  Sufficiency check and mutation are one atomic statement. A guard   │
//! │  miss distinguishes "product missing" from "not enough stock".      │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every adjustment writes a `stock_movements` audit row in the same
//! transaction. The running sum of a product's movement deltas always
//! equals its current stock.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::DbError;
use crate::ledger::error::{LedgerError, LedgerResult};
use crate::repository::product::ProductRepository;
use fiado_core::{CoreError, MovementRef, MovementType, StockAdjustment, StockMovement};

/// Handle for stock adjustments and the movement audit trail.
///
/// Sale creation and reversal call [`StockLedger::adjust_in`] inside their
/// own transactions; manual corrections and initial stocking use
/// [`StockLedger::adjust`], which opens one of its own. Same primitive
/// either way.
#[derive(Debug, Clone)]
pub struct StockLedger {
    pool: SqlitePool,
}

impl StockLedger {
    /// Creates a new StockLedger.
    pub fn new(pool: SqlitePool) -> Self {
        StockLedger { pool }
    }

    /// Adjusts stock as a standalone operation (manual correction path).
    ///
    /// ## Arguments
    /// * `product_id` - Product UUID
    /// * `delta` - Signed change (positive restocks, negative removes)
    /// * `reason` - Free-text audit note, e.g. "initial stock"
    pub async fn adjust(
        &self,
        product_id: &str,
        delta: i64,
        reason: &str,
    ) -> LedgerResult<StockAdjustment> {
        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        let adjustment =
            Self::adjust_in(&mut tx, product_id, delta, reason, MovementRef::manual()).await?;

        tx.commit().await.map_err(DbError::from)?;

        Ok(adjustment)
    }

    /// Adjusts stock inside the caller's open transaction.
    ///
    /// ## What This Does
    /// 1. Applies a guarded delta update; a guard miss with an existing
    ///    product means insufficient stock and changes nothing
    /// 2. Derives the movement type from the delta's sign
    /// 3. Writes the movement audit row in the same transaction
    ///
    /// ## Errors
    /// * `CoreError::NotFound` - product id does not exist
    /// * `CoreError::InsufficientStock` - delta would take stock below zero
    pub async fn adjust_in(
        conn: &mut SqliteConnection,
        product_id: &str,
        delta: i64,
        reason: &str,
        reference: MovementRef,
    ) -> LedgerResult<StockAdjustment> {
        let now = Utc::now();

        let stock_after: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE products
            SET stock = stock + ?2, updated_at = ?3
            WHERE id = ?1 AND stock + ?2 >= 0
            RETURNING stock
            "#,
        )
        .bind(product_id)
        .bind(delta)
        .bind(now)
        .fetch_optional(&mut *conn)
        .await
        .map_err(DbError::from)?;

        let stock_after = match stock_after {
            Some(stock) => stock,
            None => {
                // Guard missed: tell the caller which rule failed.
                return match ProductRepository::fetch(&mut *conn, product_id).await? {
                    None => Err(LedgerError::Core(CoreError::not_found("Product", product_id))),
                    Some(product) => Err(LedgerError::Core(CoreError::InsufficientStock {
                        name: product.name,
                        available: product.stock,
                        requested: delta.abs(),
                    })),
                };
            }
        };

        let stock_before = stock_after - delta;

        debug!(
            product_id = %product_id,
            delta = delta,
            stock_before = stock_before,
            stock_after = stock_after,
            reason = %reason,
            "Stock adjusted"
        );

        let movement = StockMovement {
            id: Uuid::new_v4().to_string(),
            product_id: product_id.to_string(),
            movement_type: MovementType::from_delta(delta),
            quantity: delta.abs(),
            stock_before,
            stock_after,
            reason: reason.to_string(),
            ref_kind: reference.kind,
            ref_id: reference.id,
            created_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO stock_movements (
                id, product_id, movement_type, quantity, stock_before,
                stock_after, reason, ref_kind, ref_id, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&movement.id)
        .bind(&movement.product_id)
        .bind(movement.movement_type)
        .bind(movement.quantity)
        .bind(movement.stock_before)
        .bind(movement.stock_after)
        .bind(&movement.reason)
        .bind(movement.ref_kind)
        .bind(&movement.ref_id)
        .bind(movement.created_at)
        .execute(&mut *conn)
        .await
        .map_err(DbError::from)?;

        Ok(StockAdjustment {
            stock_before,
            stock_after,
        })
    }

    /// Movement audit trail for a product, oldest first.
    pub async fn movements(&self, product_id: &str) -> LedgerResult<Vec<StockMovement>> {
        let movements = sqlx::query_as::<_, StockMovement>(
            r#"
            SELECT id, product_id, movement_type, quantity, stock_before,
                   stock_after, reason, ref_kind, ref_id, created_at
            FROM stock_movements
            WHERE product_id = ?1
            ORDER BY created_at, id
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::from)?;

        Ok(movements)
    }
}
