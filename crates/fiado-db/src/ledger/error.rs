//! # Ledger Error Types
//!
//! What the engine operations return: either a business rule violation from
//! fiado-core or a storage failure from this crate. Both abort the
//! enclosing transaction, so callers always see an unchanged store on error
//! and retrying is safe.

use thiserror::Error;

use crate::error::DbError;
use fiado_core::{CoreError, ValidationError};

/// Errors returned by the sale/credit ledger engine.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Business rule violation (validation, not-found, stock, consistency).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Storage failure (connection, constraint, concurrent modification).
    #[error(transparent)]
    Db(#[from] DbError),
}

impl From<ValidationError> for LedgerError {
    fn from(err: ValidationError) -> Self {
        LedgerError::Core(CoreError::Validation(err))
    }
}

impl From<sqlx::Error> for LedgerError {
    fn from(err: sqlx::Error) -> Self {
        LedgerError::Db(DbError::from(err))
    }
}

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;
