//! # fiado-db: Database Layer for Fiado POS
//!
//! This crate provides database access and the sale/credit ledger engine
//! for the Fiado POS system. It uses SQLite for local storage with sqlx for
//! async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        Fiado POS Data Flow                          │
//! │                                                                     │
//! │  Caller (HTTP layer, CLI)                                           │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ┌─────────────────────────────────────────────────────────────┐   │
//! │  │                   fiado-db (THIS CRATE)                     │   │
//! │  │                                                             │   │
//! │  │   ┌────────────┐   ┌──────────────┐   ┌────────────────┐   │   │
//! │  │   │  Database  │   │ Repositories │   │   SaleLedger   │   │   │
//! │  │   │ (pool.rs)  │   │ product.rs   │   │  create_sale   │   │   │
//! │  │   │            │◄──│ client.rs    │◄──│  register_pay. │   │   │
//! │  │   │ SqlitePool │   │ sale.rs      │   │  reverse_sale  │   │   │
//! │  │   └────────────┘   └──────────────┘   │  debt rollups  │   │   │
//! │  │         ▲                             │  StockLedger   │   │   │
//! │  │         └── migrations (embedded) ────└────────────────┘   │   │
//! │  └─────────────────────────────────────────────────────────────┘   │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  SQLite database (WAL mode, foreign keys ON)                        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (product, client, sale)
//! - [`ledger`] - The sale/credit ledger engine and stock ledger
//!
//! ## Usage
//!
//! ```rust,ignore
//! use fiado_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/fiado.db")).await?;
//!
//! let created = db.ledger().create_sale(input).await?;
//! let debt = db.ledger().client_debt(&client_id).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod ledger;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::DbError;
pub use pool::{Database, DbConfig};

// Ledger re-exports for convenience
pub use ledger::error::LedgerError;
pub use ledger::notify::{LogNotifier, LowStockNotifier, NullNotifier};
pub use ledger::stock::StockLedger;
pub use ledger::SaleLedger;

// Repository re-exports for convenience
pub use repository::client::ClientRepository;
pub use repository::product::ProductRepository;
pub use repository::sale::SaleRepository;
