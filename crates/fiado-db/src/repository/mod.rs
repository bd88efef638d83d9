//! # Repository Layer
//!
//! One repository per aggregate. Single-statement reads hang off a
//! pool-holding struct (callers outside a transaction); transactional
//! writes are associated functions that take any SQLite executor, so the
//! ledger engine can run them inside its own transaction.

pub mod client;
pub mod product;
pub mod sale;
