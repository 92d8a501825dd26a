//! # Metadata Ledger
//!
//! Durable key-value store of verified downloads.
//!
//! ## Overview
//!
//! Implements the `MetadataStore` contract from `sync-traits`:
//! - `SqliteLedger` - SQLite-backed, survives process restarts
//! - `MemoryLedger` - in-memory, for tests and dry runs
//!
//! The ledger holds one record per item id asserting "this item, at this
//! version, is fully on disk". Records are written only after a completed
//! download, so an abrupt termination can lose at most the work of the
//! current pass, never leave a record without its bytes.

pub mod db;
pub mod error;
pub mod memory;
pub mod sqlite;

pub use db::{create_pool, create_test_pool};
pub use error::{LedgerError, Result};
pub use memory::MemoryLedger;
pub use sqlite::SqliteLedger;
