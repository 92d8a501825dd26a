//! # Incremental Synchronization Engine
//!
//! Mirrors a remote media library to local disk without redundant
//! transfers.
//!
//! ## Overview
//!
//! One pass enumerates remote collections and the ungrouped pool through
//! cursor pagination, decides per item whether the local copy is current,
//! streams stale or missing items to disk with bounded parallelism and
//! retries, and records each completed download in the metadata ledger so
//! the next pass skips it.
//!
//! ## Components
//!
//! - **Pagination Enumerator** (`pages`): lazy cursor-driven listing streams
//! - **Change Detector** (`detect`): version-token comparison against the ledger
//! - **Fetch Worker Pool** (`fetcher`): bounded-concurrency retrying downloader
//! - **Sync Orchestrator** (`orchestrator`): drives one pass and aggregates outcomes

pub mod detect;
pub mod error;
pub mod fetcher;
pub mod orchestrator;
pub mod outcome;
pub mod pages;
pub mod sanitize;

pub use detect::needs_fetch;
pub use error::{Result, SyncError};
pub use fetcher::{FetchConfig, FetchPool, ProgressFn};
pub use orchestrator::{SyncConfig, SyncEngine, ALBUMS_GROUPING, POOL_GROUPING};
pub use outcome::{BranchFailure, FetchOutcome, PassSummary, SkipReason};
pub use pages::{items, pages};
pub use sanitize::sanitize_grouping;
