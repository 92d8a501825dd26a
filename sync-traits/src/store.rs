//! Key-value metadata store contract.

use async_trait::async_trait;
use thiserror::Error;

use crate::model::ItemRecord;

/// Errors from a metadata store backend.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("metadata store backend error: {0}")]
    Backend(String),
}

/// The local ledger of verified downloads, keyed by item id.
///
/// `get` has no side effects; absence means "never successfully synced, or
/// synced and later evicted". `upsert` is idempotent, last-write-wins, and
/// atomic per record: an observer sees either the old record or the new one
/// in full, never a mix. Concurrent upserts for distinct ids are safe.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    async fn get(&self, id: &str) -> std::result::Result<Option<ItemRecord>, StoreError>;

    async fn upsert(&self, id: &str, record: ItemRecord) -> std::result::Result<(), StoreError>;
}
