//! In-memory ledger for tests and dry runs.

use std::collections::HashMap;

use async_trait::async_trait;
use sync_traits::{ItemRecord, MetadataStore, StoreError};
use tokio::sync::Mutex;

/// HashMap-backed ledger. Same contract as `SqliteLedger`, minus the
/// durability.
#[derive(Default)]
pub struct MemoryLedger {
    records: Mutex<HashMap<String, ItemRecord>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records held. Test convenience.
    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}

#[async_trait]
impl MetadataStore for MemoryLedger {
    async fn get(&self, id: &str) -> Result<Option<ItemRecord>, StoreError> {
        Ok(self.records.lock().await.get(id).cloned())
    }

    async fn upsert(&self, id: &str, record: ItemRecord) -> Result<(), StoreError> {
        self.records.lock().await.insert(id.to_string(), record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_ledger_round_trip() {
        let ledger = MemoryLedger::new();
        assert!(ledger.is_empty().await);

        let record = ItemRecord {
            filename: "a.jpg".to_string(),
            version: "v1".to_string(),
            size_on_disk: 10,
        };
        ledger.upsert("id", record.clone()).await.unwrap();

        assert_eq!(ledger.get("id").await.unwrap(), Some(record));
        assert_eq!(ledger.len().await, 1);
    }
}
