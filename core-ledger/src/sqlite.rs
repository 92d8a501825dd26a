//! SQLite implementation of the metadata store contract.

use async_trait::async_trait;
use sqlx::{FromRow, Pool, Sqlite};
use sync_traits::{ItemRecord, MetadataStore, StoreError};
use tracing::debug;

/// SQLite-backed ledger.
///
/// The upsert is a single `INSERT ... ON CONFLICT DO UPDATE` statement, so
/// a record is always replaced whole: concurrent readers see either the
/// old record or the new one, never mixed fields.
pub struct SqliteLedger {
    pool: Pool<Sqlite>,
}

impl SqliteLedger {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct RecordRow {
    filename: String,
    version: String,
    size_on_disk: i64,
}

impl From<RecordRow> for ItemRecord {
    fn from(row: RecordRow) -> Self {
        ItemRecord {
            filename: row.filename,
            version: row.version,
            size_on_disk: row.size_on_disk.max(0) as u64,
        }
    }
}

#[async_trait]
impl MetadataStore for SqliteLedger {
    async fn get(&self, id: &str) -> Result<Option<ItemRecord>, StoreError> {
        let row = sqlx::query_as::<_, RecordRow>(
            "SELECT filename, version, size_on_disk FROM item_records WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(row.map(ItemRecord::from))
    }

    async fn upsert(&self, id: &str, record: ItemRecord) -> Result<(), StoreError> {
        debug!(id, version = %record.version, size = record.size_on_disk, "Upserting ledger record");

        sqlx::query(
            r#"
            INSERT INTO item_records (id, filename, version, size_on_disk)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                filename = excluded.filename,
                version = excluded.version,
                size_on_disk = excluded.size_on_disk
            "#,
        )
        .bind(id)
        .bind(&record.filename)
        .bind(&record.version)
        .bind(record.size_on_disk as i64)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_test_pool;

    fn record(version: &str, size: u64) -> ItemRecord {
        ItemRecord {
            filename: "photo.jpg".to_string(),
            version: version.to_string(),
            size_on_disk: size,
        }
    }

    #[tokio::test]
    async fn test_get_absent_returns_none() {
        let ledger = SqliteLedger::new(create_test_pool().await.unwrap());
        assert_eq!(ledger.get("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_upsert_then_get_round_trips() {
        let ledger = SqliteLedger::new(create_test_pool().await.unwrap());

        ledger.upsert("item-1", record("v1", 42)).await.unwrap();

        let stored = ledger.get("item-1").await.unwrap().unwrap();
        assert_eq!(stored, record("v1", 42));
    }

    #[tokio::test]
    async fn test_upsert_is_last_write_wins() {
        let ledger = SqliteLedger::new(create_test_pool().await.unwrap());

        ledger.upsert("item-1", record("v1", 42)).await.unwrap();
        ledger.upsert("item-1", record("v2", 99)).await.unwrap();

        let stored = ledger.get("item-1").await.unwrap().unwrap();
        assert_eq!(stored.version, "v2");
        assert_eq!(stored.size_on_disk, 99);
    }

    #[tokio::test]
    async fn test_distinct_ids_are_independent() {
        let ledger = SqliteLedger::new(create_test_pool().await.unwrap());

        ledger.upsert("a", record("v1", 1)).await.unwrap();
        ledger.upsert("b", record("v9", 2)).await.unwrap();

        assert_eq!(ledger.get("a").await.unwrap().unwrap().version, "v1");
        assert_eq!(ledger.get("b").await.unwrap().unwrap().version, "v9");
    }
}
