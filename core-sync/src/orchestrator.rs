//! # Sync Orchestrator
//!
//! Drives one full synchronization pass.
//!
//! ## Overview
//!
//! A pass enumerates collections, then each collection's items, then the
//! ungrouped pool, submitting fetch-needed items to the worker pool as
//! they are discovered; item downloads overlap with ongoing enumeration,
//! all bounded by one global concurrency budget. The pass ends when every
//! submitted outcome has resolved.
//!
//! Failure scoping: a collection whose item listing fails is recorded as a
//! failed branch and its siblings proceed; the collection list itself and
//! the pool are branches of the same rank. Only authentication and ledger
//! failures abort the pass. The engine is stateless between passes except
//! through the metadata store.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use futures::{pin_mut, StreamExt};
use sync_traits::{ByteSource, Collection, MediaItem, MediaLibrary, MetadataStore};
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};

use crate::detect::needs_fetch;
use crate::error::{Result, SyncError};
use crate::fetcher::{FetchConfig, FetchPool, ProgressFn};
use crate::outcome::{BranchFailure, FetchOutcome, PassSummary, SkipReason};
use crate::pages::items;
use crate::sanitize::sanitize_grouping;

/// Directory (and branch scope) for collection-grouped items.
pub const ALBUMS_GROUPING: &str = "albums";

/// Directory (and branch scope) for the ungrouped item pool.
pub const POOL_GROUPING: &str = "all_photos";

/// Orchestrator configuration.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Destination root; groupings become subdirectories
    pub dest_root: PathBuf,

    /// Concurrency budget shared across all groupings
    pub concurrency: usize,

    /// Total download attempts per item
    pub max_retries: u32,

    /// Fixed delay between download attempts
    pub retry_delay: Duration,

    /// When set, an item appearing under several groupings is fetched once
    /// (under whichever grouping is seen first) instead of once per
    /// destination path.
    pub collapse_across_groupings: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            dest_root: PathBuf::from("downloads"),
            concurrency: 4,
            max_retries: 3,
            retry_delay: Duration::from_secs(5),
            collapse_across_groupings: false,
        }
    }
}

/// The synchronization engine: one call to [`SyncEngine::run_pass`] is one
/// full pass.
pub struct SyncEngine {
    library: Arc<dyn MediaLibrary>,
    source: Arc<dyn ByteSource>,
    store: Arc<dyn MetadataStore>,
    config: SyncConfig,
    progress: Option<ProgressFn>,
}

impl SyncEngine {
    pub fn new(
        library: Arc<dyn MediaLibrary>,
        source: Arc<dyn ByteSource>,
        store: Arc<dyn MetadataStore>,
        config: SyncConfig,
    ) -> Self {
        Self {
            library,
            source,
            store,
            config,
            progress: None,
        }
    }

    /// Attach a per-item byte-progress callback, forwarded to the pool.
    pub fn with_progress(mut self, progress: ProgressFn) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Run one synchronization pass.
    ///
    /// Returns the aggregated summary; a summary with failed items or
    /// failed branches is a partial success. Errors are reserved for
    /// conditions under which the pass cannot meaningfully run at all:
    /// no usable session, or a broken metadata store.
    #[instrument(skip(self))]
    pub async fn run_pass(&self) -> Result<PassSummary> {
        let mut pool = FetchPool::new(
            Arc::clone(&self.source),
            Arc::clone(&self.store),
            self.config.dest_root.clone(),
            FetchConfig {
                concurrency: self.config.concurrency,
                max_retries: self.config.max_retries,
                retry_delay: self.config.retry_delay,
            },
        );
        if let Some(progress) = &self.progress {
            pool = pool.with_progress(Arc::clone(progress));
        }
        let pool = Arc::new(pool);

        let mut summary = PassSummary::default();
        let mut seen = HashSet::new();
        let mut tasks: JoinSet<Result<FetchOutcome>> = JoinSet::new();

        match self.enumerate_collections().await {
            Ok(collections) => {
                info!(count = collections.len(), "Enumerated collections");
                for collection in collections {
                    let grouping = format!(
                        "{ALBUMS_GROUPING}/{}",
                        sanitize_grouping(&collection.title)
                    );
                    if let Err(error) = self
                        .submit_collection_items(
                            &collection,
                            &grouping,
                            &pool,
                            &mut seen,
                            &mut summary,
                            &mut tasks,
                        )
                        .await
                    {
                        Self::note_branch_failure(&mut summary, error)?;
                    }
                }
            }
            Err(error) => Self::note_branch_failure(&mut summary, error)?,
        }

        if let Err(error) = self
            .submit_pool_items(&pool, &mut seen, &mut summary, &mut tasks)
            .await
        {
            Self::note_branch_failure(&mut summary, error)?;
        }

        // Join semantics: the pass is not done until every submitted
        // outcome has resolved. A fatal fetch error (no usable session)
        // returns early; dropping the set cancels the outstanding fetches.
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(outcome)) => summary.record(&outcome),
                Ok(Err(fatal)) => return Err(fatal),
                Err(e) => {
                    warn!(error = %e, "Fetch task aborted");
                    summary.record(&FetchOutcome::Failed {
                        cause: format!("task aborted: {e}"),
                        attempts: 0,
                    });
                }
            }
        }

        info!(
            fetched = summary.fetched,
            skipped = summary.skipped,
            failed = summary.failed,
            failed_branches = summary.failed_branches.len(),
            "Pass complete"
        );
        Ok(summary)
    }

    /// Collect the collection list (small relative to item listings).
    async fn enumerate_collections(&self) -> Result<Vec<Collection>> {
        let library = Arc::clone(&self.library);
        let stream = items(move |cursor| {
            let library = Arc::clone(&library);
            async move { library.list_collections(cursor).await }
        });
        pin_mut!(stream);

        let mut collections = Vec::new();
        while let Some(collection) = stream.next().await {
            collections
                .push(collection.map_err(|e| SyncError::from_enumeration(ALBUMS_GROUPING, e))?);
        }
        Ok(collections)
    }

    async fn submit_collection_items(
        &self,
        collection: &Collection,
        grouping: &str,
        pool: &Arc<FetchPool>,
        seen: &mut HashSet<String>,
        summary: &mut PassSummary,
        tasks: &mut JoinSet<Result<FetchOutcome>>,
    ) -> Result<()> {
        debug!(id = %collection.id, title = %collection.title, "Listing collection items");

        let library = Arc::clone(&self.library);
        let collection_id = collection.id.clone();
        let stream = items(move |cursor| {
            let library = Arc::clone(&library);
            let collection_id = collection_id.clone();
            async move { library.list_collection_items(&collection_id, cursor).await }
        });
        pin_mut!(stream);

        while let Some(next) = stream.next().await {
            let item = next.map_err(|e| SyncError::from_enumeration(grouping, e))?;
            self.gate_and_submit(item, grouping, pool, seen, summary, tasks)
                .await?;
        }
        Ok(())
    }

    async fn submit_pool_items(
        &self,
        pool: &Arc<FetchPool>,
        seen: &mut HashSet<String>,
        summary: &mut PassSummary,
        tasks: &mut JoinSet<Result<FetchOutcome>>,
    ) -> Result<()> {
        debug!("Listing ungrouped item pool");

        let library = Arc::clone(&self.library);
        let stream = items(move |cursor| {
            let library = Arc::clone(&library);
            async move { library.list_library_items(cursor).await }
        });
        pin_mut!(stream);

        while let Some(next) = stream.next().await {
            let item = next.map_err(|e| SyncError::from_enumeration(POOL_GROUPING, e))?;
            self.gate_and_submit(item, POOL_GROUPING, pool, seen, summary, tasks)
                .await?;
        }
        Ok(())
    }

    /// Consult the ledger and either skip the item or hand it to the pool.
    async fn gate_and_submit(
        &self,
        item: MediaItem,
        grouping: &str,
        pool: &Arc<FetchPool>,
        seen: &mut HashSet<String>,
        summary: &mut PassSummary,
        tasks: &mut JoinSet<Result<FetchOutcome>>,
    ) -> Result<()> {
        // Dedup key: by id alone when collapsing, otherwise by id plus
        // destination path, so the same item may legitimately materialize
        // under several groupings.
        let key = if self.config.collapse_across_groupings {
            item.id.clone()
        } else {
            format!("{}|{}/{}", item.id, grouping, item.filename)
        };
        if !seen.insert(key) {
            debug!(id = %item.id, grouping, "Duplicate submission in this pass");
            summary.record(&FetchOutcome::Skipped(SkipReason::DuplicateInPass));
            return Ok(());
        }

        let record = self.store.get(&item.id).await?;
        if !needs_fetch(&item, record.as_ref()) {
            debug!(id = %item.id, "Local copy is current");
            summary.record(&FetchOutcome::Skipped(SkipReason::UpToDate));
            return Ok(());
        }

        let pool = Arc::clone(pool);
        let grouping = grouping.to_string();
        tasks.spawn(async move { pool.fetch(item, &grouping).await });
        Ok(())
    }

    /// Record a branch-scoped enumeration failure; anything else is fatal.
    fn note_branch_failure(summary: &mut PassSummary, error: SyncError) -> Result<()> {
        match error {
            SyncError::Enumeration { scope, source } => {
                warn!(scope = %scope, error = %source, "Branch enumeration failed");
                summary.failed_branches.push(BranchFailure {
                    scope,
                    error: source.to_string(),
                });
                Ok(())
            }
            fatal => Err(fatal),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SyncConfig::default();
        assert_eq!(config.concurrency, 4);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.retry_delay, Duration::from_secs(5));
        assert!(!config.collapse_across_groupings);
    }
}
