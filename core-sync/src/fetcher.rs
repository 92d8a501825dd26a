//! # Fetch Worker Pool
//!
//! Bounded-concurrency retrying downloader with streaming I/O.
//!
//! ## Overview
//!
//! At most `concurrency` fetches run simultaneously, enforced by one
//! global semaphore shared across all groupings. Each item streams to a
//! per-attempt temporary file in fixed-size chunks so large media never
//! sits in memory whole, then is renamed into its destination on
//! completion; a failed or interrupted attempt never leaves partial bytes
//! at the destination path, and concurrent writers racing for one path
//! cannot interleave. A failure anywhere between opening the stream and
//! the final write retries the entire item after a fixed delay, except
//! authentication failures, which surface immediately as pass-fatal. The
//! ledger record is upserted strictly after the bytes are durably on
//! disk; a crash mid-download leaves no record for the unfinished item.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use sync_traits::{ByteSource, ItemRecord, MediaItem, MetadataStore, PortError};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::sync::Semaphore;
use tokio::time::sleep;
use tracing::{debug, instrument, warn};

use crate::error::SyncError;
use crate::outcome::FetchOutcome;

/// Streaming chunk size.
const CHUNK_SIZE: usize = 64 * 1024;

/// Per-item progress callback: item id and cumulative bytes written.
/// Monotonically increasing per item; no contract on call frequency.
pub type ProgressFn = Arc<dyn Fn(&str, u64) + Send + Sync>;

/// Fetch pool configuration.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Concurrency budget shared across all groupings
    pub concurrency: usize,

    /// Total attempts per item before it is declared failed
    pub max_retries: u32,

    /// Fixed delay between attempts
    pub retry_delay: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            concurrency: 4,
            max_retries: 3,
            retry_delay: Duration::from_secs(5),
        }
    }
}

/// Bounded-concurrency downloader.
pub struct FetchPool {
    source: Arc<dyn ByteSource>,
    store: Arc<dyn MetadataStore>,
    dest_root: PathBuf,
    semaphore: Arc<Semaphore>,
    config: FetchConfig,
    progress: Option<ProgressFn>,
    temp_seq: AtomicU64,
}

impl FetchPool {
    pub fn new(
        source: Arc<dyn ByteSource>,
        store: Arc<dyn MetadataStore>,
        dest_root: PathBuf,
        config: FetchConfig,
    ) -> Self {
        let semaphore = Arc::new(Semaphore::new(config.concurrency.max(1)));
        Self {
            source,
            store,
            dest_root,
            semaphore,
            config,
            progress: None,
            temp_seq: AtomicU64::new(0),
        }
    }

    /// Attach an observability callback for per-item byte progress.
    pub fn with_progress(mut self, progress: ProgressFn) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Download one item into `<dest_root>/<grouping>/<filename>`.
    ///
    /// An authentication failure is returned as `Err`: without a usable
    /// session nothing else in the pass can succeed, so it is never
    /// retried here. Every other failure mode is folded into the returned
    /// outcome so one item's permanent failure cannot abort sibling
    /// fetches.
    #[instrument(skip(self, item), fields(id = %item.id, file = %item.filename, grouping))]
    pub async fn fetch(
        &self,
        item: MediaItem,
        grouping: &str,
    ) -> Result<FetchOutcome, SyncError> {
        let permit = match self.semaphore.acquire().await {
            Ok(permit) => permit,
            Err(_) => {
                return Ok(FetchOutcome::Failed {
                    cause: "fetch pool closed".to_string(),
                    attempts: 0,
                })
            }
        };

        let dir = self.dest_root.join(grouping);
        if let Err(e) = tokio::fs::create_dir_all(&dir).await {
            return Ok(FetchOutcome::Failed {
                cause: format!("creating {}: {}", dir.display(), e),
                attempts: 0,
            });
        }
        let path = dir.join(&item.filename);

        let mut attempt = 0u32;
        let outcome = loop {
            attempt += 1;
            match self.stream_to_disk(&item, &path).await {
                Ok(bytes_written) => {
                    // Advisory only: listing/header sizes are unreliable and
                    // a mismatch is not a correctness failure.
                    if let Some(expected) = item.expected_size {
                        if expected != bytes_written {
                            warn!(
                                id = %item.id,
                                expected,
                                actual = bytes_written,
                                "Downloaded size differs from advertised size"
                            );
                        }
                    }

                    let record = ItemRecord {
                        filename: item.filename.clone(),
                        version: item.version.clone(),
                        size_on_disk: bytes_written,
                    };
                    match self.store.upsert(&item.id, record).await {
                        Ok(()) => {
                            debug!(id = %item.id, bytes_written, "Fetch complete");
                            break Ok(FetchOutcome::Fetched { bytes_written });
                        }
                        Err(e) => {
                            // Bytes are on disk but unrecorded; the next
                            // pass will re-fetch rather than trust them.
                            break Ok(FetchOutcome::Failed {
                                cause: format!("recording download: {e}"),
                                attempts: attempt,
                            });
                        }
                    }
                }
                Err(PortError::Auth(message)) => {
                    warn!(id = %item.id, "Authentication failed during fetch");
                    break Err(SyncError::Auth(message));
                }
                Err(e) => {
                    if attempt >= self.config.max_retries {
                        warn!(id = %item.id, attempts = attempt, error = %e, "Fetch failed permanently");
                        break Ok(FetchOutcome::Failed {
                            cause: e.to_string(),
                            attempts: attempt,
                        });
                    }
                    warn!(
                        id = %item.id,
                        attempt,
                        max_retries = self.config.max_retries,
                        error = %e,
                        "Fetch attempt failed, retrying after delay"
                    );
                    sleep(self.config.retry_delay).await;
                }
            }
        };

        drop(permit);
        outcome
    }

    /// One attempt: open the stream, copy it to a temporary file in
    /// chunks, and rename the completed file into `path`.
    ///
    /// The temporary name is unique per attempt and the rename is atomic
    /// within the destination directory, so a failed attempt never leaves
    /// partial bytes at `path` and two writers racing for the same path
    /// cannot interleave; `path` always holds exactly one complete body.
    async fn stream_to_disk(&self, item: &MediaItem, path: &Path) -> Result<u64, PortError> {
        let (mut reader, advertised_len) = self.source.open_stream(&item.base_url).await?;

        let temp = path.with_extension(format!(
            "part{}",
            self.temp_seq.fetch_add(1, Ordering::Relaxed)
        ));

        let copied = self.copy_stream(&mut reader, item, &temp).await;
        let written = match copied {
            Ok(written) => written,
            Err(e) => {
                let _ = tokio::fs::remove_file(&temp).await;
                return Err(e);
            }
        };
        tokio::fs::rename(&temp, path).await?;

        if let Some(advertised) = advertised_len {
            if advertised != written {
                warn!(
                    id = %item.id,
                    advertised,
                    actual = written,
                    "Stream length differs from advertised length"
                );
            }
        }
        Ok(written)
    }

    async fn copy_stream(
        &self,
        reader: &mut sync_traits::ByteStream,
        item: &MediaItem,
        temp: &Path,
    ) -> Result<u64, PortError> {
        let mut file = tokio::fs::File::create(temp).await?;
        let mut buf = vec![0u8; CHUNK_SIZE];
        let mut written = 0u64;

        loop {
            let n = reader.read(&mut buf).await?;
            if n == 0 {
                break;
            }
            file.write_all(&buf[..n]).await?;
            written += n as u64;
            if let Some(progress) = &self.progress {
                progress(&item.id, written);
            }
        }

        file.flush().await?;
        file.sync_all().await?;
        Ok(written)
    }
}
