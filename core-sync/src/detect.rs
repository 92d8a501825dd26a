//! # Change Detector
//!
//! Pure per-item fetch decision.

use sync_traits::{ItemRecord, MediaItem};

/// Whether `item` needs to be fetched given the ledger record for its id.
///
/// A fetch is needed when no record exists or the recorded version token
/// differs from the remote one. Size is advisory and never participates:
/// version tokens change whenever remote content changes, while size
/// fields in listing responses are frequently absent or wrong.
pub fn needs_fetch(item: &MediaItem, record: Option<&ItemRecord>) -> bool {
    match record {
        None => true,
        Some(record) => record.version != item.version,
    }
}
