//! Shared data model for remote media and the local ledger.

/// A named remote grouping of items (an album).
///
/// Read-only from the engine's perspective; created and deleted remotely,
/// never mutated locally. The title is a display name and is neither unique
/// nor filesystem-safe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    /// Opaque unique identifier
    pub id: String,

    /// Display name, sanitized before use as a directory name
    pub title: String,
}

/// A single remote media object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaItem {
    /// Opaque globally-unique identifier, stable across runs
    pub id: String,

    /// Display file name; may collide across (and within) collections
    pub filename: String,

    /// Opaque reference sufficient to request bytes. Not assumed stable or
    /// reusable beyond one fetch session.
    pub base_url: String,

    /// Opaque version token compared for equality only, never ordered
    pub version: String,

    /// Advisory byte count from response metadata; may be absent or wrong
    pub expected_size: Option<u64>,
}

/// Local ledger entry keyed by item id.
///
/// A record exists if and only if a completed, verified local copy exists
/// for that id under the last-recorded filename. Written only after bytes
/// are durably on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRecord {
    pub filename: String,
    pub version: String,
    pub size_on_disk: u64,
}
