//! # Sync Port Traits
//!
//! Port traits and shared data model for the synchronization engine.
//!
//! ## Overview
//!
//! This crate defines the seams between the sync engine and its external
//! collaborators:
//! - `MediaLibrary` - paginated enumeration of collections and items
//! - `ByteSource` - streamed byte retrieval by remote locator
//! - `MetadataStore` - the local ledger of verified downloads
//! - `TokenSource` - the authenticated-session capability
//!
//! Implementations live in provider and storage crates; the engine in
//! `core-sync` depends only on these traits.

pub mod error;
pub mod fetch;
pub mod listing;
pub mod model;
pub mod store;
pub mod token;

pub use error::{PortError, Result};
pub use fetch::{ByteSource, ByteStream};
pub use listing::MediaLibrary;
pub use model::{Collection, ItemRecord, MediaItem};
pub use store::{MetadataStore, StoreError};
pub use token::TokenSource;
