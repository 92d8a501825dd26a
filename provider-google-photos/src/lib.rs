//! # Google Photos Provider
//!
//! Implements the `MediaLibrary` and `ByteSource` traits for the Google
//! Photos Library API v1.
//!
//! ## Overview
//!
//! This crate provides:
//! - Paginated album listing and per-album media item search
//! - Paginated listing of the full (ungrouped) library
//! - Streaming downloads of original media bytes
//! - OAuth 2.0 bearer authentication via a `TokenSource`

pub mod connector;
pub mod error;
pub mod types;

pub use connector::GooglePhotosConnector;
pub use error::{GooglePhotosError, Result};
