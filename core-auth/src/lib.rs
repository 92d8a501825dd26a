//! # Authentication Module
//!
//! File-backed OAuth 2.0 credentials with transparent refresh.
//!
//! ## Overview
//!
//! This crate implements the `TokenSource` capability against Google's
//! authorized-user token file (`token.json`). It loads stored tokens,
//! checks expiry, exchanges the refresh token at the token endpoint when
//! the access token is stale, and persists the rotated file.
//!
//! Interactive consent is out of scope: a missing or unusable token file
//! is an authentication error, not a prompt.

pub mod error;
pub mod manager;
pub mod types;

pub use error::{AuthError, Result};
pub use manager::TokenManager;
pub use types::StoredTokens;
