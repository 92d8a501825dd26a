//! Error types for the Google Photos provider

use thiserror::Error;

/// Google Photos provider errors
#[derive(Error, Debug)]
pub enum GooglePhotosError {
    /// Authentication failed or token is invalid
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// API request returned an error status
    #[error("Google Photos API error (status {status_code}): {message}")]
    ApiError { status_code: u16, message: String },

    /// Failed to parse an API response
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Network error
    #[error("Network error: {0}")]
    NetworkError(String),
}

/// Result type for Google Photos operations
pub type Result<T> = std::result::Result<T, GooglePhotosError>;

impl From<GooglePhotosError> for sync_traits::PortError {
    fn from(error: GooglePhotosError) -> Self {
        match error {
            GooglePhotosError::AuthenticationFailed(msg) => sync_traits::PortError::Auth(msg),
            GooglePhotosError::ApiError {
                status_code,
                message,
            } => sync_traits::PortError::Api {
                status: status_code,
                message,
            },
            GooglePhotosError::ParseError(msg) => sync_traits::PortError::Parse(msg),
            GooglePhotosError::NetworkError(msg) => sync_traits::PortError::Network(msg),
        }
    }
}
