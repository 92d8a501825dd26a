//! Transport-level error taxonomy shared by the listing and fetch ports.

use thiserror::Error;

/// Errors surfaced by port implementations.
///
/// `Auth` is pass-fatal for callers; everything else is scoped to the
/// operation that produced it.
#[derive(Error, Debug)]
pub enum PortError {
    /// The session capability could not produce usable credentials
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The remote API returned a non-success status
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Connection-level failure (DNS, TLS, reset, timeout)
    #[error("network error: {0}")]
    Network(String),

    /// The response body could not be decoded
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// Local I/O failure while consuming a stream
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for port operations.
pub type Result<T> = std::result::Result<T, PortError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = PortError::Api {
            status: 429,
            message: "quota exceeded".to_string(),
        };
        assert_eq!(error.to_string(), "API error (status 429): quota exceeded");
    }
}
