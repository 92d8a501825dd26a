use sync_traits::{PortError, StoreError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    /// No usable session; fatal for the pass
    #[error("authentication failed: {0}")]
    Auth(String),

    /// A listing branch failed; siblings may still proceed
    #[error("enumeration failed for {scope}: {source}")]
    Enumeration { scope: String, source: PortError },

    /// The metadata ledger failed; fatal, the pass cannot be idempotent
    /// without it
    #[error("metadata store failure: {0}")]
    Store(#[from] StoreError),
}

impl SyncError {
    /// Classify a port error raised while enumerating `scope`.
    ///
    /// Authentication failures are never branch-scoped; nothing else in
    /// the pass can succeed without a session.
    pub fn from_enumeration(scope: impl Into<String>, source: PortError) -> Self {
        match source {
            PortError::Auth(message) => SyncError::Auth(message),
            source => SyncError::Enumeration {
                scope: scope.into(),
                source,
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_is_never_branch_scoped() {
        let error = SyncError::from_enumeration("albums", PortError::Auth("expired".into()));
        assert!(matches!(error, SyncError::Auth(_)));
    }

    #[test]
    fn test_api_error_is_branch_scoped() {
        let error = SyncError::from_enumeration(
            "albums/Holiday",
            PortError::Api {
                status: 500,
                message: "backend".into(),
            },
        );
        match error {
            SyncError::Enumeration { scope, .. } => assert_eq!(scope, "albums/Holiday"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
