use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("token file unusable: {0}")]
    TokenFile(String),

    #[error("token refresh failed: {0}")]
    RefreshFailed(String),

    #[error("not authenticated: access token expired and no refresh token stored")]
    NotAuthenticated,
}

pub type Result<T> = std::result::Result<T, AuthError>;

impl From<AuthError> for sync_traits::PortError {
    fn from(error: AuthError) -> Self {
        sync_traits::PortError::Auth(error.to_string())
    }
}
