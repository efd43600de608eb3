/// Failure of a refresh-token exchange.
///
/// One outcome is handed to every request waiting on the exchange, so this
/// type is `Clone` and carries owned strings instead of source errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RefreshError {
    #[error("no refresh token available")]
    MissingRefreshToken,
    #[error("refresh rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },
    #[error("refresh transport error: {0}")]
    Transport(String),
    #[error("malformed refresh response: {0}")]
    Malformed(String),
    #[error("token storage error: {0}")]
    Storage(String),
    #[error("refresh abandoned before completion")]
    Abandoned,
}

/// Structural failure while decoding a bearer token
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("expected 3 token segments, found {0}")]
    Segments(usize),
    #[error("malformed token: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for RefreshError {
    fn from(err: reqwest::Error) -> Self {
        RefreshError::Transport(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for DecodeError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        DecodeError::Malformed(err.to_string())
    }
}
