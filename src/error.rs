use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::domain::auth::{DecodeError, RefreshError};
use crate::infrastructure::storage::StorageError;

/// Main client error type
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Request failed with status {status}: {message}")]
    Api { status: StatusCode, message: String },

    #[error("Session expired: {0}")]
    SessionExpired(#[from] RefreshError),

    #[error("Token storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Invalid token: {0}")]
    Decode(#[from] DecodeError),

    #[error("Failed to parse response body: {0}")]
    Deserialize(#[from] serde_json::Error),
}

/// Error payload returned by the backend
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(alias = "error")]
    pub message: String,
}

impl ClientError {
    /// HTTP status carried by this error, if the backend produced one
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::SessionExpired(_) => Some(StatusCode::UNAUTHORIZED),
            Self::Transport(e) => e.status(),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    /// Build an `Api` error from a non-2xx reply body
    pub fn from_reply(status: StatusCode, body: &[u8]) -> Self {
        let message = serde_json::from_slice::<ErrorResponse>(body)
            .map(|e| e.message)
            .unwrap_or_else(|_| {
                let text = String::from_utf8_lossy(body).trim().to_string();
                if text.is_empty() {
                    status
                        .canonical_reason()
                        .unwrap_or("Unknown error")
                        .to_string()
                } else {
                    text
                }
            });

        Self::Api { status, message }
    }
}

/// Custom result type for the client
pub type ClientResult<T> = Result<T, ClientError>;
