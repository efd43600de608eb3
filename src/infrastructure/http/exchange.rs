use async_trait::async_trait;

use crate::domain::auth::{RefreshError, RefreshTokenRequest, RefreshTokenResponse};
use crate::error::ErrorResponse;

/// The backend's refresh-token exchange.
#[async_trait]
pub trait RefreshExchange: Send + Sync {
    /// Trade a refresh token for a new access token.
    ///
    /// # Errors
    /// Returns `RefreshError::Rejected` on a non-2xx reply and
    /// `RefreshError::Transport` when the backend cannot be reached.
    async fn exchange(&self, refresh_token: &str) -> Result<RefreshTokenResponse, RefreshError>;
}

/// `POST {base}{refresh_path}` with `{refreshToken}`
pub struct HttpRefreshExchange {
    endpoint: String,
    http_client: reqwest::Client,
}

impl HttpRefreshExchange {
    pub fn new(http_client: reqwest::Client, base_url: &str, refresh_path: &str) -> Self {
        Self {
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), refresh_path),
            http_client,
        }
    }
}

#[async_trait]
impl RefreshExchange for HttpRefreshExchange {
    async fn exchange(&self, refresh_token: &str) -> Result<RefreshTokenResponse, RefreshError> {
        let response = self
            .http_client
            .post(&self.endpoint)
            .json(&RefreshTokenRequest {
                refresh_token: refresh_token.to_string(),
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let message = serde_json::from_str::<ErrorResponse>(&error_text)
                .map(|e| e.message)
                .unwrap_or(error_text);

            return Err(RefreshError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<RefreshTokenResponse>()
            .await
            .map_err(|e| RefreshError::Malformed(e.to_string()))
    }
}
