use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

use super::{ApiRequest, ApiResponse, RefreshCoordinator, AUTH_HEADER, X_REQUEST_ID};
use crate::error::ClientResult;
use crate::infrastructure::config::Config;
use crate::infrastructure::storage::TokenStore;

/// HTTP client that attaches the access token and recovers from expiry
pub struct HttpClient {
    base_url: String,
    http_client: reqwest::Client,
    token_store: Arc<dyn TokenStore>,
    coordinator: Arc<RefreshCoordinator>,
    refresh_path: String,
    unauthenticated_paths: Vec<String>,
}

impl HttpClient {
    pub fn new(
        http_client: reqwest::Client,
        config: &Config,
        token_store: Arc<dyn TokenStore>,
        coordinator: Arc<RefreshCoordinator>,
    ) -> Self {
        Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            http_client,
            token_store,
            coordinator,
            refresh_path: config.refresh_path.clone(),
            unauthenticated_paths: config.unauthenticated_paths.clone(),
        }
    }

    /// Send a request with the stored access token.
    ///
    /// A 401 on an ordinary request triggers one refresh (shared with any
    /// concurrent request) and a single replay with the new token. Retries,
    /// the refresh endpoint itself and unauthenticated endpoints never refresh.
    /// A 401 for a token that has already been replaced in the store is
    /// replayed with the stored token instead of starting another exchange.
    pub async fn send(&self, mut request: ApiRequest) -> ClientResult<ApiResponse> {
        let sent_token = self.token_store.access_token();
        let response = self.dispatch(&request, sent_token.as_deref()).await?;

        if response.status != StatusCode::UNAUTHORIZED {
            return response.into_result();
        }

        if request.is_retry() {
            tracing::warn!(
                path = %request.path,
                request_id = request.request_id(),
                "Replayed request rejected again, giving up"
            );
            return response.into_result();
        }

        if self.is_refresh_path(&request.path) {
            tracing::debug!(path = %request.path, "401 from refresh endpoint, not refreshing");
            return response.into_result();
        }

        if self.is_unauthenticated_path(&request.path) {
            tracing::debug!(path = %request.path, "401 from unauthenticated endpoint, credentials rejected");
            return response.into_result();
        }

        request.mark_retry();

        let token = match self.token_store.access_token() {
            Some(current) if sent_token.as_deref() != Some(current.as_str()) => {
                tracing::debug!(
                    path = %request.path,
                    request_id = request.request_id(),
                    "Access token already refreshed, replaying"
                );
                current
            }
            _ => {
                tracing::info!(
                    path = %request.path,
                    request_id = request.request_id(),
                    "Access token rejected, waiting for refresh"
                );
                self.coordinator.refresh().await?
            }
        };
        let replayed = self.dispatch(&request, Some(&token)).await?;

        replayed.into_result()
    }

    async fn dispatch(&self, request: &ApiRequest, token: Option<&str>) -> ClientResult<ApiResponse> {
        let url = format!("{}{}", self.base_url, request.path);

        let mut builder = self
            .http_client
            .request(request.method.clone(), &url)
            .header(X_REQUEST_ID, request.request_id());

        if let Some(token) = token {
            builder = builder.header(AUTH_HEADER, token);
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = ApiResponse::read(builder.send().await?).await?;

        tracing::debug!(
            method = %request.method,
            path = %request.path,
            status = response.status.as_u16(),
            retry = request.is_retry(),
            request_id = request.request_id(),
            "Request completed"
        );

        Ok(response)
    }

    fn is_refresh_path(&self, path: &str) -> bool {
        path.contains(self.refresh_path.as_str())
    }

    fn is_unauthenticated_path(&self, path: &str) -> bool {
        self.unauthenticated_paths
            .iter()
            .any(|exempt| path.contains(exempt.as_str()))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send(ApiRequest::get(path)).await?.json()
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(ApiRequest::post(path).json(body)?).await?.json()
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(ApiRequest::put(path).json(body)?).await?.json()
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(ApiRequest::patch(path).json(body)?).await?.json()
    }

    pub async fn delete(&self, path: &str) -> ClientResult<()> {
        self.send(ApiRequest::delete(path)).await?;
        Ok(())
    }
}
