//! HTTP client implementation

use std::time::Duration;

use backend_api::models::ErrorResponse;
use reqwest::{Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error};
use url::Url;

use crate::errors::DashboardError;

/// HTTP client for the honeypot backend
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    base: Url,
    timeout: Duration,
}

impl HttpClient {
    /// Create a new HTTP client with a hard per-request timeout
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, DashboardError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        let base = Url::parse(&base_url).map_err(|e| {
            DashboardError::ConfigError(format!("Invalid API URL '{}': {}", base_url, e))
        })?;
        if base.cannot_be_a_base() {
            return Err(DashboardError::ConfigError(format!(
                "Invalid API URL '{}': not a base URL",
                base_url
            )));
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url,
            base,
            timeout,
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Append path segments to the base URL, percent-encoding each one
    fn url(&self, segments: &[&str]) -> Result<Url, DashboardError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| DashboardError::ConfigError(format!("Invalid API URL '{}'", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, DashboardError> {
        let url = self.url(segments)?;
        debug!("GET {}", url);
        self.send(self.client.get(url)).await
    }

    /// Make a GET request with query parameters
    pub async fn get_with_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        query: &Q,
    ) -> Result<T, DashboardError> {
        let url = self.url(segments)?;
        debug!("GET {} (with query)", url);
        self.send(self.client.get(url).query(query)).await
    }

    /// Make a POST request
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T, DashboardError> {
        let url = self.url(segments)?;
        debug!("POST {}", url);
        self.send(self.client.post(url).json(body)).await
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, DashboardError> {
        let response = request.send().await.map_err(|e| self.transport_error(e))?;

        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }

        response.json().await.map_err(|e| self.transport_error(e))
    }

    fn transport_error(&self, err: reqwest::Error) -> DashboardError {
        if err.is_timeout() {
            error!("Request timed out after {:?}", self.timeout);
            DashboardError::Timeout(self.timeout.as_secs())
        } else {
            DashboardError::HttpError(err)
        }
    }

    /// Turn a non-2xx response into an [`DashboardError::ApiError`]
    async fn status_error(response: Response) -> DashboardError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        error!("HTTP request failed: {} - {}", status, body);

        let message = serde_json::from_str::<ErrorResponse>(&body)
            .ok()
            .and_then(|parsed| parsed.message_text())
            .unwrap_or_else(|| format!("HTTP error! status: {}", status));

        DashboardError::ApiError { status, message }
    }
}
