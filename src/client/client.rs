//! DevCare REST API Client
//!
//! HTTP client for the telemetry backend's status, break, reset and health
//! endpoints.

use async_trait::async_trait;
use reqwest::{Client, Response};

use super::dto::{decode_status, HealthReport, HealthResponse};
use super::error::{ClientError, ClientResult};
use super::StatusBackend;
use crate::config::BackendConfig;
use crate::telemetry::{ActionResult, TelemetrySnapshot};

/// DevCare backend client
pub struct DevCareClient {
    client: Client,
    config: BackendConfig,
}

impl DevCareClient {
    /// Create a new client with the given backend configuration
    pub fn new(config: BackendConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self { client, config })
    }

    /// Get the current configuration
    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Full URL for an endpoint under the configured prefix
    pub fn endpoint(&self, name: &str) -> String {
        let base = self.config.url.trim_end_matches('/');
        let prefix = self.config.api_prefix.trim_matches('/');
        if prefix.is_empty() {
            format!("{}/{}", base, name)
        } else {
            format!("{}/{}/{}", base, prefix, name)
        }
    }

    /// Check backend health and component availability
    pub async fn health_check(&self) -> ClientResult<HealthReport> {
        let response = self.get("health").await?;
        let response = Self::require_success(response).await?;
        let body = response.bytes().await.map_err(ClientError::from_transport)?;
        let health: HealthResponse = serde_json::from_slice(&body)?;
        Ok(health.into())
    }

    async fn get(&self, name: &str) -> ClientResult<Response> {
        self.client
            .get(self.endpoint(name))
            .send()
            .await
            .map_err(ClientError::from_transport)
    }

    /// POST with no body and read an action result
    ///
    /// A non-success status is reported as an unsuccessful action rather
    /// than an error.
    async fn post_action(&self, name: &str) -> ClientResult<ActionResult> {
        let response = self
            .client
            .post(self.endpoint(name))
            .send()
            .await
            .map_err(ClientError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            tracing::debug!(endpoint = name, status = status.as_u16(), body = %text, "Action rejected");
            return Ok(ActionResult::rejected(format!("HTTP {}", status.as_u16())));
        }

        let body = response.bytes().await.map_err(ClientError::from_transport)?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn require_success(response: Response) -> ClientResult<Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            Err(ClientError::ApiError {
                status: status.as_u16(),
                message: text,
            })
        }
    }
}

#[async_trait]
impl StatusBackend for DevCareClient {
    async fn fetch_status(&self) -> ClientResult<TelemetrySnapshot> {
        let response = self.get("status").await?;
        let response = Self::require_success(response).await?;
        let body = response.bytes().await.map_err(ClientError::from_transport)?;
        let payload = decode_status(&body, self.config.payload_shape)?;
        Ok(payload.into())
    }

    async fn record_break(&self) -> ClientResult<ActionResult> {
        self.post_action("break").await
    }

    async fn reset_stats(&self) -> ClientResult<ActionResult> {
        self.post_action("reset").await
    }
}
