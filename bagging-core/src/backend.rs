//! HTTP client for the external training service.
//!
//! The service exposes `POST /api/datasets`, `POST /api/train-model` and
//! `GET /api/health`. Both the page controller (through [`TrainingBackend`])
//! and the proxy server (through [`BackendClient::post_json`]) use it.

use crate::config::BackendConfig;
use crate::dataset::{Dataset, DatasetOption};
use crate::error::{BackendError, DatasetError};
use crate::sidebar::SidebarState;
use crate::types::{ResultSource, TrainingResult};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, warn};

pub const DATASETS_PATH: &str = "/api/datasets";
pub const TRAIN_MODEL_PATH: &str = "/api/train-model";
pub const HEALTH_PATH: &str = "/api/health";

/// Source of training results and built-in datasets.
#[async_trait]
pub trait TrainingBackend: Send + Sync {
    /// Train the configured ensemble and return its results.
    async fn train(&self, config: &SidebarState) -> Result<TrainingResult, BackendError>;

    /// Fetch a built-in dataset.
    async fn load_dataset(&self, option: DatasetOption) -> Result<Dataset, BackendError>;
}

/// reqwest-based client for the training service.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
    timeout_secs: u64,
}

impl BackendClient {
    /// Create a client from configuration. A timeout of 0 disables it.
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let mut builder = Client::builder();
        if config.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_secs));
        }
        let client = builder.build().map_err(|e| BackendError::Connection {
            message: format!("Failed to build HTTP client: {e}"),
        })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout_secs: config.timeout_secs,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn map_send_error(&self, err: reqwest::Error) -> BackendError {
        if err.is_timeout() {
            BackendError::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else {
            BackendError::Connection {
                message: err.to_string(),
            }
        }
    }

    /// Map a non-2xx status to a `BackendError`, keeping the backend's own
    /// `error` message when it sent one.
    fn map_http_error(status: reqwest::StatusCode, body_text: &str) -> BackendError {
        let body = serde_json::from_str::<Value>(body_text)
            .ok()
            .and_then(|v| v["error"].as_str().map(str::to_string))
            .unwrap_or_else(|| body_text.to_string());
        BackendError::Status {
            status: status.as_u16(),
            body,
        }
    }

    /// POST a JSON body and return the backend's status and JSON reply.
    ///
    /// Only 2xx replies with a JSON body are returned; everything else is an error.
    pub async fn post_json(&self, path: &str, body: &Value) -> Result<(u16, Value), BackendError> {
        let url = self.url(path);
        debug!(url = url.as_str(), "Forwarding request to backend");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        let body_text = response.text().await.map_err(|e| self.map_send_error(e))?;

        if !status.is_success() {
            warn!(url = url.as_str(), status = status.as_u16(), "Backend returned an error status");
            return Err(Self::map_http_error(status, &body_text));
        }

        let value: Value =
            serde_json::from_str(&body_text).map_err(|e| BackendError::InvalidResponse {
                message: format!("Invalid JSON in response: {e}"),
            })?;
        Ok((status.as_u16(), value))
    }

    /// Fetch the backend's health status.
    pub async fn health(&self) -> Result<Value, BackendError> {
        let url = self.url(HEALTH_PATH);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;
        let status = response.status();
        let body_text = response.text().await.map_err(|e| self.map_send_error(e))?;
        if !status.is_success() {
            return Err(Self::map_http_error(status, &body_text));
        }
        serde_json::from_str(&body_text).map_err(|e| BackendError::InvalidResponse {
            message: format!("Invalid JSON in response: {e}"),
        })
    }
}

fn invalid(err: impl std::fmt::Display) -> BackendError {
    BackendError::InvalidResponse {
        message: err.to_string(),
    }
}

#[async_trait]
impl TrainingBackend for BackendClient {
    async fn train(&self, config: &SidebarState) -> Result<TrainingResult, BackendError> {
        let payload = serde_json::to_value(config).map_err(invalid)?;
        let (_, reply) = self.post_json(TRAIN_MODEL_PATH, &payload).await?;
        let mut result: TrainingResult = serde_json::from_value(reply).map_err(invalid)?;
        result.source = ResultSource::Backend;
        Ok(result)
    }

    async fn load_dataset(&self, option: DatasetOption) -> Result<Dataset, BackendError> {
        if !option.is_builtin() {
            return Err(invalid(DatasetError::UploadRequired));
        }
        let payload = json!({ "dataOption": option.as_str() });
        let (_, reply) = self.post_json(DATASETS_PATH, &payload).await?;
        let dataset: Dataset = serde_json::from_value(reply).map_err(invalid)?;
        dataset.validate().map_err(invalid)?;
        Ok(dataset)
    }
}
