use crate::{
    Result,
    server::types::{PredictionRequest, PredictionResponse},
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);
pub const PREDICT_TIMEOUT: Duration = Duration::from_secs(10);
pub const BATCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Shape expected from `/batch_predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResponse {
    pub predictions: Vec<PredictionResponse>,
}

/// HTTP client for the prediction service. One request per call, no retries.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `true` only for a 200 from `/health`; any failure counts as unhealthy.
    pub async fn health(&self) -> bool {
        match self
            .http
            .get(self.url("/health"))
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await
        {
            Ok(response) => response.status() == reqwest::StatusCode::OK,
            Err(e) => {
                debug!("Health check failed: {}", e);
                false
            }
        }
    }

    pub async fn predict(&self, text: &str) -> Result<PredictionResponse> {
        let response = self
            .http
            .post(self.url("/predict"))
            .json(&PredictionRequest {
                text: text.to_string(),
            })
            .timeout(PREDICT_TIMEOUT)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .inspect_err(|e| warn!("Predict request failed: {}", e))?;

        Ok(response.json().await?)
    }

    pub async fn batch_predict(&self, texts: &[String]) -> Result<BatchResponse> {
        let response = self
            .http
            .post(self.url("/batch_predict"))
            .json(texts)
            .timeout(BATCH_TIMEOUT)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .inspect_err(|e| warn!("Batch request failed: {}", e))?;

        Ok(response.json().await?)
    }
}
