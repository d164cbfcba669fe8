//! Remote text-classification model backend.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use tokio::sync::Semaphore;
use tracing::{debug, info};
use triage_core::{ScorerError, SentimentScorer};

use crate::api_types::{ApiError, Classification, InferenceRequest, InferenceResponse};
use crate::config::ModelScorerConfig;

/// A scorer that asks a hosted classification model for a label distribution
/// and turns it into a signed polarity.
///
/// In-flight requests are bounded by a semaphore so a burst of chat traffic
/// cannot overload the endpoint.
pub struct ModelScorer {
    client: Client,
    config: ModelScorerConfig,
    permits: Arc<Semaphore>,
    name: String,
}

impl ModelScorer {
    /// Create a new ModelScorer with the given configuration.
    pub fn new(config: ModelScorerConfig) -> Result<Self, ScorerError> {
        if config.api_url.trim().is_empty() {
            return Err(ScorerError::Configuration(
                "model endpoint URL is empty".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| {
                ScorerError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        info!(
            "ModelScorer initialized for {} (max concurrency: {})",
            config.api_url, config.max_concurrency
        );

        Ok(Self {
            client,
            permits: Arc::new(Semaphore::new(config.max_concurrency.max(1))),
            name: format!("model:{}", config.api_url),
            config,
        })
    }

    /// Get the configuration.
    pub fn config(&self) -> &ModelScorerConfig {
        &self.config
    }

    async fn classify(&self, text: &str) -> Result<Vec<Classification>, ScorerError> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| ScorerError::Unavailable("scorer is shutting down".to_string()))?;

        let mut request = self
            .client
            .post(&self.config.api_url)
            .header("Content-Type", "application/json")
            .json(&InferenceRequest { inputs: text });

        if let Some(ref key) = self.config.api_key {
            request = request.header("Authorization", format!("Bearer {}", key));
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ScorerError::Timeout
            } else {
                ScorerError::Network(format!("Failed to send request: {}", e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&error_text)
                .map(|e| e.error)
                .unwrap_or(error_text);

            if status.as_u16() == 503 {
                return Err(ScorerError::Unavailable(message));
            }
            return Err(ScorerError::Inference(format!(
                "API error ({}): {}",
                status.as_u16(),
                message
            )));
        }

        let parsed: InferenceResponse = response
            .json()
            .await
            .map_err(|e| ScorerError::Inference(format!("Failed to parse response: {}", e)))?;

        let labels = parsed.into_labels();
        debug!("Model labels: {:?}", labels);
        Ok(labels)
    }
}

#[async_trait]
impl SentimentScorer for ModelScorer {
    async fn polarity(&self, text: &str) -> Result<f64, ScorerError> {
        let labels = self.classify(text).await?;
        polarity_from_labels(&labels)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Collapse a label distribution into a polarity in `[-1, 1]`.
///
/// Positive labels contribute `+score`, negative labels `-score`, neutral
/// labels nothing. Unknown labels are ignored; a distribution with no
/// recognized label is an inference error.
pub(crate) fn polarity_from_labels(labels: &[Classification]) -> Result<f64, ScorerError> {
    let mut polarity = 0.0;
    let mut recognized = false;

    for c in labels {
        let sign = match c.label.to_uppercase().as_str() {
            "POSITIVE" | "POS" | "LABEL_1" => 1.0,
            "NEGATIVE" | "NEG" | "LABEL_0" => -1.0,
            "NEUTRAL" | "NEU" => 0.0,
            _ => continue,
        };
        recognized = true;
        polarity += sign * c.score;
    }

    if !recognized {
        return Err(ScorerError::Inference(
            "response contained no sentiment labels".to_string(),
        ));
    }

    Ok(polarity.clamp(-1.0, 1.0))
}
