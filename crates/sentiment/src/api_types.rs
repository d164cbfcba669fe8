//! Text-classification inference request and response types.

use serde::{Deserialize, Serialize};

/// Request body for a classification endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct InferenceRequest<'a> {
    /// Text to classify
    pub inputs: &'a str,
}

/// One label with its probability.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Classification {
    /// Label name, e.g. "POSITIVE" or "LABEL_1"
    pub label: String,
    /// Probability in [0, 1]
    pub score: f64,
}

/// Classification endpoints return either a flat list of labels or a list
/// per input.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum InferenceResponse {
    Batched(Vec<Vec<Classification>>),
    Flat(Vec<Classification>),
}

impl InferenceResponse {
    /// Labels for the first (only) input.
    pub fn into_labels(self) -> Vec<Classification> {
        match self {
            Self::Batched(batches) => batches.into_iter().next().unwrap_or_default(),
            Self::Flat(labels) => labels,
        }
    }
}

/// Error body returned by the endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    pub error: String,
}
