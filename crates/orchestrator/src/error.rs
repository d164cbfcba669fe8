//! Error types for orchestrator operations.

use database::{DatabaseError, ValidationError};
use thiserror::Error;
use triage_core::{CatalogError, ScorerError};
use triage_engine::ConfigError;

/// Errors that can occur during orchestration.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Caller input was rejected.
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// The store failed to read or write.
    #[error("storage failed: {0}")]
    Storage(String),

    /// The catalog failed integrity checks at startup.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// The sentiment backend could not be constructed.
    #[error("scorer setup failed: {0}")]
    Scorer(#[from] ScorerError),

    /// Configuration could not be read.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl OrchestratorError {
    /// Whether retrying the same call may succeed.
    ///
    /// Triage itself is side-effect free, so only storage failures qualify.
    pub fn is_retryable(&self) -> bool {
        matches!(self, OrchestratorError::Storage(_))
    }
}

impl From<DatabaseError> for OrchestratorError {
    fn from(err: DatabaseError) -> Self {
        OrchestratorError::Storage(err.to_string())
    }
}
