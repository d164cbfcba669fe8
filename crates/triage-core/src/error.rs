//! Error types for scoring and catalog loading.

use thiserror::Error;

/// Errors a sentiment backend can report.
///
/// These never reach triage callers: [`crate::GuardedScorer`] turns every
/// variant into a degraded neutral score.
#[derive(Debug, Error)]
pub enum ScorerError {
    /// The backend is temporarily unavailable.
    #[error("scorer unavailable: {0}")]
    Unavailable(String),

    /// The backend answered but inference failed.
    #[error("inference failed: {0}")]
    Inference(String),

    /// Network error talking to a remote model.
    #[error("network error: {0}")]
    Network(String),

    /// The backend is misconfigured.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Inference took longer than allowed.
    #[error("inference timed out")]
    Timeout,
}

/// Catalog integrity and loading errors.
///
/// Raised once at startup; a running engine always holds a valid catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Two entries in the same section share an id.
    #[error("duplicate {kind} id: {id}")]
    DuplicateId { kind: &'static str, id: String },

    /// No response candidate has an empty trigger set.
    #[error("catalog has no fallback response (a candidate with no triggers)")]
    MissingFallback,

    /// More than one response candidate has an empty trigger set.
    #[error("catalog has more than one fallback response: {first}, {second}")]
    MultipleFallbacks { first: String, second: String },

    /// A required section has no entries.
    #[error("catalog section is empty: {0}")]
    EmptySection(&'static str),

    /// A recommendation tier names an item that does not exist.
    #[error("recommendation tier {tier} references unknown item: {id}")]
    UnknownTierItem { tier: &'static str, id: String },

    /// The catalog file could not be read.
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    /// The catalog file is not valid JSON for the catalog schema.
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
}
