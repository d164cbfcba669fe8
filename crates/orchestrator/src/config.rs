//! Orchestrator configuration.

use std::env;
use std::path::PathBuf;

use sentiment::SentimentConfig;
use triage_engine::{ConfigError, EngineConfig};

use crate::error::OrchestratorError;

/// Default SQLite database location.
pub const DEFAULT_DATABASE_URL: &str = "sqlite:triage.db?mode=rwc";

/// Default number of chat turns returned by history queries.
pub const DEFAULT_HISTORY_LIMIT: usize = 200;

/// Everything needed to assemble a [`crate::TriageOrchestrator`].
#[derive(Debug, Clone)]
pub struct TriageConfig {
    /// SQLite connection URL.
    pub database_url: String,

    /// Catalog JSON file; the built-in catalog is used when unset.
    pub catalog_path: Option<PathBuf>,

    /// Reject mood submissions without journal text.
    pub require_mood_text: bool,

    /// Default limit for history listings.
    pub history_limit: usize,

    /// Retriever and policy tunables.
    pub engine: EngineConfig,

    /// Sentiment backend selection.
    pub sentiment: SentimentConfig,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            catalog_path: None,
            require_mood_text: false,
            history_limit: DEFAULT_HISTORY_LIMIT,
            engine: EngineConfig::default(),
            sentiment: SentimentConfig::default(),
        }
    }
}

impl TriageConfig {
    /// Create configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `TRIAGE_DATABASE_URL` - SQLite URL (default: sqlite:triage.db?mode=rwc)
    /// - `TRIAGE_CATALOG_PATH` - Catalog JSON file (default: built-in catalog)
    /// - `TRIAGE_REQUIRE_MOOD_TEXT` - `true` to require journal text (default: false)
    /// - `TRIAGE_HISTORY_LIMIT` - Default history page size (default: 200)
    ///
    /// Engine and sentiment settings are read by [`EngineConfig::from_env`]
    /// and [`SentimentConfig::from_env`].
    pub fn from_env() -> Result<Self, OrchestratorError> {
        let database_url =
            env::var("TRIAGE_DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        let catalog_path = env::var("TRIAGE_CATALOG_PATH")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let require_mood_text = match env::var("TRIAGE_REQUIRE_MOOD_TEXT") {
            Ok(value) => parse_bool(&value).ok_or(ConfigError::Invalid {
                var: "TRIAGE_REQUIRE_MOOD_TEXT",
                value,
            })?,
            Err(_) => false,
        };

        let history_limit = env::var("TRIAGE_HISTORY_LIMIT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_HISTORY_LIMIT);

        Ok(Self {
            database_url,
            catalog_path,
            require_mood_text,
            history_limit,
            engine: EngineConfig::from_env()?,
            sentiment: SentimentConfig::from_env()?,
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
