//! Synchronous triage components for the mood triage engine.
//!
//! Every component here is pure over an immutable `Arc<Catalog>` and is safe
//! to share across tasks:
//!
//! - [`RiskClassifier`] - ordered phrase and threshold rules to a [`RiskTier`]
//! - [`ResponseRetriever`] - keyword-overlap or TF-IDF matching of a canned reply
//! - [`EscalationPolicy`] - decides between escalation, the retrieved reply and
//!   a generic empathetic prompt
//! - [`RecommendationEngine`] - tiered, deduplicated coping suggestions
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use triage_core::{Catalog, RiskTier};
//! use triage_engine::{EngineConfig, RiskClassifier, ResponseRetriever};
//!
//! let catalog = Arc::new(Catalog::builtin().unwrap());
//! let config = EngineConfig::default();
//!
//! let classifier = RiskClassifier::new(catalog.clone());
//! let (tier, _) = classifier.classify("I want to die", 0.4, None);
//! assert_eq!(tier, RiskTier::High);
//!
//! let retriever = ResponseRetriever::new(catalog, config.strategy, config.min_score);
//! let retrieval = retriever.retrieve("hi there");
//! assert_eq!(retrieval.response_id, "greet_1");
//! ```

mod config;
mod escalation;
mod recommend;
mod retrieval;
mod risk;
mod vector;

pub use config::{ConfigError, EngineConfig, RetrievalStrategy};
pub use escalation::{
    Decision, EscalationPolicy, DEFAULT_ACCEPTANCE_THRESHOLD, EMPATHETIC_FALLBACK_ID,
    EMPATHETIC_FALLBACK_TEXT, ESCALATION_ID, ESCALATION_TEXT,
};
pub use recommend::{RecommendationEngine, MAX_RECOMMENDATIONS};
pub use retrieval::{ResponseRetriever, Retrieval, FALLBACK_CONFIDENCE};
pub use risk::{
    RiskClassifier, HIGH_SENTIMENT_THRESHOLD, LOW_MOOD_THRESHOLD, MEDIUM_SENTIMENT_THRESHOLD,
};

// Re-export triage-core types for convenience
pub use triage_core::{Assessment, Catalog, RiskTier, SentimentScore, TriageContext};
