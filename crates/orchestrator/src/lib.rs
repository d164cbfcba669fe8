//! Triage orchestrator for the mood journal and support chat.
//!
//! This crate provides the [`TriageOrchestrator`] type which coordinates
//! sentiment scoring, risk classification, reply retrieval, escalation and
//! recommendations on top of a [`TriageStore`].
//!
//! # Architecture
//!
//! ```text
//! Chat message / mood submission (from the routing layer)
//!          ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   TRIAGE ORCHESTRATOR                       │
//! │                                                             │
//! │  1. Validate input                                          │
//! │         ↓                                                   │
//! │  2. Persist user turn (chat only)                           │
//! │         ↓                                                   │
//! │  3. Score sentiment (GuardedScorer, never fails)            │
//! │         ↓                                                   │
//! │  4. Classify risk (phrases → sentiment → mood rating)       │
//! │         ↓                                                   │
//! │  5. Chat: retrieve reply, decide escalation                 │
//! │     Mood: attach booking hint for HIGH risk                 │
//! │         ↓                                                   │
//! │  6. Persist scored row stamped with the pipeline version    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use orchestrator::{MemoryStore, TriageOrchestrator};
//! use sentiment::LexiconScorer;
//! use triage_core::{Catalog, GuardedScorer, RiskTier};
//! use triage_engine::EngineConfig;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), orchestrator::OrchestratorError> {
//! let orchestrator = TriageOrchestrator::new(
//!     MemoryStore::new(),
//!     GuardedScorer::new(Arc::new(LexiconScorer::new())),
//!     Arc::new(Catalog::builtin()?),
//!     &EngineConfig::default(),
//! );
//!
//! let reply = orchestrator.post_chat_turn(Some("alice"), "I want to die").await?;
//! assert!(reply.escalate);
//! assert_eq!(reply.risk_tier, RiskTier::High);
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod orchestrator;
mod results;
mod store;

pub use config::{TriageConfig, DEFAULT_DATABASE_URL, DEFAULT_HISTORY_LIMIT};
pub use error::OrchestratorError;
pub use orchestrator::TriageOrchestrator;
pub use results::{ChatReply, MoodAnalytics, MoodSubmission, Recommendations};
pub use store::{MemoryStore, TriageStore};

// Re-export commonly used types
pub use triage_core::{ChatTurn, MoodEntry, RecommendationItem, RiskTier, TriageContext};
