//! Mock sentiment scorers for exercising the triage pipeline.
//!
//! This crate provides mock implementations of the `SentimentScorer` trait:
//! - `FixedScorer` - Returns the same polarity for every input, or a polarity
//!   chosen by keyword
//! - `FailingScorer` - Always fails with a configurable error
//! - `DelayedScorer` - Wraps another scorer with artificial delay
//!
//! For real scoring, use the `sentiment` crate instead.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use mock_scorer::{FixedScorer, GuardedScorer};
//!
//! #[tokio::main]
//! async fn main() {
//!     let scorer = GuardedScorer::new(Arc::new(FixedScorer::new(-0.7)));
//!
//!     let score = scorer.score("anything at all").await;
//!     assert_eq!(score.value, -0.7);
//! }
//! ```

mod delayed;
mod failing;
mod fixed;

// Re-export triage-core types for convenience
pub use triage_core::{async_trait, GuardedScorer, ScorerError, SentimentScore, SentimentScorer};

pub use delayed::DelayedScorer;
pub use failing::FailingScorer;
pub use fixed::FixedScorer;
