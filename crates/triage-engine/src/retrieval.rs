//! Retrieval of a canned reply for free text.

use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use triage_core::{Catalog, ResponseCandidate};

use crate::config::RetrievalStrategy;
use crate::vector::VectorSpace;

/// Confidence reported when no candidate matched well enough.
pub const FALLBACK_CONFIDENCE: f64 = 0.05;

/// The chosen reply and how confident the retriever is in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Retrieval {
    pub reply: String,
    pub response_id: String,
    pub confidence: f64,
}

impl Retrieval {
    fn from_candidate(candidate: &ResponseCandidate, confidence: f64) -> Self {
        Self {
            reply: candidate.reply.clone(),
            response_id: candidate.id.clone(),
            confidence,
        }
    }
}

/// Matches text against the catalog's response candidates.
///
/// The highest scoring candidate wins outright; on ties the one earlier in
/// catalog order is kept. The fallback candidate never competes. When the
/// best score is zero or below `min_score` the fallback is returned with
/// [`FALLBACK_CONFIDENCE`]; blank input returns it with confidence `1.0`.
#[derive(Debug)]
pub struct ResponseRetriever {
    catalog: Arc<Catalog>,
    strategy: RetrievalStrategy,
    min_score: f64,
    space: OnceLock<VectorSpace>,
}

impl ResponseRetriever {
    pub fn new(catalog: Arc<Catalog>, strategy: RetrievalStrategy, min_score: f64) -> Self {
        Self {
            catalog,
            strategy,
            min_score,
            space: OnceLock::new(),
        }
    }

    pub fn strategy(&self) -> RetrievalStrategy {
        self.strategy
    }

    pub fn min_score(&self) -> f64 {
        self.min_score
    }

    /// Whether the vector space has been built yet.
    pub fn is_space_built(&self) -> bool {
        self.space.get().is_some()
    }

    pub fn retrieve(&self, text: &str) -> Retrieval {
        let fallback = self.catalog.fallback();

        if text.trim().is_empty() {
            return Retrieval::from_candidate(fallback, 1.0);
        }

        let scores = match self.strategy {
            RetrievalStrategy::Keyword => self.keyword_scores(text),
            RetrievalStrategy::Vector => self.space().similarities(text),
        };

        let mut best: Option<(usize, f64)> = None;
        for (index, score) in scores {
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((index, score));
            }
        }

        match best {
            Some((index, score)) if score > 0.0 && score >= self.min_score => {
                match self.catalog.responses().nth(index) {
                    Some(candidate) => {
                        debug!(
                            strategy = self.strategy.as_str(),
                            "Retrieved {} with confidence {:.3}", candidate.id, score
                        );
                        Retrieval::from_candidate(candidate, score.min(1.0))
                    }
                    None => Retrieval::from_candidate(fallback, FALLBACK_CONFIDENCE),
                }
            }
            _ => Retrieval::from_candidate(fallback, FALLBACK_CONFIDENCE),
        }
    }

    /// Fraction of each candidate's triggers contained in the text.
    fn keyword_scores(&self, text: &str) -> Vec<(usize, f64)> {
        let lowered = text.to_lowercase();
        self.catalog
            .responses()
            .enumerate()
            .filter(|(_, candidate)| !candidate.is_fallback())
            .map(|(index, candidate)| {
                let matched = candidate
                    .triggers
                    .iter()
                    .filter(|trigger| lowered.contains(trigger.as_str()))
                    .count();
                let score = (matched as f64 / candidate.triggers.len() as f64).min(1.0);
                (index, score)
            })
            .collect()
    }

    fn space(&self) -> &VectorSpace {
        self.space.get_or_init(|| {
            let space = VectorSpace::build(&self.catalog);
            info!(
                "Built retrieval vector space ({} terms, catalog {})",
                space.vocabulary_size(),
                self.catalog.version()
            );
            space
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use triage_core::CatalogSource;

    fn builtin(strategy: RetrievalStrategy) -> ResponseRetriever {
        ResponseRetriever::new(Arc::new(Catalog::builtin().unwrap()), strategy, 0.0)
    }

    fn small_catalog() -> Arc<Catalog> {
        let json = r#"{
            "version": "test",
            "responses": [
                {"id": "greet", "triggers": ["hello", "hi"], "reply": "Hello!"},
                {"id": "sleep", "triggers": ["sleep", "tired", "awake", "night"], "reply": "Rest well."},
                {"id": "greet_copy", "triggers": ["hi", "hello"], "reply": "Hey!"},
                {"id": "fallback", "triggers": [], "reply": "Tell me more."}
            ],
            "recommendations": [{"id": "breathing", "title": "Breathe", "body": "In and out."}],
            "phrases": {"high": ["want to die"], "medium": ["hopeless"]},
            "tiers": {"high": ["breathing"], "moderate_low": [], "moderate": []}
        }"#;
        let source: CatalogSource = serde_json::from_str(json).unwrap();
        Arc::new(Catalog::from_source(source).unwrap())
    }

    #[test]
    fn test_blank_input_returns_fallback_with_full_confidence() {
        for strategy in [RetrievalStrategy::Keyword, RetrievalStrategy::Vector] {
            let retrieval = builtin(strategy).retrieve("");
            assert_eq!(retrieval.response_id, "fallback_positive");
            assert_eq!(retrieval.confidence, 1.0);

            let retrieval = builtin(strategy).retrieve("   \n");
            assert_eq!(retrieval.confidence, 1.0);
        }
    }

    #[test]
    fn test_keyword_overlap_fraction() {
        let retriever = ResponseRetriever::new(small_catalog(), RetrievalStrategy::Keyword, 0.0);
        let retrieval = retriever.retrieve("hi there");
        assert_eq!(retrieval.response_id, "greet");
        assert_eq!(retrieval.confidence, 0.5);
    }

    #[test]
    fn test_ties_go_to_earliest() {
        let retriever = ResponseRetriever::new(small_catalog(), RetrievalStrategy::Keyword, 0.0);
        // greet and greet_copy both score 1.0
        let retrieval = retriever.retrieve("hello, hi");
        assert_eq!(retrieval.response_id, "greet");
        assert_eq!(retrieval.confidence, 1.0);
    }

    #[test]
    fn test_strictly_higher_score_wins() {
        let retriever = ResponseRetriever::new(small_catalog(), RetrievalStrategy::Keyword, 0.0);
        // greet: hi matched (0.5); sleep: tired, awake, night matched (0.75)
        let retrieval = retriever.retrieve("hi, tired and awake at night");
        assert_eq!(retrieval.response_id, "sleep");
        assert_eq!(retrieval.confidence, 0.75);
    }

    #[test]
    fn test_no_match_returns_fallback_with_low_confidence() {
        for strategy in [RetrievalStrategy::Keyword, RetrievalStrategy::Vector] {
            let retrieval = builtin(strategy).retrieve("zzz qqq xyzzy");
            assert_eq!(retrieval.response_id, "fallback_positive");
            assert_eq!(retrieval.confidence, FALLBACK_CONFIDENCE);
        }
    }

    #[test]
    fn test_min_score_cut_off() {
        let strict = ResponseRetriever::new(small_catalog(), RetrievalStrategy::Keyword, 0.6);
        let retrieval = strict.retrieve("hi there");
        assert_eq!(retrieval.response_id, "fallback");
        assert_eq!(retrieval.confidence, FALLBACK_CONFIDENCE);

        let lenient = ResponseRetriever::new(small_catalog(), RetrievalStrategy::Keyword, 0.5);
        assert_eq!(lenient.retrieve("hi there").response_id, "greet");
    }

    #[test]
    fn test_vector_strategy_matches_topic() {
        let retriever = builtin(RetrievalStrategy::Vector);
        let retrieval = retriever.retrieve("I have insomnia and can't sleep at night");
        assert_eq!(retrieval.response_id, "sleep_1");
        assert!(retrieval.confidence > 0.0 && retrieval.confidence <= 1.0);
    }

    #[test]
    fn test_vector_space_built_lazily() {
        let retriever = builtin(RetrievalStrategy::Vector);
        assert!(!retriever.is_space_built());
        retriever.retrieve("");
        assert!(!retriever.is_space_built());
        retriever.retrieve("hello");
        assert!(retriever.is_space_built());

        let keyword = builtin(RetrievalStrategy::Keyword);
        keyword.retrieve("hello");
        assert!(!keyword.is_space_built());
    }

    #[test]
    fn test_vector_space_shared_under_concurrent_first_use() {
        let retriever = builtin(RetrievalStrategy::Vector);

        let addresses: Vec<usize> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    scope.spawn(|| {
                        let result = retriever.retrieve("panic attack");
                        assert_eq!(result.response_id, "panic_help");
                        retriever.space() as *const VectorSpace as usize
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert!(addresses.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn test_retrieve_is_deterministic() {
        for strategy in [RetrievalStrategy::Keyword, RetrievalStrategy::Vector] {
            let retriever = builtin(strategy);
            let first = retriever.retrieve("work stress is crushing me");
            for _ in 0..5 {
                assert_eq!(retriever.retrieve("work stress is crushing me"), first);
            }
        }
    }
}
