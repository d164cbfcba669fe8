//! Context-aware coping recommendations.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;
use triage_core::{Catalog, RecommendationItem, RiskTier, TriageContext};

use crate::risk::HIGH_SENTIMENT_THRESHOLD;

/// Most items returned by one call.
pub const MAX_RECOMMENDATIONS: usize = 12;

/// 7-day average at or below which routine and connection items lead.
const LOW_AVERAGE_THRESHOLD: f64 = -0.5;

/// Picks up to [`MAX_RECOMMENDATIONS`] catalog items for a user's recent state.
///
/// Tiers are applied in priority order and each only adds items not already
/// chosen; within a tier items keep catalog order. The remainder is filled
/// from the catalog in order.
///
/// Tiers stack: a HIGH context still gets the MODERATE-LOW or MODERATE items
/// its weekly average calls for, right after the HIGH items, rather than
/// HIGH replacing them.
#[derive(Debug, Clone)]
pub struct RecommendationEngine {
    catalog: Arc<Catalog>,
}

impl RecommendationEngine {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    pub fn recommend(&self, context: &TriageContext) -> Vec<RecommendationItem> {
        let tiers = self.catalog.tiers();
        let mut selected: Vec<&RecommendationItem> = Vec::with_capacity(MAX_RECOMMENDATIONS);
        let mut seen: HashSet<&str> = HashSet::new();

        let high = context.latest_risk_tier == Some(RiskTier::High)
            || context
                .latest_sentiment
                .is_some_and(|s| s <= HIGH_SENTIMENT_THRESHOLD);
        if high {
            self.extend_tier(&tiers.high, &mut selected, &mut seen);
        }

        if let Some(avg) = context.avg_sentiment_7d {
            if avg <= LOW_AVERAGE_THRESHOLD {
                self.extend_tier(&tiers.moderate_low, &mut selected, &mut seen);
            } else if avg <= 0.0 {
                self.extend_tier(&tiers.moderate, &mut selected, &mut seen);
            }
        }

        let prioritized = selected.len();
        for item in self.catalog.recommendations() {
            if selected.len() >= MAX_RECOMMENDATIONS {
                break;
            }
            if seen.insert(item.id.as_str()) {
                selected.push(item);
            }
        }
        selected.truncate(MAX_RECOMMENDATIONS);

        debug!(
            "Recommending {} items ({} prioritized)",
            selected.len(),
            prioritized
        );

        selected.into_iter().cloned().collect()
    }

    /// Append the tier's items in catalog order, skipping ones already chosen.
    fn extend_tier<'a>(
        &'a self,
        ids: &[String],
        selected: &mut Vec<&'a RecommendationItem>,
        seen: &mut HashSet<&'a str>,
    ) {
        for item in self.catalog.recommendations() {
            if ids.iter().any(|id| id == &item.id) && seen.insert(item.id.as_str()) {
                selected.push(item);
            }
        }
    }
}
