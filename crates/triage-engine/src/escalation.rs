//! The final reply decision for a chat turn.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use triage_core::{Assessment, RiskTier};

use crate::retrieval::Retrieval;

/// Retrieval confidence below which the retrieved reply is not used.
pub const DEFAULT_ACCEPTANCE_THRESHOLD: f64 = 0.15;

/// Response id reported for escalations.
pub const ESCALATION_ID: &str = "escalation_high";

/// Sent instead of any retrieved reply when risk is HIGH.
pub const ESCALATION_TEXT: &str = "I'm really sorry you're feeling that way. Your message shows signs of serious distress. I can't provide emergency services, but I recommend contacting a professional right now or calling emergency services. Would you like me to show available therapists and let you book a session immediately?";

/// Response id reported when the retrieved reply was not confident enough.
pub const EMPATHETIC_FALLBACK_ID: &str = "fallback_empathetic";

pub const EMPATHETIC_FALLBACK_TEXT: &str =
    "I hear you. Can you say a bit more about how that made you feel? I'm listening.";

/// What the bot says back, and whether the turn escalated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub text: String,
    pub escalate: bool,
    pub reason: String,
    pub response_id: String,
    /// Offer booking options alongside the reply.
    pub suggest_booking: bool,
}

/// Chooses between escalation, the retrieved reply and a generic prompt.
#[derive(Debug, Clone)]
pub struct EscalationPolicy {
    acceptance_threshold: f64,
}

impl Default for EscalationPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_ACCEPTANCE_THRESHOLD)
    }
}

impl EscalationPolicy {
    pub fn new(acceptance_threshold: f64) -> Self {
        Self {
            acceptance_threshold,
        }
    }

    pub fn acceptance_threshold(&self) -> f64 {
        self.acceptance_threshold
    }

    /// Decide the reply. HIGH risk ignores the retrieval entirely.
    pub fn decide(&self, assessment: &Assessment, retrieval: Retrieval) -> Decision {
        if assessment.risk == RiskTier::High {
            warn!("Escalating chat turn: {}", assessment.explanation);
            return Decision {
                text: ESCALATION_TEXT.to_string(),
                escalate: true,
                reason: assessment.explanation.clone(),
                response_id: ESCALATION_ID.to_string(),
                suggest_booking: true,
            };
        }

        let reason = format!("compound {}", assessment.sentiment.value);

        if retrieval.confidence < self.acceptance_threshold {
            info!(
                "Retrieved {} below acceptance ({:.3} < {:.3}), using empathetic prompt",
                retrieval.response_id, retrieval.confidence, self.acceptance_threshold
            );
            return Decision {
                text: EMPATHETIC_FALLBACK_TEXT.to_string(),
                escalate: false,
                reason,
                response_id: EMPATHETIC_FALLBACK_ID.to_string(),
                suggest_booking: false,
            };
        }

        Decision {
            text: retrieval.reply,
            escalate: false,
            reason,
            response_id: retrieval.response_id,
            suggest_booking: false,
        }
    }
}
