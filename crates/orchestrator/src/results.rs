//! Values returned to the routing layer.

use serde::{Deserialize, Serialize};
use triage_core::{MoodEntry, RecommendationItem, RiskTier, TriageContext};

/// The bot's answer to one chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
    pub escalate: bool,
    pub reason: String,
    pub response_id: String,
    /// Show booking options next to the reply.
    pub suggest_booking: bool,
    pub risk_tier: RiskTier,
}

/// A stored mood entry plus follow-up hints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodSubmission {
    pub entry: MoodEntry,
    pub suggest_booking: bool,
}

/// Recommendations and the context they were chosen for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    pub context: TriageContext,
    pub items: Vec<RecommendationItem>,
}

/// Rolling sentiment averages for a user.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoodAnalytics {
    pub avg_sentiment_7d: Option<f64>,
    pub avg_sentiment_30d: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chat_reply_json_shape() {
        let reply = ChatReply {
            reply: "I hear you.".to_string(),
            escalate: false,
            reason: "compound 0.1".to_string(),
            response_id: "fallback_positive".to_string(),
            suggest_booking: false,
            risk_tier: RiskTier::Low,
        };

        let value = serde_json::to_value(&reply).unwrap();
        assert_eq!(value["risk_tier"], json!("LOW"));
        assert_eq!(value["response_id"], json!("fallback_positive"));
        assert_eq!(serde_json::from_value::<ChatReply>(value).unwrap(), reply);
    }

    #[test]
    fn test_missing_averages_serialize_as_null() {
        let analytics = MoodAnalytics {
            avg_sentiment_7d: None,
            avg_sentiment_30d: Some(-0.25),
        };
        assert_eq!(
            serde_json::to_value(analytics).unwrap(),
            json!({"avg_sentiment_7d": null, "avg_sentiment_30d": -0.25})
        );
    }
}
