//! Domain records shared by the engine, the orchestrator and storage.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lowest accepted mood rating.
pub const MIN_MOOD_VALUE: u8 = 1;

/// Highest accepted mood rating.
pub const MAX_MOOD_VALUE: u8 = 10;

/// Discrete triage severity, totally ordered `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    /// Canonical storage/display form.
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "LOW",
            RiskTier::Medium => "MEDIUM",
            RiskTier::High => "HIGH",
        }
    }

    /// Parse a stored tier (case-insensitive).
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "LOW" => Some(RiskTier::Low),
            "MEDIUM" => Some(RiskTier::Medium),
            "HIGH" => Some(RiskTier::High),
            _ => None,
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Author of a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Bot => "bot",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Sender::User),
            "bot" => Some(Sender::Bot),
            _ => None,
        }
    }
}

/// Normalized valence in `[-1, 1]`.
///
/// `degraded` is set when the backend failed and `value` is a stand-in
/// neutral reading rather than a real measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentScore {
    pub value: f64,
    pub degraded: bool,
}

impl SentimentScore {
    /// A trustworthy score, clamped into `[-1, 1]`.
    pub fn new(value: f64) -> Self {
        Self {
            value: value.clamp(-1.0, 1.0),
            degraded: false,
        }
    }

    /// Neutral reading for blank input.
    pub fn neutral() -> Self {
        Self::new(0.0)
    }

    /// Neutral stand-in used when the backend could not produce a score.
    pub fn degraded() -> Self {
        Self {
            value: 0.0,
            degraded: true,
        }
    }
}

/// Sentiment plus risk classification for one piece of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub sentiment: SentimentScore,
    pub risk: RiskTier,
    /// Short human-readable reason for the tier.
    pub explanation: String,
}

/// A persisted mood-journal entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodEntry {
    pub id: i64,
    pub user_id: String,
    pub text: Option<String>,
    pub mood_value: u8,
    pub recorded_at: DateTime<Utc>,
    pub sentiment: f64,
    pub sentiment_degraded: bool,
    pub risk_tier: RiskTier,
    pub risk_reason: String,
    pub pipeline_version: String,
}

/// Fields for a mood entry about to be persisted.
///
/// The assessment is mandatory, so an entry can never be stored half-scored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMoodEntry {
    pub user_id: String,
    pub text: Option<String>,
    pub mood_value: u8,
    pub recorded_at: DateTime<Utc>,
    pub assessment: Assessment,
    pub pipeline_version: String,
}

/// Triage outcome attached to a bot turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnTriage {
    pub assessment: Assessment,
    pub response_id: String,
    pub escalated: bool,
    pub pipeline_version: String,
}

/// A persisted chat turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub id: i64,
    /// `None` for anonymous chat.
    pub user_id: Option<String>,
    pub sender: Sender,
    pub text: String,
    pub created_at: DateTime<Utc>,
    /// Present on bot turns only.
    pub triage: Option<TurnTriage>,
}

/// Fields for a chat turn about to be persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewChatTurn {
    pub user_id: Option<String>,
    pub sender: Sender,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub triage: Option<TurnTriage>,
}

impl NewChatTurn {
    /// A turn written by the user.
    pub fn user(user_id: Option<String>, text: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            user_id,
            sender: Sender::User,
            text: text.into(),
            created_at,
            triage: None,
        }
    }

    /// A bot reply; always carries its triage outcome.
    pub fn bot(
        user_id: Option<String>,
        text: impl Into<String>,
        created_at: DateTime<Utc>,
        triage: TurnTriage,
    ) -> Self {
        Self {
            user_id,
            sender: Sender::Bot,
            text: text.into(),
            created_at,
            triage: Some(triage),
        }
    }
}

/// Ephemeral inputs to the recommendation engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriageContext {
    pub latest_sentiment: Option<f64>,
    pub latest_risk_tier: Option<RiskTier>,
    pub avg_sentiment_7d: Option<f64>,
    pub avg_sentiment_30d: Option<f64>,
}

impl TriageContext {
    /// Context for a caller with no history (or no identity).
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.latest_sentiment.is_none()
            && self.latest_risk_tier.is_none()
            && self.avg_sentiment_7d.is_none()
            && self.avg_sentiment_30d.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_tier_ordering() {
        assert!(RiskTier::Low < RiskTier::Medium);
        assert!(RiskTier::Medium < RiskTier::High);
        assert_eq!(RiskTier::High.max(RiskTier::Low), RiskTier::High);
    }

    #[test]
    fn test_risk_tier_parse() {
        assert_eq!(RiskTier::from_str("LOW"), Some(RiskTier::Low));
        assert_eq!(RiskTier::from_str("medium"), Some(RiskTier::Medium));
        assert_eq!(RiskTier::from_str(" High "), Some(RiskTier::High));
        assert_eq!(RiskTier::from_str("critical"), None);
        assert_eq!(RiskTier::High.to_string(), "HIGH");
    }

    #[test]
    fn test_risk_tier_serde() {
        let json = serde_json::to_string(&RiskTier::Medium).unwrap();
        assert_eq!(json, "\"MEDIUM\"");
        let parsed: RiskTier = serde_json::from_str("\"LOW\"").unwrap();
        assert_eq!(parsed, RiskTier::Low);
    }

    #[test]
    fn test_sentiment_clamped() {
        assert_eq!(SentimentScore::new(3.0).value, 1.0);
        assert_eq!(SentimentScore::new(-2.5).value, -1.0);
        assert!(!SentimentScore::neutral().degraded);
        assert!(SentimentScore::degraded().degraded);
        assert_eq!(SentimentScore::degraded().value, 0.0);
    }

    #[test]
    fn test_sender_roundtrip() {
        assert_eq!(Sender::from_str(Sender::User.as_str()), Some(Sender::User));
        assert_eq!(Sender::from_str(Sender::Bot.as_str()), Some(Sender::Bot));
        assert_eq!(Sender::from_str("system"), None);
    }

    #[test]
    fn test_empty_context() {
        assert!(TriageContext::empty().is_empty());
        let context = TriageContext {
            avg_sentiment_7d: Some(-0.2),
            ..TriageContext::default()
        };
        assert!(!context.is_empty());
    }
}
