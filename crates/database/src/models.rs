//! Database rows and their mapping to domain records.
//!
//! Timestamps are stored as unix milliseconds; risk tiers and senders as
//! their canonical lowercase/uppercase strings.

use chrono::{DateTime, TimeZone, Utc};
use sqlx::FromRow;
use triage_core::{
    Assessment, ChatTurn, MoodEntry, RiskTier, Sender, SentimentScore, TurnTriage,
};

use crate::error::DatabaseError;

/// A row of `mood_entries`.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct MoodEntryRow {
    pub id: i64,
    pub user_id: String,
    pub text: Option<String>,
    pub mood_value: i64,
    pub recorded_at_ms: i64,
    pub sentiment: f64,
    pub sentiment_degraded: bool,
    pub risk_tier: String,
    pub risk_reason: String,
    pub pipeline_version: String,
}

impl TryFrom<MoodEntryRow> for MoodEntry {
    type Error = DatabaseError;

    fn try_from(row: MoodEntryRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let invalid = |reason: String| DatabaseError::InvalidRow {
            entity: "MoodEntry",
            id,
            reason,
        };

        let mood_value = u8::try_from(row.mood_value)
            .map_err(|_| invalid(format!("mood_value {} out of range", row.mood_value)))?;
        let risk_tier = RiskTier::from_str(&row.risk_tier)
            .ok_or_else(|| invalid(format!("unknown risk tier {:?}", row.risk_tier)))?;
        let recorded_at = from_millis(row.recorded_at_ms)
            .ok_or_else(|| invalid(format!("bad timestamp {}", row.recorded_at_ms)))?;

        Ok(MoodEntry {
            id,
            user_id: row.user_id,
            text: row.text,
            mood_value,
            recorded_at,
            sentiment: row.sentiment,
            sentiment_degraded: row.sentiment_degraded,
            risk_tier,
            risk_reason: row.risk_reason,
            pipeline_version: row.pipeline_version,
        })
    }
}

/// A row of `chat_turns`. Triage columns are null on user turns.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ChatTurnRow {
    pub id: i64,
    pub user_id: Option<String>,
    pub sender: String,
    pub text: String,
    pub created_at_ms: i64,
    pub sentiment: Option<f64>,
    pub sentiment_degraded: Option<bool>,
    pub risk_tier: Option<String>,
    pub risk_reason: Option<String>,
    pub response_id: Option<String>,
    pub escalated: Option<bool>,
    pub pipeline_version: Option<String>,
}

impl TryFrom<ChatTurnRow> for ChatTurn {
    type Error = DatabaseError;

    fn try_from(row: ChatTurnRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let invalid = |reason: String| DatabaseError::InvalidRow {
            entity: "ChatTurn",
            id,
            reason,
        };

        let sender = Sender::from_str(&row.sender)
            .ok_or_else(|| invalid(format!("unknown sender {:?}", row.sender)))?;
        let created_at = from_millis(row.created_at_ms)
            .ok_or_else(|| invalid(format!("bad timestamp {}", row.created_at_ms)))?;

        let triage = match (
            row.sentiment,
            row.sentiment_degraded,
            row.risk_tier,
            row.risk_reason,
            row.response_id,
            row.escalated,
            row.pipeline_version,
        ) {
            (
                Some(sentiment),
                Some(degraded),
                Some(tier),
                Some(explanation),
                Some(response_id),
                Some(escalated),
                Some(pipeline_version),
            ) => {
                let risk = RiskTier::from_str(&tier)
                    .ok_or_else(|| invalid(format!("unknown risk tier {:?}", tier)))?;
                Some(TurnTriage {
                    assessment: Assessment {
                        sentiment: SentimentScore {
                            value: sentiment,
                            degraded,
                        },
                        risk,
                        explanation,
                    },
                    response_id,
                    escalated,
                    pipeline_version,
                })
            }
            (None, None, None, None, None, None, None) => None,
            _ => return Err(invalid("partially filled triage columns".to_string())),
        };

        if sender == Sender::Bot && triage.is_none() {
            return Err(invalid("bot turn without triage".to_string()));
        }

        Ok(ChatTurn {
            id,
            user_id: row.user_id,
            sender,
            text: row.text,
            created_at,
            triage,
        })
    }
}

/// Convert a timestamp to unix milliseconds.
pub fn to_millis(ts: DateTime<Utc>) -> i64 {
    ts.timestamp_millis()
}

/// Convert unix milliseconds back to a timestamp.
pub fn from_millis(ms: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms).single()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bot_row() -> ChatTurnRow {
        ChatTurnRow {
            id: 2,
            user_id: Some("u1".to_string()),
            sender: "bot".to_string(),
            text: "Hi".to_string(),
            created_at_ms: 1_700_000_000_000,
            sentiment: Some(0.2),
            sentiment_degraded: Some(false),
            risk_tier: Some("LOW".to_string()),
            risk_reason: Some("compound 0.2".to_string()),
            response_id: Some("greet_1".to_string()),
            escalated: Some(false),
            pipeline_version: Some("abc".to_string()),
        }
    }

    #[test]
    fn test_millis_round_trip() {
        let ts = from_millis(1_700_000_000_123).unwrap();
        assert_eq!(to_millis(ts), 1_700_000_000_123);
    }

    #[test]
    fn test_bot_row_maps_triage() {
        let turn = ChatTurn::try_from(bot_row()).unwrap();
        let triage = turn.triage.unwrap();
        assert_eq!(triage.assessment.risk, RiskTier::Low);
        assert_eq!(triage.response_id, "greet_1");
    }

    #[test]
    fn test_partial_triage_rejected() {
        let row = ChatTurnRow {
            risk_tier: None,
            ..bot_row()
        };
        assert!(matches!(
            ChatTurn::try_from(row),
            Err(DatabaseError::InvalidRow { entity: "ChatTurn", id: 2, .. })
        ));
    }

    #[test]
    fn test_unknown_tier_rejected() {
        let row = MoodEntryRow {
            id: 7,
            user_id: "u1".to_string(),
            text: None,
            mood_value: 5,
            recorded_at_ms: 0,
            sentiment: 0.0,
            sentiment_degraded: false,
            risk_tier: "SEVERE".to_string(),
            risk_reason: String::new(),
            pipeline_version: "abc".to_string(),
        };
        assert!(MoodEntry::try_from(row).is_err());
    }
}
