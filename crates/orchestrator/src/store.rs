//! Storage collaborator for the orchestrator.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use database::{chat_turn, mood_entry, Database};
use tokio::sync::RwLock;
use triage_core::{ChatTurn, MoodEntry, NewChatTurn, NewMoodEntry};

use crate::error::OrchestratorError;

/// Persistence used by the orchestrator.
///
/// Each call is atomic on its own; the orchestrator never needs more than
/// per-call atomicity because it only appends.
#[async_trait]
pub trait TriageStore: Send + Sync {
    /// Append a scored mood entry.
    async fn create_mood_entry(&self, entry: NewMoodEntry) -> Result<MoodEntry, OrchestratorError>;

    /// Append a chat turn.
    async fn create_chat_turn(&self, turn: NewChatTurn) -> Result<ChatTurn, OrchestratorError>;

    /// A user's entries, newest first, optionally from `since` onwards.
    async fn query_mood_entries(
        &self,
        user_id: &str,
        since: Option<DateTime<Utc>>,
        limit: usize,
    ) -> Result<Vec<MoodEntry>, OrchestratorError>;

    /// Mean sentiment over the `window_days` days ending at `now`.
    async fn query_rolling_average(
        &self,
        user_id: &str,
        window_days: i64,
        now: DateTime<Utc>,
    ) -> Result<Option<f64>, OrchestratorError>;

    /// The most recent `limit` turns of a user's conversation, in append order.
    async fn list_chat_turns(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<ChatTurn>, OrchestratorError>;
}

fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

#[async_trait]
impl TriageStore for Database {
    async fn create_mood_entry(&self, entry: NewMoodEntry) -> Result<MoodEntry, OrchestratorError> {
        Ok(mood_entry::create_mood_entry(self.pool(), &entry).await?)
    }

    async fn create_chat_turn(&self, turn: NewChatTurn) -> Result<ChatTurn, OrchestratorError> {
        Ok(chat_turn::create_chat_turn(self.pool(), &turn).await?)
    }

    async fn query_mood_entries(
        &self,
        user_id: &str,
        since: Option<DateTime<Utc>>,
        limit: usize,
    ) -> Result<Vec<MoodEntry>, OrchestratorError> {
        Ok(mood_entry::list_mood_entries(self.pool(), user_id, since, sql_limit(limit)).await?)
    }

    async fn query_rolling_average(
        &self,
        user_id: &str,
        window_days: i64,
        now: DateTime<Utc>,
    ) -> Result<Option<f64>, OrchestratorError> {
        Ok(mood_entry::rolling_average(self.pool(), user_id, window_days, now).await?)
    }

    async fn list_chat_turns(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<ChatTurn>, OrchestratorError> {
        Ok(chat_turn::list_chat_turns(self.pool(), user_id, sql_limit(limit)).await?)
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    moods: Vec<MoodEntry>,
    turns: Vec<ChatTurn>,
}

/// In-process store for tests and ephemeral deployments.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stored chat turn in insertion order, including anonymous ones.
    pub async fn all_chat_turns(&self) -> Vec<ChatTurn> {
        self.state.read().await.turns.clone()
    }

    /// Every stored mood entry in insertion order.
    pub async fn all_mood_entries(&self) -> Vec<MoodEntry> {
        self.state.read().await.moods.clone()
    }
}

#[async_trait]
impl TriageStore for MemoryStore {
    async fn create_mood_entry(&self, entry: NewMoodEntry) -> Result<MoodEntry, OrchestratorError> {
        let mut state = self.state.write().await;
        let stored = MoodEntry {
            id: state.moods.len() as i64 + 1,
            user_id: entry.user_id,
            text: entry.text,
            mood_value: entry.mood_value,
            recorded_at: entry.recorded_at,
            sentiment: entry.assessment.sentiment.value,
            sentiment_degraded: entry.assessment.sentiment.degraded,
            risk_tier: entry.assessment.risk,
            risk_reason: entry.assessment.explanation,
            pipeline_version: entry.pipeline_version,
        };
        state.moods.push(stored.clone());
        Ok(stored)
    }

    async fn create_chat_turn(&self, turn: NewChatTurn) -> Result<ChatTurn, OrchestratorError> {
        let mut state = self.state.write().await;
        let stored = ChatTurn {
            id: state.turns.len() as i64 + 1,
            user_id: turn.user_id,
            sender: turn.sender,
            text: turn.text,
            created_at: turn.created_at,
            triage: turn.triage,
        };
        state.turns.push(stored.clone());
        Ok(stored)
    }

    async fn query_mood_entries(
        &self,
        user_id: &str,
        since: Option<DateTime<Utc>>,
        limit: usize,
    ) -> Result<Vec<MoodEntry>, OrchestratorError> {
        let state = self.state.read().await;
        let mut entries: Vec<MoodEntry> = state
            .moods
            .iter()
            .filter(|e| e.user_id == user_id)
            .filter(|e| since.map_or(true, |s| e.recorded_at >= s))
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at).then(b.id.cmp(&a.id)));
        entries.truncate(limit);
        Ok(entries)
    }

    async fn query_rolling_average(
        &self,
        user_id: &str,
        window_days: i64,
        now: DateTime<Utc>,
    ) -> Result<Option<f64>, OrchestratorError> {
        let cutoff = now - Duration::days(window_days);
        let state = self.state.read().await;
        let values: Vec<f64> = state
            .moods
            .iter()
            .filter(|e| e.user_id == user_id && e.recorded_at >= cutoff && e.recorded_at <= now)
            .map(|e| e.sentiment)
            .collect();

        if values.is_empty() {
            return Ok(None);
        }
        Ok(Some(values.iter().sum::<f64>() / values.len() as f64))
    }

    async fn list_chat_turns(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<ChatTurn>, OrchestratorError> {
        let state = self.state.read().await;
        let mut turns: Vec<ChatTurn> = state
            .turns
            .iter()
            .filter(|t| t.user_id.as_deref() == Some(user_id))
            .cloned()
            .collect();
        let skip = turns.len().saturating_sub(limit);
        Ok(turns.split_off(skip))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use triage_core::{Assessment, RiskTier, SentimentScore};

    fn entry(user: &str, value: f64, recorded_at: DateTime<Utc>) -> NewMoodEntry {
        NewMoodEntry {
            user_id: user.to_string(),
            text: None,
            mood_value: 5,
            recorded_at,
            assessment: Assessment {
                sentiment: SentimentScore::new(value),
                risk: RiskTier::Low,
                explanation: String::new(),
            },
            pipeline_version: "v".to_string(),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_memory_store_mood_queries() {
        let store = MemoryStore::new();
        for (days, value) in [(1, -0.5), (4, 0.1), (12, 0.9)] {
            store
                .create_mood_entry(entry("alice", value, now() - Duration::days(days)))
                .await
                .unwrap();
        }
        store
            .create_mood_entry(entry("bob", -1.0, now()))
            .await
            .unwrap();

        let entries = store.query_mood_entries("alice", None, 10).await.unwrap();
        assert_eq!(
            entries.iter().map(|e| e.sentiment).collect::<Vec<_>>(),
            vec![-0.5, 0.1, 0.9]
        );

        let limited = store.query_mood_entries("alice", None, 1).await.unwrap();
        assert_eq!(limited.len(), 1);

        let since = store
            .query_mood_entries("alice", Some(now() - Duration::days(7)), 10)
            .await
            .unwrap();
        assert_eq!(since.len(), 2);

        let avg = store
            .query_rolling_average("alice", 7, now())
            .await
            .unwrap()
            .unwrap();
        assert!((avg - -0.2).abs() < 1e-9);
        assert_eq!(store.query_rolling_average("carol", 7, now()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_store_chat_history() {
        let store = MemoryStore::new();
        for i in 0..4 {
            store
                .create_chat_turn(NewChatTurn::user(
                    Some("alice".to_string()),
                    format!("turn {}", i),
                    now() + Duration::seconds(i),
                ))
                .await
                .unwrap();
        }
        store
            .create_chat_turn(NewChatTurn::user(None, "anonymous", now()))
            .await
            .unwrap();

        let history = store.list_chat_turns("alice", 3).await.unwrap();
        let texts: Vec<&str> = history.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["turn 1", "turn 2", "turn 3"]);
        assert_eq!(store.all_chat_turns().await.len(), 5);
    }

    #[tokio::test]
    async fn test_database_store() {
        let db = Database::in_memory().await.unwrap();
        let stored = db
            .create_mood_entry(entry("alice", 0.3, now()))
            .await
            .unwrap();
        assert_eq!(stored.sentiment, 0.3);

        let entries = db.query_mood_entries("alice", None, usize::MAX).await.unwrap();
        assert_eq!(entries, vec![stored]);
    }
}
