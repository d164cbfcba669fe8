//! Mood entry operations.
//!
//! Entries are append-only: there is no update path, so a stored sentiment
//! and risk tier always belong to the pipeline version written alongside.

use chrono::{DateTime, Duration, Utc};
use sqlx::SqlitePool;
use triage_core::{MoodEntry, NewMoodEntry};

use crate::error::{DatabaseError, Result};
use crate::models::{to_millis, MoodEntryRow};

const SELECT_COLUMNS: &str = r#"
    SELECT id, user_id, text, mood_value, recorded_at_ms, sentiment,
           sentiment_degraded, risk_tier, risk_reason, pipeline_version
    FROM mood_entries
"#;

/// Insert a scored mood entry.
pub async fn create_mood_entry(pool: &SqlitePool, entry: &NewMoodEntry) -> Result<MoodEntry> {
    let assessment = &entry.assessment;
    let result = sqlx::query(
        r#"
        INSERT INTO mood_entries (
            user_id, text, mood_value, recorded_at_ms, sentiment, sentiment_degraded,
            risk_tier, risk_reason, pipeline_version, created_at_ms
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&entry.user_id)
    .bind(&entry.text)
    .bind(i64::from(entry.mood_value))
    .bind(to_millis(entry.recorded_at))
    .bind(assessment.sentiment.value)
    .bind(assessment.sentiment.degraded)
    .bind(assessment.risk.as_str())
    .bind(&assessment.explanation)
    .bind(&entry.pipeline_version)
    .bind(to_millis(Utc::now()))
    .execute(pool)
    .await?;

    let id = result.last_insert_rowid();
    tracing::debug!("Stored mood entry {} for {}", id, entry.user_id);

    get_mood_entry(pool, id).await
}

/// Get a mood entry by ID.
pub async fn get_mood_entry(pool: &SqlitePool, id: i64) -> Result<MoodEntry> {
    let row = sqlx::query_as::<_, MoodEntryRow>(&format!("{} WHERE id = ?", SELECT_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound {
            entity: "MoodEntry",
            id: id.to_string(),
        })?;

    MoodEntry::try_from(row)
}

/// List a user's entries, newest first, optionally only those recorded at or
/// after `since`.
pub async fn list_mood_entries(
    pool: &SqlitePool,
    user_id: &str,
    since: Option<DateTime<Utc>>,
    limit: i64,
) -> Result<Vec<MoodEntry>> {
    let since_ms = since.map(to_millis);
    let rows = sqlx::query_as::<_, MoodEntryRow>(&format!(
        r#"{}
        WHERE user_id = ? AND (? IS NULL OR recorded_at_ms >= ?)
        ORDER BY recorded_at_ms DESC, id DESC
        LIMIT ?
        "#,
        SELECT_COLUMNS
    ))
    .bind(user_id)
    .bind(since_ms)
    .bind(since_ms)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(MoodEntry::try_from).collect()
}

/// The most recently recorded entry for a user.
pub async fn latest_mood_entry(pool: &SqlitePool, user_id: &str) -> Result<Option<MoodEntry>> {
    Ok(list_mood_entries(pool, user_id, None, 1)
        .await?
        .into_iter()
        .next())
}

/// Mean sentiment of entries recorded in the `window_days` days up to `now`.
///
/// `None` when the window holds no entries.
pub async fn rolling_average(
    pool: &SqlitePool,
    user_id: &str,
    window_days: i64,
    now: DateTime<Utc>,
) -> Result<Option<f64>> {
    let cutoff = now - Duration::days(window_days);
    let avg = sqlx::query_scalar::<_, Option<f64>>(
        r#"
        SELECT AVG(sentiment)
        FROM mood_entries
        WHERE user_id = ? AND recorded_at_ms >= ? AND recorded_at_ms <= ?
        "#,
    )
    .bind(user_id)
    .bind(to_millis(cutoff))
    .bind(to_millis(now))
    .fetch_one(pool)
    .await?;

    Ok(avg)
}

/// Count a user's entries.
pub async fn count_mood_entries(pool: &SqlitePool, user_id: &str) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM mood_entries WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}
