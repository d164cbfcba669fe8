//! Chat turn operations.

use sqlx::SqlitePool;
use triage_core::{ChatTurn, NewChatTurn};

use crate::error::{DatabaseError, Result};
use crate::models::{to_millis, ChatTurnRow};

const SELECT_COLUMNS: &str = r#"
    SELECT id, user_id, sender, text, created_at_ms, sentiment, sentiment_degraded,
           risk_tier, risk_reason, response_id, escalated, pipeline_version
    FROM chat_turns
"#;

/// Insert a chat turn.
pub async fn create_chat_turn(pool: &SqlitePool, turn: &NewChatTurn) -> Result<ChatTurn> {
    let triage = turn.triage.as_ref();
    let result = sqlx::query(
        r#"
        INSERT INTO chat_turns (
            user_id, sender, text, created_at_ms, sentiment, sentiment_degraded,
            risk_tier, risk_reason, response_id, escalated, pipeline_version
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&turn.user_id)
    .bind(turn.sender.as_str())
    .bind(&turn.text)
    .bind(to_millis(turn.created_at))
    .bind(triage.map(|t| t.assessment.sentiment.value))
    .bind(triage.map(|t| t.assessment.sentiment.degraded))
    .bind(triage.map(|t| t.assessment.risk.as_str()))
    .bind(triage.map(|t| t.assessment.explanation.as_str()))
    .bind(triage.map(|t| t.response_id.as_str()))
    .bind(triage.map(|t| t.escalated))
    .bind(triage.map(|t| t.pipeline_version.as_str()))
    .execute(pool)
    .await?;

    get_chat_turn(pool, result.last_insert_rowid()).await
}

/// Get a chat turn by ID.
pub async fn get_chat_turn(pool: &SqlitePool, id: i64) -> Result<ChatTurn> {
    let row = sqlx::query_as::<_, ChatTurnRow>(&format!("{} WHERE id = ?", SELECT_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound {
            entity: "ChatTurn",
            id: id.to_string(),
        })?;

    ChatTurn::try_from(row)
}

/// The most recent `limit` turns of a user's conversation, in append order.
pub async fn list_chat_turns(pool: &SqlitePool, user_id: &str, limit: i64) -> Result<Vec<ChatTurn>> {
    let rows = sqlx::query_as::<_, ChatTurnRow>(&format!(
        r#"
        SELECT * FROM (
            {}
            WHERE user_id = ?
            ORDER BY id DESC
            LIMIT ?
        )
        ORDER BY id ASC
        "#,
        SELECT_COLUMNS
    ))
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(ChatTurn::try_from).collect()
}

/// Count turns for a user, or anonymous turns when `user_id` is `None`.
pub async fn count_chat_turns(pool: &SqlitePool, user_id: Option<&str>) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM chat_turns WHERE user_id IS ?
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}
