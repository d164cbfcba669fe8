//! End-to-end flows through the orchestrator.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Duration as ChronoDuration, Utc};
use database::Database;
use futures::future::join_all;
use mock_scorer::{DelayedScorer, FailingScorer, FixedScorer};
use orchestrator::{MemoryStore, OrchestratorError, RiskTier, TriageOrchestrator, TriageStore};
use sentiment::LexiconScorer;
use triage_core::{Catalog, GuardedScorer, Sender};
use triage_engine::EngineConfig;

fn catalog() -> Arc<Catalog> {
    Arc::new(Catalog::builtin().unwrap())
}

fn lexicon() -> GuardedScorer {
    GuardedScorer::new(Arc::new(LexiconScorer::new()))
}

fn memory_orchestrator(scorer: GuardedScorer) -> TriageOrchestrator<MemoryStore> {
    TriageOrchestrator::new(MemoryStore::new(), scorer, catalog(), &EngineConfig::default())
}

async fn database_orchestrator(scorer: GuardedScorer) -> TriageOrchestrator<Database> {
    let db = Database::in_memory().await.unwrap();
    TriageOrchestrator::new(db, scorer, catalog(), &EngineConfig::default())
}

#[tokio::test]
async fn test_high_risk_chat_escalates_and_persists_both_turns() {
    let orchestrator = memory_orchestrator(lexicon());

    let reply = orchestrator
        .post_chat_turn(Some("alice"), "I feel hopeless and want to die")
        .await
        .unwrap();

    assert!(reply.escalate);
    assert!(reply.suggest_booking);
    assert_eq!(reply.risk_tier, RiskTier::High);
    assert_eq!(reply.response_id, "escalation_high");
    assert_eq!(reply.reason, "keyword match: 'want to die'");

    let turns = orchestrator.store().all_chat_turns().await;
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0].sender, Sender::User);
    assert_eq!(turns[0].text, "I feel hopeless and want to die");
    assert!(turns[0].triage.is_none());

    assert_eq!(turns[1].sender, Sender::Bot);
    assert_eq!(turns[1].text, reply.reply);
    assert!(turns[1].created_at > turns[0].created_at);

    let triage = turns[1].triage.as_ref().unwrap();
    assert!(triage.escalated);
    assert_eq!(triage.assessment.risk, RiskTier::High);
    assert_eq!(triage.pipeline_version, orchestrator.pipeline_version());
}

#[tokio::test]
async fn test_greeting_retrieves_catalog_reply() {
    let orchestrator = memory_orchestrator(lexicon());

    let reply = orchestrator.post_chat_turn(None, "hi there").await.unwrap();
    assert_eq!(reply.response_id, "greet_1");
    assert_eq!(
        reply.reply,
        orchestrator.catalog().response("greet_1").unwrap().reply
    );
    assert!(!reply.escalate);
    assert_eq!(reply.risk_tier, RiskTier::Low);

    let turns = orchestrator.store().all_chat_turns().await;
    assert!(turns.iter().all(|t| t.user_id.is_none()));
}

#[tokio::test]
async fn test_positive_mood_is_low_risk() {
    let orchestrator = memory_orchestrator(lexicon());

    let submission = orchestrator
        .submit_mood("alice", Some("great day"), 9, None)
        .await
        .unwrap();

    assert_eq!(submission.entry.risk_tier, RiskTier::Low);
    assert!(submission.entry.sentiment > 0.0);
    assert!(!submission.entry.sentiment_degraded);
    assert!(!submission.suggest_booking);
    assert_eq!(submission.entry.text.as_deref(), Some("great day"));
    assert_eq!(submission.entry.pipeline_version, orchestrator.pipeline_version());
}

#[tokio::test]
async fn test_anonymous_recommendations_are_catalog_defaults() {
    let orchestrator = memory_orchestrator(lexicon());

    let recs = orchestrator.get_recommendations(None).await.unwrap();
    assert!(recs.context.is_empty());

    let expected: Vec<_> = orchestrator
        .catalog()
        .recommendations()
        .take(12)
        .cloned()
        .collect();
    assert_eq!(recs.items, expected);
}

#[tokio::test]
async fn test_degraded_scoring_still_persists() {
    let backend = Arc::new(FailingScorer::unavailable());
    let orchestrator = memory_orchestrator(GuardedScorer::new(backend.clone()));

    let reply = orchestrator.post_chat_turn(Some("bob"), "hello").await.unwrap();
    assert_eq!(reply.response_id, "greet_1");

    let submission = orchestrator
        .submit_mood("bob", Some("rough week"), 6, None)
        .await
        .unwrap();
    assert!(submission.entry.sentiment_degraded);
    assert_eq!(submission.entry.sentiment, 0.0);
    assert_eq!(submission.entry.risk_tier, RiskTier::Low);

    let turns = orchestrator.store().all_chat_turns().await;
    let triage = turns[1].triage.as_ref().unwrap();
    assert!(triage.assessment.sentiment.degraded);
    assert_eq!(backend.calls(), 2);
}

#[tokio::test]
async fn test_slow_scorer_times_out_to_neutral() {
    let slow = DelayedScorer::with_millis(FixedScorer::new(-0.9), 500);
    let scorer = GuardedScorer::new(Arc::new(slow)).with_timeout(Duration::from_millis(20));
    let orchestrator = memory_orchestrator(scorer);

    let submission = orchestrator
        .submit_mood("carol", Some("so tired"), 5, None)
        .await
        .unwrap();
    assert!(submission.entry.sentiment_degraded);
    assert_eq!(submission.entry.risk_tier, RiskTier::Low);
}

#[tokio::test]
async fn test_validation_failures_store_nothing() {
    let orchestrator = memory_orchestrator(lexicon());

    let err = orchestrator
        .submit_mood("alice", Some("fine"), 42, None)
        .await
        .unwrap_err();
    assert!(matches!(err, OrchestratorError::Validation(_)));

    let err = orchestrator
        .post_chat_turn(Some(&"u".repeat(200)), "hello")
        .await
        .unwrap_err();
    assert!(matches!(err, OrchestratorError::Validation(_)));

    assert!(orchestrator.store().all_mood_entries().await.is_empty());
    assert!(orchestrator.store().all_chat_turns().await.is_empty());
}

#[tokio::test]
async fn test_concurrent_chats_keep_turns_paired() {
    let orchestrator = memory_orchestrator(lexicon());

    let users: Vec<String> = (0..16).map(|i| format!("user-{}", i)).collect();
    let results = join_all(
        users
            .iter()
            .map(|u| orchestrator.post_chat_turn(Some(u), "I'm feeling anxious today")),
    )
    .await;
    assert!(results.iter().all(|r| r.is_ok()));

    for user in &users {
        let history = orchestrator.chat_history(user, None).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].sender, Sender::User);
        assert_eq!(history[1].sender, Sender::Bot);
        assert_eq!(
            history[1].triage.as_ref().unwrap().assessment.risk,
            RiskTier::Medium
        );
    }
}

#[tokio::test]
async fn test_sqlite_mood_analytics_and_recommendations() {
    let scorer = FixedScorer::new(0.0)
        .with_rule("bad", -0.8)
        .with_rule("fine", 0.2);
    let orchestrator = database_orchestrator(GuardedScorer::new(Arc::new(scorer))).await;
    let now = Utc::now();

    let older = orchestrator
        .submit_mood("dana", Some("fine"), 6, Some(now - ChronoDuration::days(20)))
        .await
        .unwrap();
    assert_eq!(older.entry.risk_tier, RiskTier::Low);

    let recent = orchestrator
        .submit_mood("dana", Some("bad day"), 5, Some(now - ChronoDuration::days(2)))
        .await
        .unwrap();
    assert_eq!(recent.entry.risk_tier, RiskTier::High);
    assert_eq!(recent.entry.risk_reason, "compound -0.8");
    assert!(recent.suggest_booking);

    let analytics = orchestrator.mood_analytics("dana").await.unwrap();
    assert!((analytics.avg_sentiment_7d.unwrap() - -0.8).abs() < 1e-9);
    assert!((analytics.avg_sentiment_30d.unwrap() - -0.3).abs() < 1e-9);

    let history = orchestrator.mood_history("dana", None).await.unwrap();
    assert_eq!(history, vec![recent.entry.clone(), older.entry.clone()]);

    let recs = orchestrator.get_recommendations(Some("dana")).await.unwrap();
    assert_eq!(recs.context.latest_risk_tier, Some(RiskTier::High));
    let ids: Vec<&str> = recs.items.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(
        &ids[..8],
        &[
            "breathing",
            "grounding",
            "short_walk",
            "seek_professional",
            "tiny_task",
            "connect",
            "sleep_hygiene",
            "daily_routine",
        ]
    );
    assert_eq!(ids.len(), 12);

    let empty = orchestrator.mood_analytics("nobody").await.unwrap();
    assert_eq!(empty.avg_sentiment_7d, None);
    assert_eq!(empty.avg_sentiment_30d, None);
}

#[tokio::test]
async fn test_sqlite_chat_history_keeps_turn_pairs() {
    let orchestrator = database_orchestrator(lexicon()).await;

    for text in ["hello", "I'm so stressed about work", "thanks"] {
        orchestrator.post_chat_turn(Some("erin"), text).await.unwrap();
    }
    orchestrator.post_chat_turn(None, "hello").await.unwrap();

    let history = orchestrator.chat_history("erin", None).await.unwrap();
    assert_eq!(history.len(), 6);
    assert!(history
        .chunks(2)
        .all(|pair| pair[0].sender == Sender::User && pair[1].sender == Sender::Bot));
    assert!(history
        .chunks(2)
        .all(|pair| pair[0].created_at < pair[1].created_at));
    assert_eq!(history[0].text, "hello");
    assert_eq!(history[4].text, "thanks");

    let last_two = orchestrator.chat_history("erin", Some(2)).await.unwrap();
    assert_eq!(last_two, history[4..].to_vec());

    let stored = orchestrator
        .store()
        .list_chat_turns("erin", 100)
        .await
        .unwrap();
    assert!(stored
        .iter()
        .filter(|t| t.sender == Sender::Bot)
        .all(|t| t.triage.is_some()));
}

#[tokio::test]
async fn test_sqlite_long_message_escalates_and_stores_prefix() {
    let orchestrator = database_orchestrator(lexicon()).await;
    let text = format!("{}I want to die", "blah ".repeat(1100));

    let reply = orchestrator.post_chat_turn(Some("frank"), &text).await.unwrap();
    assert!(reply.escalate);
    assert_eq!(reply.risk_tier, RiskTier::High);

    let history = orchestrator.chat_history("frank", None).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].text.chars().count(), 5000);
    assert!(history[1].triage.as_ref().unwrap().escalated);
}
