//! Main orchestrator that runs the triage pipeline.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use database::validation::{bound_text, validate_mood_value, validate_text, validate_user_id};
use database::Database;
use tracing::{debug, info, warn};
use triage_core::{
    fingerprint, Catalog, ChatTurn, GuardedScorer, MoodEntry, NewChatTurn, NewMoodEntry, RiskTier,
    TriageContext, TurnTriage,
};
use triage_engine::{
    EngineConfig, EscalationPolicy, RecommendationEngine, ResponseRetriever, RiskClassifier,
};

use crate::config::{TriageConfig, DEFAULT_HISTORY_LIMIT};
use crate::error::OrchestratorError;
use crate::results::{ChatReply, MoodAnalytics, MoodSubmission, Recommendations};
use crate::store::TriageStore;

/// Short rolling-average window, in days.
const SHORT_WINDOW_DAYS: i64 = 7;

/// Long rolling-average window, in days.
const LONG_WINDOW_DAYS: i64 = 30;

/// Coordinates scoring, classification, retrieval, escalation and storage.
///
/// Per chat turn:
///
/// ```text
/// persist user turn → score → classify → retrieve → decide → persist bot turn
/// ```
///
/// Per mood submission: validate → score → classify → persist. All writes
/// append; nothing stored is ever re-scored. Every scored row is stamped
/// with [`TriageOrchestrator::pipeline_version`].
pub struct TriageOrchestrator<S: TriageStore> {
    store: S,
    scorer: GuardedScorer,
    catalog: Arc<Catalog>,
    classifier: RiskClassifier,
    retriever: ResponseRetriever,
    policy: EscalationPolicy,
    recommender: RecommendationEngine,
    pipeline_version: String,
    require_mood_text: bool,
    history_limit: usize,
}

impl<S: TriageStore> TriageOrchestrator<S> {
    /// Create an orchestrator from already-validated components.
    pub fn new(store: S, scorer: GuardedScorer, catalog: Arc<Catalog>, engine: &EngineConfig) -> Self {
        let pipeline_version = pipeline_version(&catalog, &scorer, engine);

        info!(
            "Triage pipeline {} (catalog {}, scorer {}, retrieval {})",
            pipeline_version,
            catalog.version(),
            scorer.name(),
            engine.strategy
        );

        Self {
            store,
            classifier: RiskClassifier::new(catalog.clone()),
            retriever: ResponseRetriever::new(catalog.clone(), engine.strategy, engine.min_score),
            policy: EscalationPolicy::new(engine.acceptance_threshold),
            recommender: RecommendationEngine::new(catalog.clone()),
            scorer,
            catalog,
            pipeline_version,
            require_mood_text: false,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    /// Assemble an orchestrator over `store` from configuration.
    ///
    /// The catalog is loaded and validated here, once.
    pub fn from_config(store: S, config: &TriageConfig) -> Result<Self, OrchestratorError> {
        let catalog = match &config.catalog_path {
            Some(path) => Catalog::from_file(path)?,
            None => Catalog::builtin()?,
        };
        let scorer = sentiment::build_scorer(&config.sentiment)?;

        Ok(Self::new(store, scorer, Arc::new(catalog), &config.engine)
            .with_require_mood_text(config.require_mood_text)
            .with_history_limit(config.history_limit))
    }

    /// Reject mood submissions without journal text.
    pub fn with_require_mood_text(mut self, required: bool) -> Self {
        self.require_mood_text = required;
        self
    }

    /// Set the default page size for history listings.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit.max(1);
        self
    }

    /// Fingerprint of catalog, scorer and thresholds stamped on stored rows.
    pub fn pipeline_version(&self) -> &str {
        &self.pipeline_version
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Handle one chat message and return the bot's reply.
    ///
    /// Blank text is not an error: it gets the catalog's clarifying reply.
    /// Long text is triaged in full and stored as a bounded prefix.
    pub async fn post_chat_turn(
        &self,
        user_id: Option<&str>,
        text: &str,
    ) -> Result<ChatReply, OrchestratorError> {
        if let Some(uid) = user_id {
            validate_user_id(uid)?;
        }

        let owner = user_id.map(str::to_string);

        let user_turn = self
            .store
            .create_chat_turn(NewChatTurn::user(owner.clone(), bound_text(text), Utc::now()))
            .await?;
        debug!("Stored user turn {}", user_turn.id);

        let score = self.scorer.score(text).await;
        let assessment = self.classifier.assess(text, score, None);
        let retrieval = self.retriever.retrieve(text);
        let decision = self.policy.decide(&assessment, retrieval);

        info!(
            "Chat turn triaged: risk={} response={} escalate={}",
            assessment.risk, decision.response_id, decision.escalate
        );
        if score.degraded {
            warn!("Chat turn {} scored with degraded sentiment", user_turn.id);
        }

        let triage = TurnTriage {
            assessment,
            response_id: decision.response_id.clone(),
            escalated: decision.escalate,
            pipeline_version: self.pipeline_version.clone(),
        };
        let risk_tier = triage.assessment.risk;

        let bot_at = reply_timestamp(user_turn.created_at);
        self.store
            .create_chat_turn(NewChatTurn::bot(owner, &decision.text, bot_at, triage))
            .await?;

        Ok(ChatReply {
            reply: decision.text,
            escalate: decision.escalate,
            reason: decision.reason,
            response_id: decision.response_id,
            suggest_booking: decision.suggest_booking,
            risk_tier,
        })
    }

    /// Score, classify and store a mood-journal entry.
    ///
    /// `recorded_at` defaults to now. The mood rating is required and must be
    /// within 1..=10; text is optional unless configured otherwise. Text of
    /// any length is classified in full; only a bounded prefix is stored.
    pub async fn submit_mood(
        &self,
        user_id: &str,
        text: Option<&str>,
        mood_value: i64,
        recorded_at: Option<DateTime<Utc>>,
    ) -> Result<MoodSubmission, OrchestratorError> {
        validate_user_id(user_id)?;
        let mood_value = validate_mood_value(mood_value)?;
        validate_text("mood text", text, self.require_mood_text)?;

        let scored_text = text.map(str::trim).unwrap_or("");

        let score = self.scorer.score(scored_text).await;
        let assessment = self.classifier.assess(scored_text, score, Some(mood_value));
        let suggest_booking = assessment.risk == RiskTier::High;

        info!(
            "Mood entry for {} triaged: mood={} risk={} ({})",
            user_id, mood_value, assessment.risk, assessment.explanation
        );

        let entry = self
            .store
            .create_mood_entry(NewMoodEntry {
                user_id: user_id.to_string(),
                text: Some(bound_text(scored_text))
                    .filter(|t| !t.is_empty())
                    .map(str::to_string),
                mood_value,
                recorded_at: recorded_at.unwrap_or_else(Utc::now),
                assessment,
                pipeline_version: self.pipeline_version.clone(),
            })
            .await?;

        Ok(MoodSubmission {
            entry,
            suggest_booking,
        })
    }

    /// Recommendations for a caller; anonymous callers get the defaults.
    pub async fn get_recommendations(
        &self,
        user_id: Option<&str>,
    ) -> Result<Recommendations, OrchestratorError> {
        let context = match user_id {
            Some(uid) => self.build_context(uid).await?,
            None => TriageContext::empty(),
        };

        let items = self.recommender.recommend(&context);
        debug!("Recommendations chosen for context {:?}", context);

        Ok(Recommendations { context, items })
    }

    /// 7- and 30-day sentiment averages for a user.
    pub async fn mood_analytics(&self, user_id: &str) -> Result<MoodAnalytics, OrchestratorError> {
        let now = Utc::now();
        Ok(MoodAnalytics {
            avg_sentiment_7d: self
                .store
                .query_rolling_average(user_id, SHORT_WINDOW_DAYS, now)
                .await?,
            avg_sentiment_30d: self
                .store
                .query_rolling_average(user_id, LONG_WINDOW_DAYS, now)
                .await?,
        })
    }

    /// A user's most recent chat turns, in the order they were posted.
    pub async fn chat_history(
        &self,
        user_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<ChatTurn>, OrchestratorError> {
        self.store
            .list_chat_turns(user_id, limit.unwrap_or(self.history_limit))
            .await
    }

    /// A user's mood entries, newest first.
    pub async fn mood_history(
        &self,
        user_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<MoodEntry>, OrchestratorError> {
        self.store
            .query_mood_entries(user_id, None, limit.unwrap_or(self.history_limit))
            .await
    }

    async fn build_context(&self, user_id: &str) -> Result<TriageContext, OrchestratorError> {
        let latest = self
            .store
            .query_mood_entries(user_id, None, 1)
            .await?
            .into_iter()
            .next();
        let analytics = self.mood_analytics(user_id).await?;

        Ok(TriageContext {
            latest_sentiment: latest.as_ref().map(|e| e.sentiment),
            latest_risk_tier: latest.as_ref().map(|e| e.risk_tier),
            avg_sentiment_7d: analytics.avg_sentiment_7d,
            avg_sentiment_30d: analytics.avg_sentiment_30d,
        })
    }
}

impl TriageOrchestrator<Database> {
    /// Create a SQLite-backed orchestrator from environment variables.
    ///
    /// See [`TriageConfig::from_env`] for the variables read.
    pub async fn from_env() -> Result<Self, OrchestratorError> {
        let config = TriageConfig::from_env()?;
        let database = Database::connect(&config.database_url).await?;
        database.migrate().await?;
        Self::from_config(database, &config)
    }
}

/// Bot turns are stamped strictly after the user turn they answer.
fn reply_timestamp(user_at: DateTime<Utc>) -> DateTime<Utc> {
    let earliest = user_at + Duration::milliseconds(1);
    Utc::now().max(earliest)
}

fn pipeline_version(catalog: &Catalog, scorer: &GuardedScorer, engine: &EngineConfig) -> String {
    let input = format!(
        "catalog={}:{};scorer={};max_chars={};{}",
        catalog.version(),
        catalog.fingerprint(),
        scorer.name(),
        scorer.max_chars(),
        engine.describe()
    );
    fingerprint(&input).chars().take(16).collect()
}
