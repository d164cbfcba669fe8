//! Static catalogs: canned responses, recommendation items and risk phrases.
//!
//! A [`Catalog`] is validated and indexed once at startup and is immutable
//! afterwards; every triage component reads it through an `Arc<Catalog>`.

use std::collections::HashSet;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::CatalogError;
use crate::fingerprint::fingerprint;

/// A canned reply and the phrases that trigger it.
///
/// The single candidate with no triggers is the catalog fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseCandidate {
    pub id: String,
    #[serde(default)]
    pub triggers: Vec<String>,
    pub reply: String,
}

impl ResponseCandidate {
    pub fn is_fallback(&self) -> bool {
        self.triggers.is_empty()
    }
}

/// A coping resource shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationItem {
    pub id: String,
    pub title: String,
    pub body: String,
}

/// Risk phrase lists, matched as case-insensitive substrings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseLists {
    /// Self-harm / suicide ideation.
    pub high: Vec<String>,
    /// Hopelessness / panic / depression.
    pub medium: Vec<String>,
}

/// Item ids promoted by each recommendation tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationTiers {
    /// Immediate coping and professional referral.
    pub high: Vec<String>,
    /// Routine, sleep and connection.
    pub moderate_low: Vec<String>,
    /// Grounding, breathing and journaling.
    pub moderate: Vec<String>,
}

/// On-disk catalog schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSource {
    pub version: String,
    pub responses: Vec<ResponseCandidate>,
    pub recommendations: Vec<RecommendationItem>,
    pub phrases: PhraseLists,
    pub tiers: RecommendationTiers,
}

/// Validated, indexed, immutable catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    version: String,
    fingerprint: String,
    responses: IndexMap<String, ResponseCandidate>,
    fallback_index: usize,
    recommendations: IndexMap<String, RecommendationItem>,
    phrases: PhraseLists,
    tiers: RecommendationTiers,
}

impl Catalog {
    /// Validate and index a catalog source.
    ///
    /// Trigger phrases and risk phrases are lower-cased; duplicate triggers
    /// inside one candidate are dropped keeping the first occurrence.
    pub fn from_source(source: CatalogSource) -> Result<Self, CatalogError> {
        let fingerprint = fingerprint(&serde_json::to_string(&source)?);

        if source.version.trim().is_empty() {
            return Err(CatalogError::EmptySection("version"));
        }
        if source.recommendations.is_empty() {
            return Err(CatalogError::EmptySection("recommendations"));
        }

        let mut responses: IndexMap<String, ResponseCandidate> =
            IndexMap::with_capacity(source.responses.len());
        let mut fallback_index = None;
        for mut candidate in source.responses {
            candidate.triggers = normalize_phrases(candidate.triggers);

            if candidate.is_fallback() {
                if let Some(existing) = fallback_index {
                    let first = responses
                        .get_index(existing)
                        .map(|(id, _)| id.clone())
                        .unwrap_or_default();
                    return Err(CatalogError::MultipleFallbacks {
                        first,
                        second: candidate.id,
                    });
                }
                fallback_index = Some(responses.len());
            }

            if responses.contains_key(&candidate.id) {
                return Err(CatalogError::DuplicateId {
                    kind: "response",
                    id: candidate.id,
                });
            }
            responses.insert(candidate.id.clone(), candidate);
        }
        let fallback_index = fallback_index.ok_or(CatalogError::MissingFallback)?;

        let mut recommendations: IndexMap<String, RecommendationItem> =
            IndexMap::with_capacity(source.recommendations.len());
        for item in source.recommendations {
            if recommendations.contains_key(&item.id) {
                return Err(CatalogError::DuplicateId {
                    kind: "recommendation",
                    id: item.id,
                });
            }
            recommendations.insert(item.id.clone(), item);
        }

        let phrases = PhraseLists {
            high: normalize_phrases(source.phrases.high),
            medium: normalize_phrases(source.phrases.medium),
        };
        if phrases.high.is_empty() {
            return Err(CatalogError::EmptySection("high risk phrases"));
        }
        if phrases.medium.is_empty() {
            return Err(CatalogError::EmptySection("medium risk phrases"));
        }

        let tiers = source.tiers;
        for (tier, ids) in [
            ("high", &tiers.high),
            ("moderate_low", &tiers.moderate_low),
            ("moderate", &tiers.moderate),
        ] {
            if let Some(unknown) = ids.iter().find(|id| !recommendations.contains_key(*id)) {
                return Err(CatalogError::UnknownTierItem {
                    tier,
                    id: unknown.clone(),
                });
            }
        }

        Ok(Self {
            version: source.version,
            fingerprint,
            responses,
            fallback_index,
            recommendations,
            phrases,
            tiers,
        })
    }

    /// Parse and validate a catalog from JSON text.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let source: CatalogSource = serde_json::from_str(json)?;
        Self::from_source(source)
    }

    /// Load and validate a catalog from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&json)?;
        info!(
            "Loaded catalog {} from {} ({} responses, {} recommendations)",
            catalog.version,
            path.display(),
            catalog.responses.len(),
            catalog.recommendations.len()
        );
        Ok(catalog)
    }

    /// The catalog shipped with the engine.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_source(builtin_source())
    }

    /// Curated catalog version label.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// SHA-256 over the full source; changes whenever any entry changes.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Response candidates in catalog order (fallback included).
    pub fn responses(&self) -> impl Iterator<Item = &ResponseCandidate> {
        self.responses.values()
    }

    pub fn response_count(&self) -> usize {
        self.responses.len()
    }

    pub fn response(&self, id: &str) -> Option<&ResponseCandidate> {
        self.responses.get(id)
    }

    /// The candidate with an empty trigger set.
    pub fn fallback(&self) -> &ResponseCandidate {
        &self.responses[self.fallback_index]
    }

    /// Recommendation items in catalog order.
    pub fn recommendations(&self) -> impl Iterator<Item = &RecommendationItem> {
        self.recommendations.values()
    }

    pub fn recommendation_count(&self) -> usize {
        self.recommendations.len()
    }

    pub fn recommendation(&self, id: &str) -> Option<&RecommendationItem> {
        self.recommendations.get(id)
    }

    pub fn phrases(&self) -> &PhraseLists {
        &self.phrases
    }

    pub fn tiers(&self) -> &RecommendationTiers {
        &self.tiers
    }
}

/// Lower-case, trim, drop blanks and drop repeats (first occurrence wins).
fn normalize_phrases(phrases: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    phrases
        .into_iter()
        .map(|p| p.trim().to_lowercase())
        .filter(|p| !p.is_empty())
        .filter(|p| seen.insert(p.clone()))
        .collect()
}

fn response(id: &str, triggers: &[&str], reply: &str) -> ResponseCandidate {
    ResponseCandidate {
        id: id.to_string(),
        triggers: triggers.iter().map(|t| t.to_string()).collect(),
        reply: reply.to_string(),
    }
}

fn item(id: &str, title: &str, body: &str) -> RecommendationItem {
    RecommendationItem {
        id: id.to_string(),
        title: title.to_string(),
        body: body.to_string(),
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn builtin_source() -> CatalogSource {
    CatalogSource {
        version: "2024.1".to_string(),
        responses: vec![
            response(
                "greet_1",
                &["hello", "hi", "hey", "hi there", "good morning", "good afternoon"],
                "Hi, I'm here with you. Would you like to tell me what's on your mind right now?",
            ),
            response(
                "greet_2",
                &["how are you", "how r u", "how are u"],
                "I'm a helper bot, I don't get tired. I'm here to listen. What are you feeling right now?",
            ),
            response(
                "sad_1",
                &["sad", "unhappy", "down", "blue"],
                "I'm sorry you're feeling sad. If you'd like, describe one thing that happened today that might have triggered this.",
            ),
            response(
                "depress_1",
                &["depress", "depressed", "hopeless"],
                "That sounds really heavy. Try to breathe with me: inhale for 4, hold 4, exhale 6. Do you feel a little calmer?",
            ),
            response(
                "anxiety_1",
                &["anxious", "anxiety", "panic", "panic attack", "nervous"],
                "When anxiety spikes, grounding helps: name 5 things you see, 4 you can touch, 3 you can hear. Want to try it now?",
            ),
            response(
                "stress_1",
                &["stress", "stressed", "overwhelmed"],
                "When everything feels too much, breaking tasks into tiny steps helps. What's one small step you could take right now?",
            ),
            response(
                "sleep_1",
                &["sleep", "insomnia", "can't sleep", "cant sleep", "awake at night"],
                "Sleep problems are tough. Try a wind-down: no screens 30 minutes before bed, dim lights, and a short breathing practice.",
            ),
            response(
                "angry_1",
                &["angry", "mad", "furious"],
                "Anger is valid. A quick technique: press your feet to the floor and take slow breaths for one minute. Would that help right now?",
            ),
            response(
                "suicide_check",
                &["suicide", "kill myself", "end my life", "want to die"],
                "I'm really sorry you're feeling this way. I'm not able to help with emergencies. If you're in immediate danger, please call local emergency services or a suicide hotline. Would you like me to show nearby professional help now?",
            ),
            response(
                "relationship_1",
                &["breakup", "relationship", "partner", "boyfriend", "girlfriend", "wife", "husband"],
                "Relationship issues can be painful. Would you like some ideas for coping or for communicating with the other person?",
            ),
            response(
                "work_1",
                &["work", "job", "boss", "office", "work stress"],
                "Work stress can pile up. Can you identify one small boundary or task you could change to make today easier?",
            ),
            response(
                "school_1",
                &["exam", "study", "school", "college", "university"],
                "School pressure is real. Try short focused study sessions with brief breaks (25 minutes on, 5 off). Would you like a quick study plan?",
            ),
            response(
                "panic_help",
                &["panic attack", "panic"],
                "If you are having a panic attack, find a safe place to sit, focus on slowing your breath, and try 4-4-4 breathing. If it persists, call emergency services.",
            ),
            response(
                "coping_tips",
                &["tips", "coping", "help me cope", "coping strategies"],
                "Here are quick coping strategies: 1) breathing, 2) grounding, 3) a short walk, 4) calling a friend. Which would you like to try?",
            ),
            response(
                "gratitude",
                &["grateful", "gratitude", "thankful"],
                "Noticing small positives can help. Try naming three small things you're grateful for today.",
            ),
            response(
                "journaling",
                &["journal", "journalling", "write"],
                "Writing can help process feelings. Try describing the event, how it made you feel, and one small next step.",
            ),
            response(
                "social_1",
                &["lonely", "alone"],
                "Feeling lonely is hard. Would you like some ways to reach out that feel manageable, like a short message or a group activity?",
            ),
            response(
                "exercise_1",
                &["exercise", "workout", "gym", "run"],
                "Physical activity is a great mood booster. Even a 10-minute walk can help reset your mind.",
            ),
            response(
                "food_1",
                &["eat", "food", "hungry", "appetite"],
                "Nutrition affects mood. Try a small balanced snack with some protein and carbs and see if it helps.",
            ),
            response(
                "panic_prevention",
                &["help me calm", "calm down", "calm"],
                "For immediate calm: 6 slow breaths, hold 5 seconds, then exhale for 7. Repeat 4 times and tell me how you feel.",
            ),
            response(
                "ask_more",
                &["what should i do", "advice", "what do i do", "help"],
                "I can offer ideas, small steps, or help you find a therapist. Would you prefer coping steps, a breathing exercise, or help with booking a professional?",
            ),
            response(
                "validation",
                &["feels unfair", "not fair", "hurt", "pain"],
                "It makes sense that you'd feel hurt. Your reaction is valid. Do you want to explore how to respond, or how to take care of yourself right now?",
            ),
            response(
                "mindfulness",
                &["meditate", "mindfulness", "mindful"],
                "A short mindfulness exercise: focus on your breath for one minute. If thoughts come, gently return attention to the breath.",
            ),
            response(
                "mental_health_help",
                &["therapist", "counselor", "talk to a professional", "need help"],
                "If you want professional help, I can show therapists and let you book. Do you want to see options now?",
            ),
            response(
                "fallback_positive",
                &[],
                "I hear you. Can you say a bit more about how that made you feel? I'm here to listen.",
            ),
        ],
        recommendations: vec![
            item("breathing", "4-4-6 Breathing", "Breathe in for 4 seconds, hold for 4, exhale for 6. Do 5 cycles and notice how your body responds."),
            item("grounding", "Grounding Exercise", "Name 5 things you can see, 4 you can touch, 3 you can hear, 2 you can smell and 1 you can taste. This anchors you in the present."),
            item("short_walk", "Take a Short Walk", "A 10 to 15 minute walk, preferably outside, often helps clear the mind and reduce stress. Try it with mindful focus."),
            item("tiny_task", "Break Tasks into Tiny Steps", "If tasks feel overwhelming, pick one tiny next step and do only that for 10 minutes. Small wins add up."),
            item("connect", "Reach Out to Someone", "Send a short message to someone you trust or schedule a 10-minute call. Social contact can lighten heavy feelings."),
            item("sleep_hygiene", "Improve Sleep Routine", "Wind down 30 minutes before bed: no screens, dim lights, calming music or reading, and a consistent bedtime."),
            item("gratitude", "Gratitude Listing", "Write down three specific things you are grateful for today. Even small items can shift focus over time."),
            item("progressive", "Progressive Muscle Relaxation", "Tense and release major muscle groups from toes to head, holding tension for 5 seconds before releasing."),
            item("grounding_breath", "Box Breathing", "Inhale 4 seconds, hold 4, exhale 4, hold 4. Repeat for 3 to 5 minutes."),
            item("mindful", "Short Mindfulness", "Sit quietly for 3 to 5 minutes and focus on the breath or body sensations. Notice thoughts without judging them."),
            item("healthy_snack", "Eat a Balanced Snack", "Have a small snack with protein (eggs, nuts) and carbs (fruit, toast) to stabilize energy and mood."),
            item("limit_caffeine", "Limit Caffeine and Alcohol", "Reducing caffeine or alcohol, especially around sleep, can help mood and anxiety levels."),
            item("seek_professional", "Consider Professional Support", "If feelings persist or interfere with daily life, consider booking a therapist. We can help you find options."),
            item("journaling", "Try Structured Journaling", "Write what happened, what you felt, and one small next step. Three sentences for each keeps it manageable."),
            item("daily_routine", "Create a Small Daily Routine", "Aim for consistency: a short morning routine (stretch, water, planning) and an evening wind-down to stabilize mood."),
        ],
        phrases: PhraseLists {
            high: strings(&[
                "suicide",
                "kill myself",
                "end my life",
                "i want to die",
                "i'll kill myself",
                "i cant go on",
                "i can't go on",
                "hurt myself",
                "want to die",
                "end it all",
                "kill me",
            ]),
            medium: strings(&[
                "worthless",
                "hopeless",
                "no future",
                "give up",
                "cant cope",
                "can't cope",
                "depressed",
                "depression",
                "panic attack",
                "anxious",
                "anxiety",
            ]),
        },
        tiers: RecommendationTiers {
            high: strings(&["breathing", "seek_professional", "grounding", "short_walk"]),
            moderate_low: strings(&["daily_routine", "sleep_hygiene", "tiny_task", "connect"]),
            moderate: strings(&["grounding", "breathing", "short_walk", "journaling"]),
        },
    }
}
