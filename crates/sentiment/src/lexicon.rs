//! Lexicon-based sentiment scoring.
//!
//! Word valences use the familiar -4..4 scale. A negation within the three
//! preceding tokens flips and dampens a word; an intensifier directly before
//! it pushes the valence further from zero. The summed valence is squashed
//! into `[-1, 1]` with `x / sqrt(x² + ALPHA)`.

use std::collections::HashMap;
use std::sync::LazyLock;

use async_trait::async_trait;
use triage_core::{ScorerError, SentimentScorer};

/// Normalization constant for the compound score.
const ALPHA: f64 = 15.0;

/// Multiplier applied to a negated word.
const NEGATION_SCALAR: f64 = -0.74;

/// Valence added by an intensifier ("very", "so", ...).
const BOOSTER_INCREMENT: f64 = 0.293;

/// How many preceding tokens a negation reaches.
const NEGATION_WINDOW: usize = 3;

static DEFAULT_LEXICON: LazyLock<HashMap<&'static str, f64>> = LazyLock::new(|| {
    [
        // positive
        ("good", 1.9),
        ("great", 3.1),
        ("amazing", 2.8),
        ("awesome", 3.1),
        ("wonderful", 2.7),
        ("fantastic", 2.6),
        ("excellent", 2.7),
        ("happy", 2.7),
        ("glad", 2.0),
        ("joy", 2.8),
        ("love", 3.2),
        ("loved", 2.9),
        ("nice", 1.8),
        ("calm", 1.3),
        ("relaxed", 2.2),
        ("peaceful", 2.2),
        ("hopeful", 2.3),
        ("grateful", 2.0),
        ("thankful", 2.0),
        ("proud", 2.1),
        ("better", 1.9),
        ("fine", 0.8),
        ("okay", 0.9),
        ("ok", 0.9),
        ("excited", 2.2),
        ("fun", 2.3),
        ("safe", 1.9),
        ("rested", 1.6),
        ("energized", 2.0),
        ("productive", 1.8),
        ("enjoyed", 2.3),
        ("smile", 1.5),
        ("laugh", 2.6),
        ("supported", 1.8),
        ("content", 1.6),
        // negative
        ("bad", -2.5),
        ("terrible", -2.1),
        ("awful", -2.0),
        ("horrible", -2.5),
        ("sad", -2.1),
        ("unhappy", -1.8),
        ("miserable", -2.2),
        ("depressed", -2.3),
        ("depressing", -1.6),
        ("hopeless", -2.0),
        ("worthless", -1.9),
        ("lonely", -1.5),
        ("alone", -1.0),
        ("angry", -2.3),
        ("furious", -2.5),
        ("mad", -2.2),
        ("upset", -1.6),
        ("anxious", -1.0),
        ("anxiety", -0.7),
        ("worried", -1.2),
        ("nervous", -1.1),
        ("scared", -1.9),
        ("afraid", -2.0),
        ("panic", -2.3),
        ("stressed", -1.4),
        ("stress", -1.8),
        ("overwhelmed", -1.5),
        ("tired", -1.0),
        ("exhausted", -1.5),
        ("hurt", -2.4),
        ("pain", -2.3),
        ("cry", -2.1),
        ("crying", -2.1),
        ("hate", -2.7),
        ("hated", -3.2),
        ("broken", -1.9),
        ("empty", -1.2),
        ("numb", -1.1),
        ("worst", -3.1),
        ("die", -2.9),
        ("dead", -3.3),
        ("suicide", -3.5),
        ("kill", -3.7),
        ("failure", -2.2),
        ("guilty", -1.8),
        ("ashamed", -2.1),
        ("struggling", -1.5),
    ]
    .into_iter()
    .collect()
});

static NEGATIONS: &[&str] = &[
    "not", "no", "never", "none", "nobody", "nothing", "neither", "nor", "without", "cannot",
    "cant", "can't", "dont", "don't", "doesnt", "doesn't", "didnt", "didn't", "isnt", "isn't",
    "wasnt", "wasn't", "aint", "ain't", "wont", "won't", "hardly",
];

static BOOSTERS: &[&str] = &[
    "very", "really", "so", "extremely", "incredibly", "totally", "absolutely", "super", "truly",
    "completely", "deeply", "too",
];

/// Deterministic lexicon scorer.
#[derive(Debug, Clone)]
pub struct LexiconScorer {
    lexicon: HashMap<String, f64>,
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconScorer {
    /// Create a scorer over the built-in lexicon.
    pub fn new() -> Self {
        Self {
            lexicon: DEFAULT_LEXICON
                .iter()
                .map(|(word, valence)| (word.to_string(), *valence))
                .collect(),
        }
    }

    /// Create a scorer with additional or overriding word valences.
    pub fn with_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut scorer = Self::new();
        for (word, valence) in entries {
            scorer.lexicon.insert(word.into().to_lowercase(), valence);
        }
        scorer
    }

    /// Compute the compound score synchronously.
    pub fn compound(&self, text: &str) -> f64 {
        let tokens = tokenize(text);
        let mut total = 0.0;

        for (i, token) in tokens.iter().enumerate() {
            let Some(&base) = self.lexicon.get(token.as_str()) else {
                continue;
            };

            let mut valence = base;

            if i > 0 && is_booster(&tokens[i - 1]) {
                valence += BOOSTER_INCREMENT * base.signum();
            }

            let window_start = i.saturating_sub(NEGATION_WINDOW);
            if tokens[window_start..i].iter().any(|t| is_negation(t)) {
                valence *= NEGATION_SCALAR;
            }

            total += valence;
        }

        normalize(total)
    }
}

#[async_trait]
impl SentimentScorer for LexiconScorer {
    async fn polarity(&self, text: &str) -> Result<f64, ScorerError> {
        Ok(self.compound(text))
    }

    fn name(&self) -> &str {
        "lexicon-v1"
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|t| t.trim_matches('\''))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn is_negation(token: &str) -> bool {
    NEGATIONS.contains(&token) || token.ends_with("n't")
}

fn is_booster(token: &str) -> bool {
    BOOSTERS.contains(&token)
}

fn normalize(total: f64) -> f64 {
    if total == 0.0 {
        return 0.0;
    }
    (total / (total * total + ALPHA).sqrt()).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_text() {
        let scorer = LexiconScorer::new();
        let score = scorer.compound("great day");
        assert!(score > 0.5, "expected strongly positive, got {score}");
    }

    #[test]
    fn test_negative_text() {
        let scorer = LexiconScorer::new();
        assert!(scorer.compound("I feel sad and hopeless") < -0.6);
        assert!(scorer.compound("so tired") < 0.0);
    }

    #[test]
    fn test_unknown_words_are_neutral() {
        let scorer = LexiconScorer::new();
        assert_eq!(scorer.compound("the quarterly report is on the table"), 0.0);
        assert_eq!(scorer.compound(""), 0.0);
    }

    #[test]
    fn test_negation_flips() {
        let scorer = LexiconScorer::new();
        assert!(scorer.compound("I am happy") > 0.0);
        assert!(scorer.compound("I am not happy") < 0.0);
        assert!(scorer.compound("I don't feel good") < 0.0);
    }

    #[test]
    fn test_negation_window_is_bounded() {
        let scorer = LexiconScorer::new();
        // "not" is four tokens before "happy"
        assert!(scorer.compound("not that it matters much happy") > 0.0);
    }

    #[test]
    fn test_booster_intensifies() {
        let scorer = LexiconScorer::new();
        assert!(scorer.compound("very happy") > scorer.compound("happy"));
        assert!(scorer.compound("really sad") < scorer.compound("sad"));
    }

    #[test]
    fn test_score_bounded() {
        let scorer = LexiconScorer::new();
        let text = "great ".repeat(200);
        let score = scorer.compound(&text);
        assert!(score <= 1.0 && score > 0.99);
    }

    #[test]
    fn test_custom_entries() {
        let scorer = LexiconScorer::with_entries([("Meh", -0.5), ("great", -1.0)]);
        assert!(scorer.compound("meh") < 0.0);
        assert!(scorer.compound("great") < 0.0);
    }

    #[test]
    fn test_deterministic() {
        let scorer = LexiconScorer::new();
        let text = "Work was stressful but dinner with friends was wonderful";
        assert_eq!(scorer.compound(text), scorer.compound(text));
    }

    #[tokio::test]
    async fn test_polarity_matches_compound() {
        let scorer = LexiconScorer::new();
        let value = scorer.polarity("amazing").await.unwrap();
        assert_eq!(value, scorer.compound("amazing"));
        assert_eq!(scorer.name(), "lexicon-v1");
    }
}
