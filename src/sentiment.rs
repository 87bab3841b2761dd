//! Sentiment classification of article text.
//!
//! Scoring is delegated to a lexicon library behind the [`SentimentScorer`]
//! trait. A scorer yields two things at once: a compound polarity score in
//! `[-1, 1]`, and the positive/neutral/negative proportions of the text.
//! The classifier exposes both (polarity from the compound score,
//! percentages from the proportions) but derives the label from the
//! proportions alone:
//!
//! - **Positive** if `positive_pct` is strictly the greatest of the three
//! - **Negative** if `negative_pct` is strictly the greatest of the three
//! - **Neutral** otherwise, ties included
//!
//! This is the only labeling rule in the crate; the aggregator counts the
//! labels produced here.

use crate::models::{Article, SentimentLabel, SentimentResult};
use tracing::{debug, instrument};
use vader_sentiment::SentimentIntensityAnalyzer;

/// Raw scores returned by a sentiment lexicon.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LexiconScores {
    /// Normalized overall polarity in `[-1, 1]`.
    pub compound: f64,
    /// Proportion of positive text, `0..=1`.
    pub pos: f64,
    /// Proportion of neutral text, `0..=1`.
    pub neu: f64,
    /// Proportion of negative text, `0..=1`.
    pub neg: f64,
}

/// A sentiment lexicon that can score arbitrary text.
///
/// Implementations must not panic on any input, including the empty string.
pub trait SentimentScorer {
    fn polarity_scores(&self, text: &str) -> LexiconScores;
}

/// [`SentimentScorer`] backed by the VADER lexicon.
///
/// The lexicon tables are process-wide statics inside `vader_sentiment`;
/// building an analyzer only borrows them.
#[derive(Debug, Default, Clone, Copy)]
pub struct VaderScorer;

impl VaderScorer {
    pub fn new() -> Self {
        Self
    }
}

impl SentimentScorer for VaderScorer {
    fn polarity_scores(&self, text: &str) -> LexiconScores {
        if text.trim().is_empty() {
            return LexiconScores::default();
        }
        let analyzer = SentimentIntensityAnalyzer::new();
        let scores = analyzer.polarity_scores(text);
        let get = |key: &str| scores.get(key).copied().unwrap_or(0.0);
        LexiconScores {
            compound: get("compound"),
            pos: get("pos"),
            neu: get("neu"),
            neg: get("neg"),
        }
    }
}

/// Turns article text into a [`SentimentResult`] using an injected scorer.
#[derive(Debug)]
pub struct SentimentClassifier<S> {
    scorer: S,
}

impl<S: SentimentScorer> SentimentClassifier<S> {
    pub fn new(scorer: S) -> Self {
        Self { scorer }
    }

    /// Classify an article from its title and description.
    #[instrument(level = "debug", skip_all, fields(title = %article.title))]
    pub fn classify(&self, article: &Article) -> SentimentResult {
        let result = self.classify_text(&article.sentiment_text());
        debug!(label = %result.label, polarity = result.polarity, "Classified article");
        result
    }

    /// Classify arbitrary text. Never fails.
    pub fn classify_text(&self, text: &str) -> SentimentResult {
        let scores = self.scorer.polarity_scores(text);
        let positive_pct = to_percent(scores.pos);
        let neutral_pct = to_percent(scores.neu);
        let negative_pct = to_percent(scores.neg);

        SentimentResult {
            label: label_for(positive_pct, neutral_pct, negative_pct),
            positive_pct,
            neutral_pct,
            negative_pct,
            polarity: to_percent(scores.compound.clamp(-1.0, 1.0)),
        }
    }
}

/// Scale a `0..=1` (or `-1..=1`) score to a percentage rounded to one decimal.
pub fn to_percent(score: f64) -> f64 {
    round1(score * 100.0)
}

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Strict greatest-of-three label assignment; every tie resolves to Neutral.
pub fn label_for(positive_pct: f64, neutral_pct: f64, negative_pct: f64) -> SentimentLabel {
    if positive_pct > neutral_pct && positive_pct > negative_pct {
        SentimentLabel::Positive
    } else if negative_pct > positive_pct && negative_pct > neutral_pct {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    }
}
