//! Data models for news articles, sentiment results, and the dashboard snapshot.
//!
//! This module defines the core data structures used throughout the application:
//! - [`RawArticle`]: One article record exactly as the news provider returns it
//! - [`Article`]: The canonical, default-filled article record
//! - [`SentimentLabel`] and [`SentimentResult`]: Per-article sentiment output
//! - [`Dashboard`]: Everything the display layer needs for one session
//!
//! Provider records use camelCase field names, hence the serde renames on
//! the raw types.

use crate::aggregate::{CorpusStats, PublisherStats};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Publisher name used when the provider omits `source.name`.
pub const UNKNOWN_SOURCE: &str = "Unknown";

/// Top-level provider response (`/v2/top-headlines` and `/v2/everything`).
///
/// Articles are kept as raw JSON values so that a single malformed record
/// can be skipped without discarding the whole response.
#[derive(Debug, Default, Deserialize)]
pub struct ProviderResponse {
    /// `"ok"` on success, `"error"` otherwise.
    #[serde(default)]
    pub status: Option<String>,
    /// Machine-readable error code, present when `status == "error"`.
    #[serde(default)]
    pub code: Option<String>,
    /// Human-readable error message, present when `status == "error"`.
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, rename = "totalResults")]
    pub total_results: Option<u64>,
    #[serde(default)]
    pub articles: Option<Vec<serde_json::Value>>,
}

/// The `source` object nested inside a provider article.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct RawSource {
    #[serde(default)]
    pub name: Option<String>,
}

/// A provider article before normalization. Every field may be absent or `null`.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawArticle {
    #[serde(default)]
    pub source: Option<RawSource>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub url_to_image: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

/// A canonical news article.
///
/// Produced by [`crate::normalize::normalize`]; never mutated afterwards.
/// String fields are always present (possibly empty), so downstream text
/// processing never deals with absent values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Article {
    pub title: String,
    pub description: String,
    /// Richer body text when the provider has it (often truncated by NewsAPI).
    pub content: String,
    pub url: String,
    pub image_url: Option<String>,
    pub source_name: String,
    /// Publication timestamp as sent by the provider; treated as opaque.
    pub published_at: Option<String>,
}

impl Article {
    /// Stable identity used for bookmark deduplication.
    pub fn identity(&self) -> (&str, &str) {
        (&self.title, &self.url)
    }

    /// Text fed to the sentiment classifier: title and description joined
    /// by a single space. The separator is always present.
    pub fn sentiment_text(&self) -> String {
        format!("{} {}", self.title, self.description)
    }

    /// Text fed to the summarizer: `content` when available, otherwise
    /// `description`.
    pub fn summary_source(&self) -> &str {
        if !self.content.is_empty() {
            &self.content
        } else {
            &self.description
        }
    }
}

/// Three-way sentiment label.
///
/// The declaration order (`Positive`, `Neutral`, `Negative`) is the display
/// order used by every report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    pub const ALL: [SentimentLabel; 3] = [
        SentimentLabel::Positive,
        SentimentLabel::Neutral,
        SentimentLabel::Negative,
    ];

    /// Marker shown next to the label in the Markdown report.
    pub fn marker(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "🟢",
            SentimentLabel::Neutral => "⚪",
            SentimentLabel::Negative => "🔴",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Neutral => "Neutral",
            SentimentLabel::Negative => "Negative",
        };
        f.write_str(name)
    }
}

/// Sentiment of one article. Computed fresh on every request.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct SentimentResult {
    pub label: SentimentLabel,
    /// Share of positive tokens, 0..=100, one decimal.
    pub positive_pct: f64,
    /// Share of neutral tokens, 0..=100, one decimal.
    pub neutral_pct: f64,
    /// Share of negative tokens, 0..=100, one decimal.
    pub negative_pct: f64,
    /// Compound lexicon score scaled to -100..=100, one decimal.
    pub polarity: f64,
}

/// One article as shown on the dashboard.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArticleReport {
    /// Zero-based position in the fetch, used by `--summarize` and `--bookmark`.
    pub index: usize,
    pub article: Article,
    pub sentiment: SentimentResult,
    /// Present only when the user asked for this article's summary.
    pub summary: Option<String>,
    /// Path of the spoken summary, when audio output is enabled.
    pub audio_path: Option<String>,
}

/// Percentage of the corpus carrying one label.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct LabelShare {
    pub label: SentimentLabel,
    pub percent: f64,
}

/// A weighted headline term for the word cloud.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TermCount {
    pub term: String,
    pub count: usize,
}

/// Snapshot of one dashboard session, handed to the Markdown and JSON writers.
#[derive(Debug, Deserialize, Serialize)]
pub struct Dashboard {
    /// Generation date in `YYYY-MM-DD` format.
    pub local_date: String,
    /// Generation time in `HH:MM:SS` format.
    pub local_time: String,
    pub session_id: String,
    /// Human-readable description of the query, e.g. `top headlines · technology`.
    pub query: String,
    pub articles: Vec<ArticleReport>,
    pub sentiment: CorpusStats,
    /// `None` when no article was fetched.
    pub sentiment_shares: Option<Vec<LabelShare>>,
    pub publishers: PublisherStats,
    pub headline_terms: Vec<TermCount>,
    pub bookmarks: Vec<Article>,
}
