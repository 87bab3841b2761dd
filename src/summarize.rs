//! The summarization gate.
//!
//! Summaries are a best-effort extra: text at or under the length threshold
//! gets a fixed placeholder without touching the model, and any failure of
//! the model (error, timeout, empty answer) yields the original text. A
//! summarizer built with [`Summarizer::unavailable`] has no model at all and
//! always takes that fallback. The caller always gets a string back.

use crate::api::AskAsync;
use crate::models::Article;
use crate::utils::truncate_for_log;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

/// Returned for text too short to be worth summarizing.
pub const NO_SUMMARY: &str = "No summary available.";

/// Length bounds requested from the model, in words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryBounds {
    pub max_length: usize,
    pub min_length: usize,
}

impl Default for SummaryBounds {
    fn default() -> Self {
        Self {
            max_length: 130,
            min_length: 30,
        }
    }
}

/// Gatekeeper in front of the summarization model.
#[derive(Debug)]
pub struct Summarizer<S> {
    /// `None` when the model could not be set up for this run.
    service: Option<S>,
    /// Texts with at most this many characters are not summarized.
    threshold: usize,
    bounds: SummaryBounds,
    inference_timeout: Duration,
}

impl<S> Summarizer<S>
where
    S: AskAsync<Response = String>,
{
    pub fn new(
        service: S,
        threshold: usize,
        bounds: SummaryBounds,
        inference_timeout: Duration,
    ) -> Self {
        Self {
            service: Some(service),
            threshold,
            bounds,
            inference_timeout,
        }
    }

    /// A summarizer with no model behind it. Short text still gets the
    /// placeholder; longer text is returned unchanged.
    pub fn unavailable(threshold: usize, bounds: SummaryBounds, inference_timeout: Duration) -> Self {
        Self {
            service: None,
            threshold,
            bounds,
            inference_timeout,
        }
    }

    /// Summarize an article's body, falling back to its description.
    #[instrument(level = "info", skip_all, fields(title = %article.title))]
    pub async fn summarize(&self, article: &Article) -> String {
        self.gate(article.summary_source()).await
    }

    /// Summarize `text` if it is longer than the threshold.
    pub async fn gate(&self, text: &str) -> String {
        let chars = text.chars().count();
        if chars <= self.threshold {
            debug!(chars, threshold = self.threshold, "Text too short to summarize");
            return NO_SUMMARY.to_string();
        }

        let Some(service) = &self.service else {
            debug!(chars, "No summarization model loaded; using original text");
            return text.to_string();
        };

        let prompt = self.prompt(text);
        let t0 = Instant::now();
        match timeout(self.inference_timeout, service.ask(&prompt)).await {
            Ok(Ok(summary)) => {
                info!(
                    chars,
                    summary_chars = summary.chars().count(),
                    elapsed_ms = t0.elapsed().as_millis() as u128,
                    "Summarized text"
                );
                summary
            }
            Ok(Err(e)) => {
                warn!(error = %e, text = %truncate_for_log(text, 80), "Summarization failed; using original text");
                text.to_string()
            }
            Err(_) => {
                warn!(
                    timeout_ms = self.inference_timeout.as_millis() as u128,
                    "Summarization timed out; using original text"
                );
                text.to_string()
            }
        }
    }

    /// The request sent to the model: fixed length bounds, deterministic.
    fn prompt(&self, text: &str) -> String {
        format!(
            "Summarize the following news text in {} to {} words. \
             Reply with the summary only.\n\n{}",
            self.bounds.min_length, self.bounds.max_length, text
        )
    }
}
