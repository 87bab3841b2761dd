//! # NewsPulse
//!
//! A news dashboard that fetches headlines from NewsAPI, scores their
//! sentiment with the VADER lexicon, summarizes selected articles through an
//! LLM, and renders the result as a Markdown report.
//!
//! ## Features
//!
//! - Top headlines by category, or keyword search
//! - Per-article sentiment (positive/neutral/negative percentages, polarity)
//! - Corpus sentiment distribution and article count per publisher
//! - Headline term frequencies for a word cloud
//! - On-demand summaries through an OpenAI-compatible LLM, optionally spoken
//! - Per-session bookmarks
//! - Markdown report and JSON snapshot output
//!
//! ## Usage
//!
//! ```sh
//! NEWS_API_KEY=... news_pulse --category technology --summarize 0 --bookmark 0
//! ```
//!
//! ## Architecture
//!
//! One run is one session and follows a pipeline:
//! 1. **Fetching**: Query the provider and normalize records into articles
//! 2. **Classifying**: Score every article's sentiment
//! 3. **Aggregating**: Corpus sentiment shares, publisher counts, headline terms
//! 4. **Actions**: Bookmarks and summaries (with speech) for requested articles
//! 5. **Output**: Markdown report and optional JSON snapshot

use awful_aj::{config, config_dir, template};
use chrono::Local;
use clap::Parser;
use futures::stream::{self, StreamExt};
use itertools::Itertools;
use std::collections::HashMap;
use std::error::Error;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod aggregate;
mod api;
mod bookmarks;
mod cli;
mod models;
mod normalize;
mod outputs;
mod providers;
mod sentiment;
mod settings;
mod speech;
mod summarize;
mod utils;
mod wordcloud;

use aggregate::{CorpusStats, publisher_stats};
use api::{LlmService, RetryAsk};
use bookmarks::{SessionBookmarks, SessionId};
use cli::Cli;
use models::{Article, ArticleReport, Dashboard, SentimentResult};
use outputs::{json, markdown};
use providers::newsapi::NewsClient;
use sentiment::{SentimentClassifier, VaderScorer};
use settings::Settings;
use speech::SpeechClient;
use summarize::Summarizer;
use utils::{ensure_writable_dir, slugify_title};
use wordcloud::headline_terms;

type LlmSummarizer = Summarizer<RetryAsk<LlmService>>;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("news_pulse starting up");

    let args = Cli::parse();
    debug!(?args.category, ?args.keyword, ?args.mode, "Parsed CLI arguments");

    let mut settings = match Settings::load(args.settings.as_deref()).await {
        Ok(s) => s,
        Err(e) => {
            error!(path = ?args.settings, error = %e, "Could not load settings");
            return Err(e);
        }
    };
    if let Some(country) = &args.country {
        settings.country = Some(country.clone());
    }

    // Early check: output directories must be writable before any network work
    for dir in [&args.json_output_dir, &args.audio_output_dir].into_iter().flatten() {
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(path = %dir, error = %e, "Output directory is not writable (fix perms or choose a different path)");
            return Err(e);
        }
    }

    let session = SessionId::generate();
    let mut bookmarks = SessionBookmarks::new();
    info!(%session, "Session started");

    // ---- Fetch ----
    let query = args.query();
    let client = NewsClient::new(args.news_api_key.clone(), &settings)?;
    let articles = client.fetch(&query).await;
    if articles.is_empty() {
        warn!(query = %query.describe(), "{}", markdown::NO_ARTICLES);
    }

    // ---- Classify & aggregate ----
    let classifier = SentimentClassifier::new(VaderScorer::new());
    let sentiments: Vec<SentimentResult> = articles.iter().map(|a| classifier.classify(a)).collect();
    let corpus = CorpusStats::from_results(&sentiments);
    let publishers = publisher_stats(&articles);
    let terms = headline_terms(&articles, settings.headline_terms);
    info!(
        total = corpus.total,
        positive = corpus.count(models::SentimentLabel::Positive),
        neutral = corpus.count(models::SentimentLabel::Neutral),
        negative = corpus.count(models::SentimentLabel::Negative),
        publishers = publishers.0.len(),
        "Aggregated sentiment"
    );

    // ---- Bookmarks ----
    for &index in &args.bookmark {
        match articles.get(index) {
            Some(article) => {
                if bookmarks.add(&session, article.clone()) {
                    info!(index, title = %article.title, "Added to bookmarks!");
                } else {
                    info!(index, title = %article.title, "Already in bookmarks.");
                }
            }
            None => warn!(index, available = articles.len(), "No article at this index; cannot bookmark"),
        }
    }
    debug!(count = bookmarks.list(&session).len(), "Session bookmarks");

    // ---- Summaries ----
    let requested: Vec<usize> = args
        .summarize
        .iter()
        .copied()
        .unique()
        .filter(|&index| {
            let exists = index < articles.len();
            if !exists {
                warn!(index, available = articles.len(), "No article at this index; cannot summarize");
            }
            exists
        })
        .collect();

    let summaries = if requested.is_empty() {
        HashMap::new()
    } else {
        let summarizer = summarizer_or_fallback(&args, &settings).await;
        let speech = match &args.audio_output_dir {
            Some(_) => Some(SpeechClient::new(&settings.tts_language, settings.request_timeout())?),
            None => None,
        };
        summarize_requested(
            &summarizer,
            speech.as_ref(),
            args.audio_output_dir.as_deref().map(Path::new),
            &articles,
            &requested,
        )
        .await
    };

    // ---- Build dashboard ----
    let now = Local::now();
    let reports = build_reports(&articles, sentiments, &summaries);

    let bookmarked = bookmarks.end_session(&session);
    let dashboard = Dashboard {
        local_date: now.date_naive().to_string(),
        local_time: now.format("%H:%M:%S").to_string(),
        session_id: session.to_string(),
        query: query.describe(),
        articles: reports,
        sentiment_shares: corpus.shares(),
        sentiment: corpus,
        publishers,
        headline_terms: terms,
        bookmarks: bookmarked.list().to_vec(),
    };
    info!(
        articles = dashboard.articles.len(),
        summaries = summaries.len(),
        bookmarks = bookmarked.len(),
        "Dashboard assembled"
    );

    // ---- Output ----
    let md = markdown::dashboard_to_markdown(&dashboard);
    match &args.markdown_output {
        Some(path) => {
            if let Err(e) = tokio::fs::write(path, &md).await {
                error!(path = %path, error = %e, "Failed writing Markdown");
                return Err(e.into());
            }
            info!(path = %path, "Wrote Markdown report");
        }
        None => println!("{}", md),
    }

    if let Some(dir) = &args.json_output_dir {
        if let Err(e) = json::write_dashboard(&dashboard, dir).await {
            error!(error = %e, "Failed to write JSON snapshot");
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}

/// Load the LLM config and chat template once and wrap them in the
/// summarization gate.
#[instrument(level = "info", skip_all)]
async fn load_summarizer(args: &Cli, settings: &Settings) -> Result<LlmSummarizer, Box<dyn Error>> {
    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => config_dir()?.join("config.yaml").to_string_lossy().into_owned(),
    };
    let config = match config::load_config(&config_path) {
        Ok(c) => c,
        Err(e) => {
            error!(config_path = %config_path, error = %e, "Could not load LLM configuration");
            return Err(e.into());
        }
    };
    info!(config_path = %config_path, "Loaded LLM configuration");

    let template = template::load_template(&settings.summary_template).await?;
    info!(template = %settings.summary_template, "Loaded summary template");

    let service = RetryAsk::new(
        LlmService::new(config, template),
        settings.summary_retries,
        Duration::from_secs(1),
    );
    Ok(Summarizer::new(
        service,
        settings.summary_threshold,
        settings.summary_bounds(),
        settings.inference_timeout(),
    ))
}

/// [`load_summarizer`], or a model-less summarizer when the LLM config or
/// template cannot be loaded. Requested articles then show their original
/// text instead of aborting the run.
async fn summarizer_or_fallback(args: &Cli, settings: &Settings) -> LlmSummarizer {
    match load_summarizer(args, settings).await {
        Ok(summarizer) => summarizer,
        Err(e) => {
            warn!(error = %e, "Summarization model unavailable; showing original text");
            Summarizer::unavailable(
                settings.summary_threshold,
                settings.summary_bounds(),
                settings.inference_timeout(),
            )
        }
    }
}

/// Summarize the requested articles one after another, speaking each
/// summary when an audio directory is configured.
///
/// Returns `index -> (summary, audio path)`.
async fn summarize_requested(
    summarizer: &LlmSummarizer,
    speech: Option<&SpeechClient>,
    audio_dir: Option<&Path>,
    articles: &[Article],
    requested: &[usize],
) -> HashMap<usize, (String, Option<String>)> {
    stream::iter(requested.iter().copied())
        .then(|index| async move {
            let article = &articles[index];
            let summary = summarizer.summarize(article).await;

            let audio = match (speech, audio_dir) {
                (Some(speech), Some(dir)) => {
                    let name = audio_file_name(index, &article.title);
                    match speech.speak_to_file(&summary, dir, &name).await {
                        Ok(path) => Some(path.to_string_lossy().into_owned()),
                        Err(e) => {
                            warn!(index, error = %e, "Text-to-speech failed; summary shown without audio");
                            None
                        }
                    }
                }
                _ => None,
            };
            (index, (summary, audio))
        })
        .collect()
        .await
}

/// Pair every article with its sentiment and, when requested, its summary.
fn build_reports(
    articles: &[Article],
    sentiments: Vec<SentimentResult>,
    summaries: &HashMap<usize, (String, Option<String>)>,
) -> Vec<ArticleReport> {
    articles
        .iter()
        .zip(sentiments)
        .enumerate()
        .map(|(index, (article, sentiment))| {
            let (summary, audio_path) = match summaries.get(&index) {
                Some((summary, audio)) => (Some(summary.clone()), audio.clone()),
                None => (None, None),
            };
            ArticleReport {
                index,
                article: article.clone(),
                sentiment,
                summary,
                audio_path,
            }
        })
        .collect()
}

/// `07-storm-hits-coast`, capped so long headlines stay usable as file names.
fn audio_file_name(index: usize, title: &str) -> String {
    let slug: String = slugify_title(title).chars().take(60).collect();
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        format!("{:02}", index)
    } else {
        format!("{:02}-{}", index, slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::PublisherStats;
    use crate::models::SentimentLabel;

    fn article(title: &str, content: &str) -> Article {
        Article {
            title: title.to_string(),
            description: String::new(),
            content: content.to_string(),
            url: format!("https://example.com/{}", slugify_title(title)),
            image_url: None,
            source_name: "Example".to_string(),
            published_at: None,
        }
    }

    fn neutral() -> SentimentResult {
        SentimentResult {
            label: SentimentLabel::Neutral,
            positive_pct: 0.0,
            neutral_pct: 100.0,
            negative_pct: 0.0,
            polarity: 0.0,
        }
    }

    #[tokio::test]
    async fn test_dashboard_renders_when_summarizer_cannot_load() {
        let missing = std::env::temp_dir().join("news_pulse_missing_dir/config.yaml");
        let args = Cli::parse_from([
            "news_pulse",
            "--news-api-key",
            "KEY",
            "--summarize",
            "0",
            "-c",
            missing.to_str().unwrap(),
        ]);
        let settings = Settings::default();
        let summarizer = summarizer_or_fallback(&args, &settings).await;

        let body = "Flood waters rose overnight across the valley. ".repeat(10);
        let articles = vec![article("Valley floods", &body), article("Quiet day", "")];
        let summaries = summarize_requested(&summarizer, None, None, &articles, &args.summarize).await;
        assert_eq!(summaries[&0].0, body);

        let reports = build_reports(&articles, vec![neutral(), neutral()], &summaries);
        assert_eq!(reports[0].summary.as_deref(), Some(body.as_str()));
        assert!(reports[1].summary.is_none());

        let sentiments: Vec<SentimentResult> = reports.iter().map(|r| r.sentiment).collect();
        let corpus = CorpusStats::from_results(&sentiments);
        let dashboard = Dashboard {
            local_date: "2025-05-06".to_string(),
            local_time: "08:15:02".to_string(),
            session_id: "s1".to_string(),
            query: "top headlines".to_string(),
            articles: reports,
            sentiment_shares: corpus.shares(),
            sentiment: corpus,
            publishers: PublisherStats::default(),
            headline_terms: vec![],
            bookmarks: vec![],
        };
        let md = markdown::dashboard_to_markdown(&dashboard);
        assert!(md.contains("Valley floods"));
        assert!(md.contains("Quiet day"));
        assert!(md.contains("Flood waters rose overnight"));
    }

    #[test]
    fn test_audio_file_name() {
        assert_eq!(audio_file_name(7, "Storm hits coast!"), "07-storm-hits-coast");
        assert_eq!(audio_file_name(12, "???"), "12");
        assert_eq!(audio_file_name(0, &"x".repeat(200)).len(), 3 + 60);
    }
}
