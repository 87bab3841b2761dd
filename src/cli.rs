//! Command-line interface definitions for NewsPulse.
//!
//! One invocation is one dashboard session. The query flags pick what to
//! fetch; `--summarize` and `--bookmark` are the per-article actions.
//! Secrets can be provided via environment variables.

use crate::providers::newsapi::{Category, FetchMode, NewsQuery};
use clap::Parser;

/// Command-line arguments for the NewsPulse dashboard.
///
/// # Examples
///
/// ```sh
/// # Technology headlines, report on stdout
/// news_pulse --category technology
///
/// # Keyword search, summarize and bookmark the first article
/// news_pulse -k "interest rates" --summarize 0 --bookmark 0 -m report.md
///
/// # Speak the summaries and keep a JSON snapshot
/// news_pulse --summarize 0 --summarize 2 --audio-output-dir ./audio -j ./json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// NewsAPI key
    #[arg(long, env = "NEWS_API_KEY", hide_env_values = true)]
    pub news_api_key: String,

    /// News category for top headlines
    #[arg(long, value_enum, default_value_t = Category::General)]
    pub category: Category,

    /// Search keyword (switches to search in auto mode)
    #[arg(short, long)]
    pub keyword: Option<String>,

    /// Which provider endpoint to use
    #[arg(long, value_enum, default_value_t = FetchMode::Auto)]
    pub mode: FetchMode,

    /// Two-letter country filter for top headlines (overrides settings)
    #[arg(long)]
    pub country: Option<String>,

    /// Show the summary of the article at this index (repeatable)
    #[arg(long = "summarize", value_name = "INDEX")]
    pub summarize: Vec<usize>,

    /// Bookmark the article at this index (repeatable)
    #[arg(long = "bookmark", value_name = "INDEX")]
    pub bookmark: Vec<usize>,

    /// Optional path to a YAML settings file
    #[arg(short, long)]
    pub settings: Option<String>,

    /// Optional path to the awful_aj config.yaml used for summaries
    #[arg(short, long)]
    pub config: Option<String>,

    /// Write the Markdown report here instead of stdout
    #[arg(short, long)]
    pub markdown_output: Option<String>,

    /// Output directory for JSON snapshots
    #[arg(short, long)]
    pub json_output_dir: Option<String>,

    /// Speak each shown summary and write MP3 files here
    #[arg(long)]
    pub audio_output_dir: Option<String>,
}

impl Cli {
    pub fn query(&self) -> NewsQuery {
        NewsQuery {
            category: Some(self.category),
            keyword: self.keyword.clone(),
            mode: self.mode,
        }
    }
}
