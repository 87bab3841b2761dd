//! Dashboard settings loaded from an optional YAML file.
//!
//! Every field has a default, so an absent file, an empty file, or a file
//! that sets only a few keys are all valid:
//!
//! ```yaml
//! language: en
//! page_size: 30
//! request_timeout_secs: 10
//! summary_threshold: 200
//! ```
//!
//! The LLM connection itself is configured separately through `awful_aj`'s
//! `config.yaml`.

use crate::summarize::SummaryBounds;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::time::Duration;
use tokio::fs;
use tracing::{info, instrument};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// NewsAPI v2 base URL; endpoint names are joined onto it.
    pub base_url: String,
    pub language: String,
    /// Two-letter country filter for top headlines.
    pub country: Option<String>,
    pub page_size: u32,
    /// Ordering for the search endpoint: `publishedAt`, `relevancy` or `popularity`.
    pub sort_by: String,
    pub request_timeout_secs: u64,
    /// Extra attempts after a failed provider request.
    pub provider_retries: usize,
    pub provider_retry_delay_ms: u64,
    /// Texts with at most this many characters are not summarized.
    pub summary_threshold: usize,
    pub summary_max_length: usize,
    pub summary_min_length: usize,
    pub summary_retries: usize,
    pub inference_timeout_secs: u64,
    /// Name of the `awful_aj` chat template used for summaries.
    pub summary_template: String,
    pub tts_language: String,
    pub headline_terms: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: "https://newsapi.org/v2/".to_string(),
            language: "en".to_string(),
            country: None,
            page_size: 30,
            sort_by: "publishedAt".to_string(),
            request_timeout_secs: 15,
            provider_retries: 1,
            provider_retry_delay_ms: 500,
            summary_threshold: 200,
            summary_max_length: 130,
            summary_min_length: 30,
            summary_retries: 2,
            inference_timeout_secs: 60,
            summary_template: "news_summarizer".to_string(),
            tts_language: "en".to_string(),
            headline_terms: 40,
        }
    }
}

impl Settings {
    /// Parse settings from YAML text. An empty document yields the defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml)
    }

    /// Load settings from `path`, or return the defaults when no path is given.
    #[instrument(level = "info")]
    pub async fn load(path: Option<&str>) -> Result<Self, Box<dyn Error>> {
        match path {
            Some(path) => {
                let yaml = fs::read_to_string(path).await?;
                let settings = Self::from_yaml(&yaml)?;
                info!(path, "Loaded dashboard settings");
                Ok(settings)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn inference_timeout(&self) -> Duration {
        Duration::from_secs(self.inference_timeout_secs)
    }

    pub fn summary_bounds(&self) -> SummaryBounds {
        SummaryBounds {
            max_length: self.summary_max_length,
            min_length: self.summary_min_length,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(Settings::from_yaml("").unwrap(), Settings::default());
        assert_eq!(Settings::from_yaml("  \n").unwrap(), Settings::default());
    }

    #[test]
    fn test_partial_yaml_keeps_other_defaults() {
        let settings = Settings::from_yaml("page_size: 50\ncountry: us\n").unwrap();
        assert_eq!(settings.page_size, 50);
        assert_eq!(settings.country.as_deref(), Some("us"));
        assert_eq!(settings.language, "en");
        assert_eq!(settings.summary_threshold, 200);
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        assert!(Settings::from_yaml("page_size: [not a number").is_err());
    }

    #[test]
    fn test_derived_values() {
        let settings = Settings::default();
        assert_eq!(settings.request_timeout(), Duration::from_secs(15));
        assert_eq!(settings.inference_timeout(), Duration::from_secs(60));
        assert_eq!(
            settings.summary_bounds(),
            SummaryBounds {
                max_length: 130,
                min_length: 30
            }
        );
    }

    #[tokio::test]
    async fn test_load_without_path() {
        let settings = Settings::load(None).await.unwrap();
        assert_eq!(settings, Settings::default());
    }
}
