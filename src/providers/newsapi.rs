//! [NewsAPI](https://newsapi.org) v2 client.
//!
//! Two endpoints are used:
//!
//! | Endpoint | Parameters | Used for |
//! |----------|------------|----------|
//! | `top-headlines` | `apiKey`, `language`, `category`?, `country`?, `q`?, `pageSize` | Browsing by category |
//! | `everything` | `apiKey`, `language`, `q`, `sortBy`, `pageSize` | Keyword search |
//!
//! Fetching never fails from the caller's point of view: transport errors,
//! server errors, non-`ok` responses and malformed JSON all end up as an
//! empty article list after being logged.

use crate::models::{Article, ProviderResponse};
use crate::normalize::normalize_value;
use crate::settings::Settings;
use crate::utils::truncate_for_log;
use clap::ValueEnum;
use reqwest::{Client, StatusCode};
use std::error::Error;
use std::fmt;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

/// News categories accepted by `top-headlines`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Category {
    General,
    Business,
    Entertainment,
    Health,
    Science,
    Sports,
    Technology,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::General => "general",
            Category::Business => "business",
            Category::Entertainment => "entertainment",
            Category::Health => "health",
            Category::Science => "science",
            Category::Sports => "sports",
            Category::Technology => "technology",
        }
    }
}

/// Which endpoint a fetch should use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum FetchMode {
    /// Search when a keyword is given, top headlines otherwise.
    #[default]
    Auto,
    Headlines,
    Everything,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    TopHeadlines,
    Everything,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::TopHeadlines => "top-headlines",
            Endpoint::Everything => "everything",
        }
    }
}

/// What the user asked for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewsQuery {
    pub category: Option<Category>,
    pub keyword: Option<String>,
    pub mode: FetchMode,
}

impl NewsQuery {
    /// The keyword, if it contains anything besides whitespace.
    pub fn keyword(&self) -> Option<&str> {
        self.keyword
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    pub fn endpoint(&self) -> Endpoint {
        match self.mode {
            FetchMode::Headlines => Endpoint::TopHeadlines,
            FetchMode::Everything => Endpoint::Everything,
            FetchMode::Auto if self.keyword().is_some() => Endpoint::Everything,
            FetchMode::Auto => Endpoint::TopHeadlines,
        }
    }

    /// Short human-readable description, e.g. `top headlines · technology`.
    pub fn describe(&self) -> String {
        let mut parts = vec![match self.endpoint() {
            Endpoint::TopHeadlines => "top headlines".to_string(),
            Endpoint::Everything => "search".to_string(),
        }];
        if self.endpoint() == Endpoint::TopHeadlines {
            if let Some(category) = self.category {
                parts.push(category.as_str().to_string());
            }
        }
        if let Some(keyword) = self.keyword() {
            parts.push(format!("\"{}\"", keyword));
        }
        parts.join(" · ")
    }
}

/// Query-string parameters for `query`, or `None` when the request cannot
/// succeed (a search without a keyword).
pub fn build_params(
    query: &NewsQuery,
    settings: &Settings,
    api_key: &str,
) -> Option<(Endpoint, Vec<(&'static str, String)>)> {
    let endpoint = query.endpoint();
    let mut params = vec![
        ("apiKey", api_key.to_string()),
        ("language", settings.language.clone()),
    ];

    match endpoint {
        Endpoint::TopHeadlines => {
            if let Some(category) = query.category {
                params.push(("category", category.as_str().to_string()));
            }
            if let Some(country) = settings.country.as_deref().filter(|c| !c.is_empty()) {
                params.push(("country", country.to_string()));
            }
            if let Some(keyword) = query.keyword() {
                params.push(("q", keyword.to_string()));
            }
        }
        Endpoint::Everything => {
            let keyword = query.keyword()?;
            params.push(("q", keyword.to_string()));
            params.push(("sortBy", settings.sort_by.clone()));
        }
    }
    params.push(("pageSize", settings.page_size.to_string()));

    Some((endpoint, params))
}

/// Turn a provider response body into canonical articles.
///
/// Malformed JSON, a non-`ok` status and a missing or empty `articles`
/// list all produce an empty result. Individual records that fail
/// normalization are skipped.
pub fn parse_response(body: &str) -> Vec<Article> {
    let response: ProviderResponse = match serde_json::from_str(body) {
        Ok(r) => r,
        Err(e) => {
            warn!(error = %e, body_preview = %truncate_for_log(body, 200), "Provider returned malformed JSON");
            return Vec::new();
        }
    };

    if response.status.as_deref() != Some("ok") {
        warn!(
            status = ?response.status,
            code = ?response.code,
            message = ?response.message,
            "Provider returned a non-ok status"
        );
        return Vec::new();
    }

    let raw_articles = response.articles.unwrap_or_default();
    debug!(
        received = raw_articles.len(),
        total_results = ?response.total_results,
        "Provider response decoded"
    );

    raw_articles
        .iter()
        .enumerate()
        .filter_map(|(i, raw)| match normalize_value(raw) {
            Ok(article) => Some(article),
            Err(e) => {
                warn!(index = i, error = %e, "Skipping article record");
                None
            }
        })
        .collect()
}

/// A provider call that should be retried.
#[derive(Debug)]
pub struct ServerError(pub StatusCode);

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "news provider answered with {}", self.0)
    }
}

impl Error for ServerError {}

/// HTTP client for NewsAPI with a bounded timeout and bounded retry.
pub struct NewsClient {
    http: Client,
    base_url: Url,
    api_key: String,
    settings: Settings,
}

impl fmt::Debug for NewsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsClient")
            .field("base_url", &self.base_url.as_str())
            .field("language", &self.settings.language)
            .field("page_size", &self.settings.page_size)
            .finish_non_exhaustive()
    }
}

impl NewsClient {
    /// Build a client from settings.
    ///
    /// # Errors
    ///
    /// Fails if `settings.base_url` is not a valid URL or the HTTP client
    /// cannot be constructed.
    pub fn new(api_key: impl Into<String>, settings: &Settings) -> Result<Self, Box<dyn Error>> {
        let mut base = settings.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)?;
        let http = Client::builder()
            .timeout(settings.request_timeout())
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url,
            api_key: api_key.into(),
            settings: settings.clone(),
        })
    }

    /// Fetch and normalize articles for `query`. Never fails; see module docs.
    #[instrument(level = "info", skip_all, fields(query = %query.describe()))]
    pub async fn fetch(&self, query: &NewsQuery) -> Vec<Article> {
        let Some((endpoint, params)) = build_params(query, &self.settings, &self.api_key) else {
            warn!("Search mode needs a keyword; nothing to fetch");
            return Vec::new();
        };

        let url = match self.base_url.join(endpoint.path()) {
            Ok(url) => url,
            Err(e) => {
                error!(error = %e, "Could not build provider URL");
                return Vec::new();
            }
        };

        let max_attempts = self.settings.provider_retries + 1;
        let t0 = Instant::now();
        for attempt in 1..=max_attempts {
            match self.get_body(&url, &params).await {
                Ok(body) => {
                    let articles = parse_response(&body);
                    info!(
                        count = articles.len(),
                        endpoint = endpoint.path(),
                        elapsed_ms = t0.elapsed().as_millis() as u128,
                        "Fetched articles"
                    );
                    return articles;
                }
                Err(e) if attempt < max_attempts => {
                    let delay = Duration::from_millis(self.settings.provider_retry_delay_ms);
                    warn!(attempt, max_attempts, ?delay, error = %e, "Provider request failed; retrying");
                    sleep(delay).await;
                }
                Err(e) => {
                    error!(attempt, max_attempts, error = %e, "Provider request failed; showing no articles");
                }
            }
        }
        Vec::new()
    }

    /// One GET. Server errors are returned as [`ServerError`] so they can be
    /// retried; client errors carry a JSON error body and are passed through.
    async fn get_body(
        &self,
        url: &Url,
        params: &[(&'static str, String)],
    ) -> Result<String, Box<dyn Error>> {
        let resp = self.http.get(url.clone()).query(params).send().await?;
        let status = resp.status();
        if status.is_server_error() {
            return Err(Box::new(ServerError(status)));
        }
        if !status.is_success() {
            debug!(%status, "Provider answered with a client error");
        }
        Ok(resp.text().await?)
    }
}
