//! Conversion of raw provider records into canonical [`Article`]s.
//!
//! Every optional field is defaulted here so that no other module has to
//! deal with `null` or missing values. A record is only rejected when it is
//! not an article-shaped object, or when it has neither a title nor a URL
//! (bookmark identity and display both need at least one of them).

use crate::models::{Article, RawArticle, UNKNOWN_SOURCE};
use serde::Deserialize;
use std::error::Error;
use std::fmt;

/// Why a provider record could not be normalized.
#[derive(Debug)]
pub enum NormalizeError {
    /// The record is not an object, or a field has an unexpected JSON type.
    Malformed(serde_json::Error),
    /// Both `title` and `url` are absent or empty.
    MissingIdentity,
}

impl fmt::Display for NormalizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizeError::Malformed(e) => write!(f, "malformed article record: {}", e),
            NormalizeError::MissingIdentity => write!(f, "article record has neither title nor url"),
        }
    }
}

impl Error for NormalizeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            NormalizeError::Malformed(e) => Some(e),
            NormalizeError::MissingIdentity => None,
        }
    }
}

/// Normalize one raw JSON article record.
pub fn normalize_value(value: &serde_json::Value) -> Result<Article, NormalizeError> {
    let raw = RawArticle::deserialize(value).map_err(NormalizeError::Malformed)?;
    normalize(raw)
}

/// Normalize an already-deserialized provider record.
///
/// Absent `title`/`url` become `""` as long as the other one is present;
/// `source.name` defaults to `"Unknown"`.
pub fn normalize(raw: RawArticle) -> Result<Article, NormalizeError> {
    let title = raw.title.unwrap_or_default();
    let url = raw.url.unwrap_or_default();
    if title.is_empty() && url.is_empty() {
        return Err(NormalizeError::MissingIdentity);
    }

    let source_name = raw
        .source
        .and_then(|s| s.name)
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| UNKNOWN_SOURCE.to_string());

    Ok(Article {
        title,
        description: raw.description.unwrap_or_default(),
        content: raw.content.unwrap_or_default(),
        url,
        image_url: raw.url_to_image.filter(|u| !u.is_empty()),
        source_name,
        published_at: raw.published_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_title_only_record_defaults_everything_else() {
        let article = normalize_value(&json!({"title": "T"})).unwrap();
        assert_eq!(article.title, "T");
        assert_eq!(article.description, "");
        assert_eq!(article.content, "");
        // Policy: a missing url defaults to the empty string when a title exists.
        assert_eq!(article.url, "");
        assert_eq!(article.source_name, "Unknown");
        assert_eq!(article.image_url, None);
        assert_eq!(article.published_at, None);
    }

    #[test]
    fn test_url_only_record_is_kept() {
        let article = normalize_value(&json!({"url": "https://example.com/x"})).unwrap();
        assert_eq!(article.title, "");
        assert_eq!(article.url, "https://example.com/x");
    }

    #[test]
    fn test_missing_identity_is_rejected() {
        let err = normalize_value(&json!({"description": "orphan"})).unwrap_err();
        assert!(matches!(err, NormalizeError::MissingIdentity));

        let err = normalize_value(&json!({"title": null, "url": ""})).unwrap_err();
        assert!(matches!(err, NormalizeError::MissingIdentity));
    }

    #[test]
    fn test_nulls_are_defaulted() {
        let article = normalize_value(&json!({
            "source": {"id": null, "name": null},
            "title": "Headline",
            "description": null,
            "url": "https://example.com/h",
            "urlToImage": null,
            "publishedAt": null,
            "content": null
        }))
        .unwrap();
        assert_eq!(article.description, "");
        assert_eq!(article.content, "");
        assert_eq!(article.source_name, "Unknown");
    }

    #[test]
    fn test_full_record() {
        let article = normalize_value(&json!({
            "source": {"id": "bbc-news", "name": "BBC News"},
            "author": "Someone",
            "title": "Headline",
            "description": "Desc",
            "url": "https://bbc.co.uk/h",
            "urlToImage": "https://bbc.co.uk/h.jpg",
            "publishedAt": "2025-05-06T10:00:00Z",
            "content": "Body"
        }))
        .unwrap();
        assert_eq!(article.source_name, "BBC News");
        assert_eq!(article.image_url.as_deref(), Some("https://bbc.co.uk/h.jpg"));
        assert_eq!(article.published_at.as_deref(), Some("2025-05-06T10:00:00Z"));
        assert_eq!(article.content, "Body");
    }

    #[test]
    fn test_wrong_types_are_malformed() {
        let err = normalize_value(&json!({"title": 42, "url": "https://x"})).unwrap_err();
        assert!(matches!(err, NormalizeError::Malformed(_)));

        let err = normalize_value(&json!("not an object")).unwrap_err();
        assert!(matches!(err, NormalizeError::Malformed(_)));
    }
}
