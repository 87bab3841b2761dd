//! Corpus-level statistics over one fetch.
//!
//! Both aggregates are pure functions of their inputs and are recomputed on
//! every fetch.

use crate::models::{Article, LabelShare, SentimentLabel, SentimentResult};
use crate::sentiment::round1;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Label counts for one fetch. All three labels are always present.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CorpusStats {
    pub counts: BTreeMap<SentimentLabel, usize>,
    pub total: usize,
}

impl CorpusStats {
    /// Count the labels of a batch of sentiment results.
    pub fn from_results(results: &[SentimentResult]) -> Self {
        let mut counts: BTreeMap<SentimentLabel, usize> =
            SentimentLabel::ALL.iter().map(|label| (*label, 0)).collect();
        for result in results {
            *counts.entry(result.label).or_insert(0) += 1;
        }
        Self {
            counts,
            total: results.len(),
        }
    }

    pub fn count(&self, label: SentimentLabel) -> usize {
        self.counts.get(&label).copied().unwrap_or(0)
    }

    /// Percentage of the corpus per label, in display order.
    ///
    /// Returns `None` when the corpus is empty.
    pub fn shares(&self) -> Option<Vec<LabelShare>> {
        if self.total == 0 {
            return None;
        }
        Some(
            SentimentLabel::ALL
                .iter()
                .map(|label| LabelShare {
                    label: *label,
                    percent: round1(100.0 * self.count(*label) as f64 / self.total as f64),
                })
                .collect(),
        )
    }
}

/// Articles per publisher, most prolific first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PublisherStats(pub Vec<(String, usize)>);

impl PublisherStats {
    pub fn iter(&self) -> impl Iterator<Item = &(String, usize)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Group articles by `source_name` and count them.
///
/// Sorted descending by count; publishers with equal counts keep the order
/// in which they were first seen.
pub fn publisher_stats(articles: &[Article]) -> PublisherStats {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();

    for article in articles {
        match positions.get(article.source_name.as_str()) {
            Some(&pos) => counts[pos].1 += 1,
            None => {
                positions.insert(&article.source_name, counts.len());
                counts.push((article.source_name.clone(), 1));
            }
        }
    }

    // `sort_by` is stable, which preserves first-seen order among ties.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    PublisherStats(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UNKNOWN_SOURCE;

    fn result(label: SentimentLabel) -> SentimentResult {
        SentimentResult {
            label,
            positive_pct: 0.0,
            neutral_pct: 0.0,
            negative_pct: 0.0,
            polarity: 0.0,
        }
    }

    fn from_source(source: &str) -> Article {
        Article {
            title: format!("story from {}", source),
            description: String::new(),
            content: String::new(),
            url: String::new(),
            image_url: None,
            source_name: source.to_string(),
            published_at: None,
        }
    }

    #[test]
    fn test_empty_corpus_has_no_shares() {
        let stats = CorpusStats::from_results(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.count(SentimentLabel::Positive), 0);
        assert!(stats.shares().is_none());
    }

    #[test]
    fn test_counts_and_shares() {
        use SentimentLabel::*;
        let results = [
            result(Positive),
            result(Neutral),
            result(Neutral),
            result(Negative),
            result(Positive),
            result(Neutral),
        ];
        let stats = CorpusStats::from_results(&results);
        assert_eq!(stats.total, 6);
        assert_eq!(stats.count(Positive), 2);
        assert_eq!(stats.count(Neutral), 3);
        assert_eq!(stats.count(Negative), 1);

        let shares = stats.shares().unwrap();
        let labels: Vec<_> = shares.iter().map(|s| s.label).collect();
        assert_eq!(labels, vec![Positive, Neutral, Negative]);
        assert_eq!(shares[0].percent, 33.3);
        assert_eq!(shares[1].percent, 50.0);
        assert_eq!(shares[2].percent, 16.7);
    }

    #[test]
    fn test_all_labels_present_even_when_unused() {
        let stats = CorpusStats::from_results(&[result(SentimentLabel::Negative)]);
        assert_eq!(stats.counts.len(), 3);
        let shares = stats.shares().unwrap();
        assert_eq!(shares[0].percent, 0.0);
        assert_eq!(shares[2].percent, 100.0);
    }

    #[test]
    fn test_publisher_stats_sorted_by_count() {
        let articles: Vec<Article> = ["A", "B", "A", "C", "B", "A"]
            .iter()
            .map(|s| from_source(s))
            .collect();
        let stats = publisher_stats(&articles);
        assert_eq!(
            stats.0,
            vec![
                ("A".to_string(), 3),
                ("B".to_string(), 2),
                ("C".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_publisher_ties_keep_first_seen_order() {
        let articles: Vec<Article> = ["Z", "Y", UNKNOWN_SOURCE, "Y", "Z", "X"]
            .iter()
            .map(|s| from_source(s))
            .collect();
        let stats = publisher_stats(&articles);
        let names: Vec<&str> = stats.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["Z", "Y", UNKNOWN_SOURCE, "X"]);
    }

    #[test]
    fn test_publisher_stats_empty() {
        assert!(publisher_stats(&[]).is_empty());
    }
}
