//! Headline term frequencies for the word cloud.
//!
//! The crate does not draw the cloud; it produces the weighted term list a
//! renderer needs. Tokenization mirrors what word-cloud generators do by
//! default: lowercase words, English stopwords removed, numbers dropped.

use crate::models::{Article, TermCount};
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};

static WORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\p{L}\p{N}]+(?:['’\-][\p{L}\p{N}]+)*").expect("static word regex")
});

static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and",
        "any", "are", "aren't", "as", "at", "be", "because", "been", "before", "being", "below",
        "between", "both", "but", "by", "can", "can't", "cannot", "com", "could", "couldn't",
        "did", "didn't", "do", "does", "doesn't", "doing", "don't", "down", "during", "each",
        "else", "ever", "few", "for", "from", "further", "get", "had", "hadn't", "has", "hasn't",
        "have", "haven't", "having", "he", "he'd", "he'll", "he's", "her", "here", "here's",
        "hers", "herself", "him", "himself", "his", "how", "how's", "however", "http", "i",
        "i'd", "i'll", "i'm", "i've", "if", "in", "into", "is", "isn't", "it", "it's", "its",
        "itself", "just", "k", "let's", "like", "me", "more", "most", "mustn't", "my", "myself",
        "no", "nor", "not", "of", "off", "on", "once", "only", "or", "other", "otherwise",
        "ought", "our", "ours", "ourselves", "out", "over", "own", "r", "same", "says", "shall",
        "shan't", "she", "she'd", "she'll", "she's", "should", "shouldn't", "since", "so",
        "some", "such", "than", "that", "that's", "the", "their", "theirs", "them",
        "themselves", "then", "there", "there's", "these", "they", "they'd", "they'll",
        "they're", "they've", "this", "those", "through", "to", "too", "under", "until", "up",
        "very", "was", "wasn't", "we", "we'd", "we'll", "we're", "we've", "were", "weren't",
        "what", "what's", "when", "when's", "where", "where's", "which", "while", "who",
        "who's", "whom", "why", "why's", "with", "won't", "would", "wouldn't", "www", "you",
        "you'd", "you'll", "you're", "you've", "your", "yours", "yourself", "yourselves",
    ]
    .into_iter()
    .collect()
});

/// Split text into word-cloud terms.
pub fn tokenize(text: &str) -> Vec<String> {
    WORD.find_iter(text)
        .map(|m| m.as_str().replace('’', "'").to_lowercase())
        .filter(|w| w.chars().count() >= 2)
        .filter(|w| !w.chars().all(char::is_numeric))
        .filter(|w| !STOPWORDS.contains(w.as_str()))
        .collect()
}

/// Most frequent headline terms, at most `limit` of them.
///
/// Sorted descending by count; equal counts keep first-seen order.
pub fn headline_terms(articles: &[Article], limit: usize) -> Vec<TermCount> {
    let text = articles.iter().map(|a| a.title.as_str()).join(" ");
    let terms = tokenize(&text);

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for term in &terms {
        *counts.entry(term.as_str()).or_insert(0) += 1;
    }

    terms
        .iter()
        .map(String::as_str)
        .unique()
        .map(|term| TermCount {
            term: term.to_string(),
            count: counts[term],
        })
        .sorted_by(|a, b| b.count.cmp(&a.count))
        .take(limit)
        .collect()
}
