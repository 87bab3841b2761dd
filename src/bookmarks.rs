//! Session-scoped bookmark storage.
//!
//! A [`BookmarkSet`] is an ordered, deduplicated list of articles owned by
//! one session. Articles are identified by their `(title, url)` pair, so a
//! refetched article whose image or description changed is still recognized
//! as already bookmarked. Sets only grow; there is no removal and no
//! persistence beyond the session.
//!
//! [`SessionBookmarks`] keys sets by [`SessionId`] so callers pass the
//! session explicitly instead of relying on ambient state.

use crate::models::Article;
use rand::{Rng, rng};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Opaque identifier of one dashboard session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct SessionId(String);

impl SessionId {
    /// Generate a random 16-hex-digit session id.
    pub fn generate() -> Self {
        let value: u64 = rng().random();
        Self(format!("{:016x}", value))
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered, deduplicated bookmarks of one session.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BookmarkSet {
    articles: Vec<Article>,
}

impl BookmarkSet {
    /// Append `article` unless an article with the same identity is
    /// already bookmarked. Returns whether it was inserted.
    pub fn add(&mut self, article: Article) -> bool {
        if self.contains(&article) {
            return false;
        }
        self.articles.push(article);
        true
    }

    pub fn contains(&self, article: &Article) -> bool {
        self.articles
            .iter()
            .any(|existing| existing.identity() == article.identity())
    }

    /// Bookmarks in insertion order.
    pub fn list(&self) -> &[Article] {
        &self.articles
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }
}

/// Bookmark sets keyed by session.
#[derive(Debug, Default)]
pub struct SessionBookmarks {
    sessions: HashMap<SessionId, BookmarkSet>,
}

impl SessionBookmarks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an article to `session`'s bookmarks, creating the set on first use.
    pub fn add(&mut self, session: &SessionId, article: Article) -> bool {
        self.sessions
            .entry(session.clone())
            .or_default()
            .add(article)
    }

    /// Bookmarks of `session`; empty for a session that never bookmarked.
    pub fn list(&self, session: &SessionId) -> &[Article] {
        self.sessions
            .get(session)
            .map(BookmarkSet::list)
            .unwrap_or(&[])
    }

    /// Drop a finished session and return its bookmarks.
    pub fn end_session(&mut self, session: &SessionId) -> BookmarkSet {
        self.sessions.remove(session).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(title: &str, url: &str) -> Article {
        Article {
            title: title.to_string(),
            description: String::new(),
            content: String::new(),
            url: url.to_string(),
            image_url: None,
            source_name: "Test".to_string(),
            published_at: None,
        }
    }

    #[test]
    fn test_add_twice_keeps_one_copy() {
        let mut set = BookmarkSet::default();
        let a = article("A", "https://a");
        assert!(set.add(a.clone()));
        assert!(!set.add(a.clone()));
        assert_eq!(set.list(), &[a]);
    }

    #[test]
    fn test_duplicate_keeps_original_position() {
        let mut set = BookmarkSet::default();
        let a = article("A", "https://a");
        let b = article("B", "https://b");
        set.add(a.clone());
        set.add(b.clone());
        assert!(!set.add(a.clone()));
        assert_eq!(set.list(), &[a, b]);
    }

    #[test]
    fn test_identity_is_title_and_url() {
        let mut set = BookmarkSet::default();
        let original = article("A", "https://a");
        let mut refetched = original.clone();
        refetched.image_url = Some("https://a/new.jpg".to_string());
        refetched.description = "updated".to_string();

        assert!(set.add(original));
        assert!(!set.add(refetched));
        assert!(set.add(article("A", "https://a/other")));
        assert!(set.add(article("A2", "https://a")));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_sessions_are_isolated() {
        let mut store = SessionBookmarks::new();
        let alice = SessionId::from("alice");
        let bob = SessionId::from("bob");
        let a = article("A", "https://a");

        assert!(store.add(&alice, a.clone()));
        assert!(store.add(&bob, a.clone()));
        assert!(!store.add(&alice, a.clone()));

        assert_eq!(store.list(&alice).len(), 1);
        assert_eq!(store.list(&bob).len(), 1);
        assert!(store.list(&SessionId::from("carol")).is_empty());

        let ended = store.end_session(&alice);
        assert_eq!(ended.len(), 1);
        assert!(store.list(&alice).is_empty());
    }

    #[test]
    fn test_generated_session_ids_look_random() {
        let a = SessionId::generate();
        let b = SessionId::generate();
        assert_eq!(a.to_string().len(), 16);
        assert_ne!(a, b);
    }
}
