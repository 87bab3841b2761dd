//! News providers.
//!
//! | Provider | Module | Method | Notes |
//! |----------|--------|--------|-------|
//! | NewsAPI | [`newsapi`] | REST (`/v2/top-headlines`, `/v2/everything`) | Requires API key |
//!
//! A provider module exports a client whose `fetch` returns canonical
//! [`crate::models::Article`]s and degrades to an empty list on failure.

pub mod newsapi;
