//! Markdown rendering of a dashboard session.
//!
//! Section order:
//! 1. Overall sentiment distribution (or the "no articles" notice)
//! 2. Latest news, one block per article
//! 3. Article count by publisher
//! 4. Headline terms for the word cloud
//! 5. Bookmarked articles, when there are any

use crate::models::{ArticleReport, Dashboard};
use crate::utils::escape_markdown;
use std::fmt::Write;

/// Shown instead of statistics when the fetch returned nothing.
pub const NO_ARTICLES: &str = "No news articles found for the current filter.";

pub fn dashboard_to_markdown(dashboard: &Dashboard) -> String {
    let mut md = String::new();

    writeln!(md, "# 📰 NewsPulse: Real-Time News Trends & Sentiment\n").unwrap();
    writeln!(
        md,
        "_{} · generated {} {} · session `{}`_\n",
        escape_markdown(&dashboard.query),
        dashboard.local_date,
        dashboard.local_time,
        dashboard.session_id
    )
    .unwrap();

    writeln!(md, "## 📊 Overall Sentiment Distribution\n").unwrap();
    match &dashboard.sentiment_shares {
        Some(shares) => {
            for share in shares {
                writeln!(md, "- {} {}: {}%", share.label.marker(), share.label, share.percent).unwrap();
            }
            writeln!(md).unwrap();
        }
        None => {
            writeln!(md, "> ⚠️ {}\n", NO_ARTICLES).unwrap();
        }
    }

    if !dashboard.articles.is_empty() {
        writeln!(md, "## 🗞️ Latest News\n").unwrap();
        for report in &dashboard.articles {
            write_article(&mut md, report);
        }
    }

    if !dashboard.publishers.is_empty() {
        writeln!(md, "## 📊 Article Count by Publisher\n").unwrap();
        writeln!(md, "| Publisher | Article Count |").unwrap();
        writeln!(md, "|-----------|---------------|").unwrap();
        for (publisher, count) in dashboard.publishers.iter() {
            writeln!(md, "| {} | {} |", escape_markdown(publisher), count).unwrap();
        }
        writeln!(md).unwrap();
    }

    if !dashboard.headline_terms.is_empty() {
        writeln!(md, "## ☁️ Headline Terms\n").unwrap();
        let terms = dashboard
            .headline_terms
            .iter()
            .map(|t| format!("`{}` ×{}", t.term, t.count))
            .collect::<Vec<_>>()
            .join(" · ");
        writeln!(md, "{}\n", terms).unwrap();
    }

    if !dashboard.bookmarks.is_empty() {
        writeln!(md, "## ⭐ Bookmarked Articles\n").unwrap();
        for bm in &dashboard.bookmarks {
            writeln!(
                md,
                "- 📰 [{}]({}) — *{}*",
                escape_markdown(&bm.title),
                bm.url,
                escape_markdown(&bm.source_name)
            )
            .unwrap();
        }
        writeln!(md).unwrap();
    }

    md
}

fn write_article(md: &mut String, report: &ArticleReport) {
    let article = &report.article;
    let s = &report.sentiment;

    writeln!(md, "### {}. {}\n", report.index, escape_markdown(&article.title)).unwrap();
    if let Some(image) = &article.image_url {
        writeln!(md, "![]({})\n", image).unwrap();
    }
    writeln!(
        md,
        "**Sentiment:** {} ({}) · 🟢 Positive: {}% | ⚪ Neutral: {}% | 🔴 Negative: {}%  ",
        s.label.marker(),
        s.label,
        s.positive_pct,
        s.neutral_pct,
        s.negative_pct
    )
    .unwrap();
    writeln!(md, "**Polarity:** {}%\n", s.polarity).unwrap();

    if let Some(summary) = &report.summary {
        writeln!(md, "> **Summary:** {}\n", summary.replace('\n', " ")).unwrap();
        if let Some(audio) = &report.audio_path {
            writeln!(md, "🎧 [Listen to summary]({})\n", audio).unwrap();
        }
    }

    writeln!(md, "[🔗 Read Full Article]({})  ", article.url).unwrap();
    writeln!(
        md,
        "_Published by: {} | Date: {}_\n",
        escape_markdown(&article.source_name),
        article.published_at.as_deref().unwrap_or("N/A")
    )
    .unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{CorpusStats, publisher_stats};
    use crate::models::{Article, SentimentLabel, SentimentResult, TermCount};

    fn article(title: &str, source: &str) -> Article {
        Article {
            title: title.to_string(),
            description: String::new(),
            content: String::new(),
            url: format!("https://example.com/{}", title.len()),
            image_url: None,
            source_name: source.to_string(),
            published_at: Some("2025-05-06T10:00:00Z".to_string()),
        }
    }

    fn positive() -> SentimentResult {
        SentimentResult {
            label: SentimentLabel::Positive,
            positive_pct: 60.0,
            neutral_pct: 40.0,
            negative_pct: 0.0,
            polarity: 55.5,
        }
    }

    fn empty_dashboard() -> Dashboard {
        Dashboard {
            local_date: "2025-05-06".to_string(),
            local_time: "08:00:00".to_string(),
            session_id: "s1".to_string(),
            query: "top headlines · general".to_string(),
            articles: vec![],
            sentiment: CorpusStats::from_results(&[]),
            sentiment_shares: None,
            publishers: publisher_stats(&[]),
            headline_terms: vec![],
            bookmarks: vec![],
        }
    }

    #[test]
    fn test_empty_dashboard_shows_no_articles_notice() {
        let md = dashboard_to_markdown(&empty_dashboard());
        assert!(md.contains(NO_ARTICLES));
        assert!(!md.contains("Latest News"));
        assert!(!md.contains("Bookmarked Articles"));
    }

    #[test]
    fn test_full_dashboard_sections() {
        let a = article("Good news", "BBC News");
        let results = [positive()];
        let sentiment = CorpusStats::from_results(&results);
        let dashboard = Dashboard {
            sentiment_shares: sentiment.shares(),
            sentiment,
            articles: vec![ArticleReport {
                index: 0,
                article: a.clone(),
                sentiment: positive(),
                summary: Some("Short summary.".to_string()),
                audio_path: Some("audio/good-news.mp3".to_string()),
            }],
            publishers: publisher_stats(std::slice::from_ref(&a)),
            headline_terms: vec![TermCount {
                term: "good".to_string(),
                count: 1,
            }],
            bookmarks: vec![a.clone()],
            ..empty_dashboard()
        };

        let md = dashboard_to_markdown(&dashboard);
        assert!(md.contains("🟢 Positive: 100%"));
        assert!(md.contains("⚪ Neutral: 0%"));
        assert!(md.contains("### 0. Good news"));
        assert!(md.contains("Polarity:** 55.5%"));
        assert!(md.contains("> **Summary:** Short summary."));
        assert!(md.contains("audio/good-news.mp3"));
        assert!(md.contains("| BBC News | 1 |"));
        assert!(md.contains("`good` ×1"));
        assert!(md.contains("- 📰 [Good news](https://example.com/9) — *BBC News*"));
        assert!(!md.contains(NO_ARTICLES));
    }

    #[test]
    fn test_missing_date_shows_placeholder() {
        let mut a = article("Undated", "X");
        a.published_at = None;
        let mut md = String::new();
        write_article(
            &mut md,
            &ArticleReport {
                index: 3,
                article: a,
                sentiment: positive(),
                summary: None,
                audio_path: None,
            },
        );
        assert!(md.contains("Date: N/A"));
        assert!(!md.contains("Summary"));
    }
}
