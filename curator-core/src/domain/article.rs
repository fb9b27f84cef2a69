//! Article domain types
//!
//! Articles are ingested into the curation service and browsed by users when
//! assembling a newsletter. Filtering and sorting happen client-side so list
//! views stay responsive regardless of what the service returns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An ingested article available for newsletter curation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub id: Uuid,
    pub title: String,
    pub url: String,
    pub source: String,
    pub summary: Option<String>,
    pub topics: Vec<String>,
    pub published_at: DateTime<Utc>,
    pub ingested_at: DateTime<Utc>,
}

/// Conjunctive article filter
///
/// All set fields must match for an article to pass. `source` is an exact
/// case-insensitive match, `topic` matches any of the article's topics, and
/// `search` is a case-insensitive substring test against title and summary.
#[derive(Debug, Clone, Default)]
pub struct ArticleFilter {
    pub source: Option<String>,
    pub topic: Option<String>,
    pub search: Option<String>,
}

impl ArticleFilter {
    /// Returns true when no criteria are set
    pub fn is_empty(&self) -> bool {
        self.source.is_none() && self.topic.is_none() && self.search.is_none()
    }

    /// Check whether an article passes every set criterion
    pub fn matches(&self, article: &Article) -> bool {
        if let Some(source) = &self.source {
            if !article.source.eq_ignore_ascii_case(source) {
                return false;
            }
        }

        if let Some(topic) = &self.topic {
            let found = article
                .topics
                .iter()
                .any(|t| t.eq_ignore_ascii_case(topic));
            if !found {
                return false;
            }
        }

        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let in_title = article.title.to_lowercase().contains(&needle);
            let in_summary = article
                .summary
                .as_ref()
                .is_some_and(|s| s.to_lowercase().contains(&needle));
            if !in_title && !in_summary {
                return false;
            }
        }

        true
    }
}

/// Sort order for article list views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArticleSort {
    /// Newest first
    #[default]
    PublishedDesc,
    /// Oldest first
    PublishedAsc,
    /// Alphabetical by title
    Title,
}

/// Sort articles in place according to the given order
///
/// Ties on the sort key fall back to article ID so ordering is stable across
/// repeated fetches of the same data.
pub fn sort_articles(articles: &mut [Article], sort: ArticleSort) {
    match sort {
        ArticleSort::PublishedDesc => {
            articles.sort_by(|a, b| b.published_at.cmp(&a.published_at).then(a.id.cmp(&b.id)));
        }
        ArticleSort::PublishedAsc => {
            articles.sort_by(|a, b| a.published_at.cmp(&b.published_at).then(a.id.cmp(&b.id)));
        }
        ArticleSort::Title => {
            articles.sort_by(|a, b| {
                a.title
                    .to_lowercase()
                    .cmp(&b.title.to_lowercase())
                    .then(a.id.cmp(&b.id))
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn article(title: &str, source: &str, topics: &[&str], day: u32) -> Article {
        Article {
            id: Uuid::new_v4(),
            title: title.to_string(),
            url: format!("https://example.com/{}", title),
            source: source.to_string(),
            summary: Some(format!("Summary of {}", title)),
            topics: topics.iter().map(|t| t.to_string()).collect(),
            published_at: Utc.with_ymd_and_hms(2025, 6, day, 12, 0, 0).unwrap(),
            ingested_at: Utc.with_ymd_and_hms(2025, 6, day, 13, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = ArticleFilter::default();
        assert!(filter.is_empty());
        assert!(filter.matches(&article("Anything", "wire", &["tech"], 1)));
    }

    #[test]
    fn test_source_filter_is_case_insensitive() {
        let filter = ArticleFilter {
            source: Some("Wire".to_string()),
            ..Default::default()
        };

        assert!(filter.matches(&article("A", "wire", &[], 1)));
        assert!(!filter.matches(&article("B", "blog", &[], 1)));
    }

    #[test]
    fn test_topic_filter_matches_any_topic() {
        let filter = ArticleFilter {
            topic: Some("rust".to_string()),
            ..Default::default()
        };

        assert!(filter.matches(&article("A", "wire", &["tech", "Rust"], 1)));
        assert!(!filter.matches(&article("B", "wire", &["tech"], 1)));
    }

    #[test]
    fn test_search_filter_checks_title_and_summary() {
        let filter = ArticleFilter {
            search: Some("quarterly".to_string()),
            ..Default::default()
        };

        assert!(filter.matches(&article("Quarterly report", "wire", &[], 1)));

        let mut by_summary = article("Other", "wire", &[], 1);
        by_summary.summary = Some("The quarterly numbers are in".to_string());
        assert!(filter.matches(&by_summary));

        let mut no_summary = article("Other", "wire", &[], 1);
        no_summary.summary = None;
        assert!(!filter.matches(&no_summary));
    }

    #[test]
    fn test_filters_are_conjunctive() {
        let filter = ArticleFilter {
            source: Some("wire".to_string()),
            topic: Some("rust".to_string()),
            ..Default::default()
        };

        assert!(filter.matches(&article("A", "wire", &["rust"], 1)));
        assert!(!filter.matches(&article("B", "wire", &["go"], 1)));
        assert!(!filter.matches(&article("C", "blog", &["rust"], 1)));
    }

    #[test]
    fn test_sort_published_desc_is_default() {
        let mut articles = vec![
            article("old", "wire", &[], 1),
            article("new", "wire", &[], 20),
            article("mid", "wire", &[], 10),
        ];

        sort_articles(&mut articles, ArticleSort::default());

        let titles: Vec<_> = articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_sort_by_title_ignores_case() {
        let mut articles = vec![
            article("banana", "wire", &[], 1),
            article("Apple", "wire", &[], 2),
            article("cherry", "wire", &[], 3),
        ];

        sort_articles(&mut articles, ArticleSort::Title);

        let titles: Vec<_> = articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["Apple", "banana", "cherry"]);
    }
}
