//! Dashboard figures derived from the catalog lists.

use std::cmp::Reverse;

use super::{Article, Author};

/// Entries shown in each dashboard ranking.
pub const SUMMARY_TOP_N: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorArticleCount {
    pub name: String,
    pub articles: usize,
}

#[derive(Debug, Clone, Default)]
pub struct CatalogSummary {
    pub author_count: usize,
    pub article_count: usize,
    pub award_count: usize,
    pub institution_count: usize,
    /// Authors with at least one article, most prolific first.
    pub top_authors: Vec<AuthorArticleCount>,
    /// Most recently published articles first; undated articles last.
    pub recent_articles: Vec<Article>,
}

impl CatalogSummary {
    pub fn build(
        authors: &[Author],
        articles: &[Article],
        award_count: usize,
        institution_count: usize,
    ) -> Self {
        let mut top_authors: Vec<AuthorArticleCount> = authors
            .iter()
            .map(|a| AuthorArticleCount {
                name: a.display_name(),
                articles: a.article_count(),
            })
            .filter(|a| a.articles > 0)
            .collect();
        // Stable sort keeps backend order among ties.
        top_authors.sort_by_key(|a| Reverse(a.articles));
        top_authors.truncate(SUMMARY_TOP_N);

        let mut recent_articles = articles.to_vec();
        recent_articles.sort_by_key(|a| Reverse(a.published_on()));
        recent_articles.truncate(SUMMARY_TOP_N);

        Self {
            author_count: authors.len(),
            article_count: articles.len(),
            award_count,
            institution_count,
            top_authors,
            recent_articles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author(id: i64, first: &str, articles: &str) -> Author {
        serde_json::from_value(serde_json::json!({
            "author_id": id,
            "first_name": first,
            "last_name": "X",
            "articles": articles,
        }))
        .unwrap()
    }

    fn article(id: i64, date: Option<&str>) -> Article {
        serde_json::from_value(serde_json::json!({
            "article_id": id,
            "title": format!("Article {}", id),
            "publication_date": date,
        }))
        .unwrap()
    }

    #[test]
    fn test_counts() {
        let summary = CatalogSummary::build(&[author(1, "A", "")], &[article(1, None)], 3, 4);
        assert_eq!(summary.author_count, 1);
        assert_eq!(summary.article_count, 1);
        assert_eq!(summary.award_count, 3);
        assert_eq!(summary.institution_count, 4);
    }

    #[test]
    fn test_top_authors_skip_empty_and_rank_by_count() {
        let authors = vec![
            author(1, "One", "a"),
            author(2, "None", ""),
            author(3, "Three", "a,b,c"),
            author(4, "Two", "a,b"),
        ];
        let summary = CatalogSummary::build(&authors, &[], 0, 0);
        let names: Vec<_> = summary.top_authors.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Three X", "Two X", "One X"]);
    }

    #[test]
    fn test_top_authors_truncated() {
        let authors: Vec<_> = (0..8).map(|i| author(i, "A", "x")).collect();
        let summary = CatalogSummary::build(&authors, &[], 0, 0);
        assert_eq!(summary.top_authors.len(), SUMMARY_TOP_N);
    }

    #[test]
    fn test_recent_articles_newest_first_undated_last() {
        let articles = vec![
            article(1, Some("2021-05-01")),
            article(2, None),
            article(3, Some("2024-01-15")),
            article(4, Some("2022-11-30")),
        ];
        let summary = CatalogSummary::build(&[], &articles, 0, 0);
        let ids: Vec<_> = summary.recent_articles.iter().map(|a| a.article_id).collect();
        assert_eq!(ids, vec![3, 4, 1, 2]);
    }
}
