use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    #[serde(alias = "id", deserialize_with = "super::de::id")]
    pub article_id: i64,
    #[serde(default, deserialize_with = "super::de::null_as_empty")]
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub publication_date: Option<String>,
    #[serde(default, deserialize_with = "super::de::optional_id")]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub category_name: Option<String>,
    /// Comma-separated author names.
    #[serde(default)]
    pub authors: Option<String>,
}

impl Article {
    /// Publication date parsed from either an RFC 3339 timestamp or `YYYY-MM-DD`.
    pub fn published_on(&self) -> Option<NaiveDate> {
        let raw = self.publication_date.as_deref()?;
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.date_naive());
        }
        raw.get(..10)
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
    }
}
