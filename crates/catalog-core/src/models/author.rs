use serde::{Deserialize, Serialize};

/// Article listed on an author record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleRef {
    #[serde(default, deserialize_with = "super::de::optional_id")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "super::de::null_as_empty")]
    pub title: String,
}

/// Award listed on an author record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwardRef {
    #[serde(default, deserialize_with = "super::de::optional_id")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "super::de::null_as_empty")]
    pub name: String,
}

/// The author list sends articles either as one comma-separated string
/// or as a list of `{id, title}` objects.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AuthorArticles {
    Joined(String),
    Listed(Vec<ArticleRef>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Author {
    #[serde(alias = "id", deserialize_with = "super::de::id")]
    pub author_id: i64,
    #[serde(alias = "FirstName", default)]
    pub first_name: String,
    #[serde(alias = "LastName", default)]
    pub last_name: String,
    /// Combined name as returned by the name-lookup endpoint.
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(alias = "Email", default)]
    pub email: Option<String>,
    #[serde(alias = "Address", default)]
    pub address: Option<String>,
    #[serde(alias = "InstitutionId", default, deserialize_with = "super::de::optional_id")]
    pub institution_id: Option<i64>,
    #[serde(alias = "institutionName", default)]
    pub institution_name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(alias = "dateOfbirth", default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub articles: Option<AuthorArticles>,
    #[serde(default, deserialize_with = "null_as_empty_list")]
    pub awards: Vec<AwardRef>,
}

fn null_as_empty_list<'de, D>(deserializer: D) -> Result<Vec<AwardRef>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<AwardRef>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Author {
    pub fn display_name(&self) -> String {
        let joined = format!("{} {}", self.first_name, self.last_name);
        let joined = joined.trim();
        if joined.is_empty() {
            self.full_name.clone().unwrap_or_default()
        } else {
            joined.to_string()
        }
    }

    pub fn article_titles(&self) -> Vec<&str> {
        match &self.articles {
            Some(AuthorArticles::Joined(s)) => {
                s.split(',').map(str::trim).filter(|t| !t.is_empty()).collect()
            }
            Some(AuthorArticles::Listed(list)) => list
                .iter()
                .map(|a| a.title.trim())
                .filter(|t| !t.is_empty())
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn award_names(&self) -> Vec<&str> {
        self.awards
            .iter()
            .map(|a| a.name.trim())
            .filter(|n| !n.is_empty())
            .collect()
    }

    pub fn article_count(&self) -> usize {
        self.article_titles().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_snake_case_author() {
        let json = r#"{"author_id": 7, "first_name": "Grace", "last_name": "Hopper", "articles": "COBOL, Compilers"}"#;
        let author: Author = serde_json::from_str(json).unwrap();
        assert_eq!(author.author_id, 7);
        assert_eq!(author.display_name(), "Grace Hopper");
        assert_eq!(author.article_titles(), vec!["COBOL", "Compilers"]);
    }

    #[test]
    fn test_parse_pascal_case_author() {
        let json = r#"{"id": 3, "FirstName": "Alan", "LastName": "Turing", "Email": "alan@example.org", "InstitutionId": 2}"#;
        let author: Author = serde_json::from_str(json).unwrap();
        assert_eq!(author.author_id, 3);
        assert_eq!(author.email.as_deref(), Some("alan@example.org"));
        assert_eq!(author.institution_id, Some(2));
        assert_eq!(author.article_count(), 0);
    }

    #[test]
    fn test_display_name_falls_back_to_full_name() {
        let json = r#"{"author_id": 1, "full_name": "Barbara Liskov"}"#;
        let author: Author = serde_json::from_str(json).unwrap();
        assert_eq!(author.display_name(), "Barbara Liskov");
    }

    #[test]
    fn test_parse_author_with_listed_articles_and_awards() {
        let json = r#"[{
            "id": "3",
            "FirstName": "Alan",
            "LastName": "Turing",
            "InstitutionId": "2",
            "articles": [{"id": "10", "title": "On Computable Numbers"}, {"id": 11, "title": " "}],
            "awards": [{"id": "5", "name": "Smith's Prize"}]
        }]"#;
        let authors: Vec<Author> = serde_json::from_str(json).unwrap();
        let author = &authors[0];
        assert_eq!(author.author_id, 3);
        assert_eq!(author.institution_id, Some(2));
        assert_eq!(author.article_titles(), vec!["On Computable Numbers"]);
        assert_eq!(author.article_count(), 1);
        assert_eq!(author.award_names(), vec!["Smith's Prize"]);
    }

    #[test]
    fn test_null_articles_and_awards_read_as_empty() {
        let json = r#"{"author_id": 1, "articles": null, "awards": null}"#;
        let author: Author = serde_json::from_str(json).unwrap();
        assert_eq!(author.article_count(), 0);
        assert!(author.awards.is_empty());
    }

    #[test]
    fn test_article_titles_ignore_blank_entries() {
        let json = r#"{"author_id": 1, "articles": "A,, B ,"}"#;
        let author: Author = serde_json::from_str(json).unwrap();
        assert_eq!(author.article_titles(), vec!["A", "B"]);
    }
}
