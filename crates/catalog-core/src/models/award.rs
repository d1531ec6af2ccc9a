use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Award {
    #[serde(alias = "id", deserialize_with = "super::de::id")]
    pub award_id: i64,
    #[serde(default, deserialize_with = "super::de::null_as_empty")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub date_received: Option<String>,
    #[serde(default, deserialize_with = "super::de::optional_id")]
    pub author_id: Option<i64>,
    #[serde(default)]
    pub author_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unnamed_award_reads_as_blank() {
        let json = r#"[{"award_id": 1, "name": null, "author_id": "4"}, {"award_id": 2, "name": "Turing Award"}]"#;
        let awards: Vec<Award> = serde_json::from_str(json).unwrap();
        assert_eq!(awards[0].name, "");
        assert_eq!(awards[0].author_id, Some(4));
        assert_eq!(awards[1].name, "Turing Award");
    }
}
