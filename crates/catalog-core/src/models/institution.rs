use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Institution {
    #[serde(alias = "institution_id", deserialize_with = "super::de::id")]
    pub id: i64,
    #[serde(default, deserialize_with = "super::de::null_as_empty")]
    pub name: String,
    #[serde(default)]
    pub country: Option<String>,
}
