//! Deserialize helpers for fields the backend sends in more than one shape.

use std::fmt;

use serde::de;

struct IdVisitor;

impl<'de> de::Visitor<'de> for IdVisitor {
    type Value = Option<i64>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an integer id or a string holding one")
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Some(v))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        i64::try_from(v)
            .map(Some)
            .map_err(|_| E::invalid_value(de::Unexpected::Unsigned(v), &self))
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        let v = v.trim();
        if v.is_empty() {
            return Ok(None);
        }
        v.parse()
            .map(Some)
            .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
    }

    fn visit_none<E>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E> {
        Ok(None)
    }
}

/// Required id sent as a number or a numeric string.
pub(crate) fn id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: de::Deserializer<'de>,
{
    deserializer
        .deserialize_any(IdVisitor)?
        .ok_or_else(|| de::Error::custom("missing id"))
}

/// Optional id sent as a number, a numeric string, an empty string or null.
pub(crate) fn optional_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: de::Deserializer<'de>,
{
    deserializer.deserialize_any(IdVisitor)
}

/// String field where null counts as empty.
pub(crate) fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: de::Deserializer<'de>,
{
    use serde::Deserialize;
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Record {
        #[serde(deserialize_with = "super::id")]
        id: i64,
        #[serde(default, deserialize_with = "super::optional_id")]
        parent: Option<i64>,
        #[serde(default, deserialize_with = "super::null_as_empty")]
        name: String,
    }

    #[test]
    fn test_id_accepts_number_and_string() {
        let r: Record = serde_json::from_str(r#"{"id": 4, "parent": "9"}"#).unwrap();
        assert_eq!(r.id, 4);
        assert_eq!(r.parent, Some(9));

        let r: Record = serde_json::from_str(r#"{"id": " 12 ", "parent": ""}"#).unwrap();
        assert_eq!(r.id, 12);
        assert_eq!(r.parent, None);
    }

    #[test]
    fn test_id_rejects_non_numeric_string() {
        assert!(serde_json::from_str::<Record>(r#"{"id": "abc"}"#).is_err());
    }

    #[test]
    fn test_null_name_reads_as_empty() {
        let r: Record = serde_json::from_str(r#"{"id": 1, "parent": null, "name": null}"#).unwrap();
        assert_eq!(r.parent, None);
        assert_eq!(r.name, "");
    }
}
