//! String-tolerant deserializers for optional query parameters.
//!
//! Query strings arrive as text, and `serde(flatten)` on filter structs
//! routes every field through a buffering deserializer that no longer
//! coerces strings into scalars. These helpers parse explicitly and treat
//! an empty value as absent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

fn optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.filter(|s| !s.is_empty()))
}

pub fn optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    optional_string(deserializer)?
        .map(|s| s.parse::<i64>().map_err(serde::de::Error::custom))
        .transpose()
}

pub fn optional_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    optional_string(deserializer)?
        .map(|s| s.parse::<f64>().map_err(serde::de::Error::custom))
        .transpose()
}

pub fn optional_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    match optional_string(deserializer)? {
        None => Ok(None),
        Some(s) => match s.as_str() {
            "true" | "1" => Ok(Some(true)),
            "false" | "0" => Ok(Some(false)),
            other => Err(serde::de::Error::custom(format!(
                "invalid boolean: {other}"
            ))),
        },
    }
}

/// RFC 3339 timestamps, e.g. `2026-01-15T00:00:00Z`.
pub fn optional_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    optional_string(deserializer)?
        .map(|s| {
            DateTime::parse_from_rfc3339(&s)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(serde::de::Error::custom)
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Params {
        #[serde(default, deserialize_with = "optional_i64")]
        count: Option<i64>,
        #[serde(default, deserialize_with = "optional_f64")]
        price: Option<f64>,
        #[serde(default, deserialize_with = "optional_bool")]
        flag: Option<bool>,
        #[serde(default, deserialize_with = "optional_datetime")]
        after: Option<DateTime<Utc>>,
    }

    #[test]
    fn test_parses_string_values() {
        let params: Params = serde_json::from_str(
            r#"{"count":"5","price":"19.5","flag":"true","after":"2026-01-15T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(params.count, Some(5));
        assert_eq!(params.price, Some(19.5));
        assert_eq!(params.flag, Some(true));
        assert!(params.after.is_some());
    }

    #[test]
    fn test_empty_strings_are_absent() {
        let params: Params =
            serde_json::from_str(r#"{"count":"","price":"","flag":"","after":""}"#).unwrap();
        assert_eq!(params.count, None);
        assert_eq!(params.price, None);
        assert_eq!(params.flag, None);
        assert_eq!(params.after, None);
    }

    #[test]
    fn test_missing_fields_are_absent() {
        let params: Params = serde_json::from_str("{}").unwrap();
        assert_eq!(params.count, None);
        assert_eq!(params.flag, None);
    }

    #[test]
    fn test_numeric_bool_spellings() {
        let params: Params = serde_json::from_str(r#"{"flag":"1"}"#).unwrap();
        assert_eq!(params.flag, Some(true));
        let params: Params = serde_json::from_str(r#"{"flag":"0"}"#).unwrap();
        assert_eq!(params.flag, Some(false));
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(serde_json::from_str::<Params>(r#"{"count":"abc"}"#).is_err());
        assert!(serde_json::from_str::<Params>(r#"{"flag":"maybe"}"#).is_err());
        assert!(serde_json::from_str::<Params>(r#"{"after":"yesterday"}"#).is_err());
    }
}
