//! Timestamps coming from the content service are written without an offset
//! (`2024-05-01T12:34:56.789000`) and are UTC. RFC 3339 input is accepted too.

use chrono::{DateTime, NaiveDateTime, Utc};

pub fn parse(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// `#[serde(with = "crate::datetime::option")]` for `Option<DateTime<Utc>>`
pub mod option {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_some(&dt.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(value) => super::parse(&value)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("invalid timestamp {value}"))),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_naive_utc() {
        let dt = parse("2024-05-01T12:34:56.789000").expect("should parse");
        assert_eq!(dt.year(), 2024);
        assert_eq!(dt.hour(), 12);
        assert_eq!(dt.nanosecond(), 789_000_000);
    }

    #[test]
    fn test_parse_without_fraction() {
        assert!(parse("2024-05-01T12:34:56").is_some());
    }

    #[test]
    fn test_parse_rfc3339_offset() {
        let dt = parse("2024-05-01T14:00:00+02:00").expect("should parse");
        assert_eq!(dt.hour(), 12);
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse("yesterday").is_none());
    }
}
