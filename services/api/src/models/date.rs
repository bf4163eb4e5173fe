//! Lenient date parsing for request payloads
//!
//! Clients send either a plain `YYYY-MM-DD` date or a full RFC 3339
//! timestamp such as `1995-12-15T00:00:00.000Z`. Timestamps are reduced to
//! their UTC calendar date.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, de};

/// Parse a calendar date or an RFC 3339 timestamp
pub fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }

    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc).date_naive())
        .map_err(|_| format!("Invalid date: {}", raw))
}

/// `deserialize_with` helper for optional date fields
pub fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) => parse_date(&raw).map(Some).map_err(de::Error::custom),
        None => Ok(None),
    }
}
