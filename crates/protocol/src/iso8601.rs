//! ISO-8601 timestamps in the `YYYY-MM-DDTHH:MM:SS.mmmZ` form.
//!
//! Timestamps are kept at millisecond precision so that their textual
//! form survives a save and load cycle unchanged. The `serialize` and
//! `deserialize` functions can be used with `#[serde(with = "...")]`.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serializer};

/// Returns the current time truncated to millisecond precision.
#[inline]
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Formats a timestamp, e.g. `2024-05-01T09:30:00.120Z`.
#[inline]
pub fn format(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parses an RFC 3339 timestamp with any offset into UTC.
#[inline]
pub fn parse(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(s).map(|ts| ts.with_timezone(&Utc))
}

/// Serializes a timestamp with [`format`].
pub fn serialize<S: Serializer>(
    timestamp: &DateTime<Utc>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format(timestamp))
}

/// Deserializes a timestamp with [`parse`].
pub fn deserialize<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<DateTime<Utc>, D::Error> {
    let s = String::deserialize(deserializer)?;
    parse(&s).map_err(D::Error::custom)
}
