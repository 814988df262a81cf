//! Timestamp value object for immutable points in time.
//!
//! Serialized as ISO-8601 with an explicit `+00:00` offset, e.g.
//! `2024-01-15T10:30:00.123456+00:00`.

use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::errors::ValidationError;

/// Immutable point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from a DateTime<Utc>.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Returns the inner DateTime.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Parses an ISO-8601 string, accepting only a zero (UTC) offset.
    pub fn parse_iso8601(value: &str) -> Result<Self, ValidationError> {
        let parsed: DateTime<FixedOffset> = DateTime::parse_from_rfc3339(value.trim())
            .map_err(|e| ValidationError::invalid_format("timestamp", e.to_string()))?;

        if parsed.offset().local_minus_utc() != 0 {
            return Err(ValidationError::invalid_format(
                "timestamp",
                format!("expected UTC offset, got {}", parsed.offset()),
            ));
        }

        Ok(Self(parsed.with_timezone(&Utc)))
    }

    /// Formats as ISO-8601 with microseconds and an explicit `+00:00` offset.
    pub fn to_iso8601(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Micros, false)
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_iso8601())
    }
}

impl FromStr for Timestamp {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_iso8601(s)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_iso8601())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse_iso8601(&raw).map_err(serde::de::Error::custom)
    }
}
