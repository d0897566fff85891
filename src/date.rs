//! Date codec for the API's timestamp layout
//!
//! Timestamps such as `created_at` arrive as `Wed Aug 27 13:08:45 +0000 2008`.
//! Every conversion to and from that layout goes through this module.

use crate::error::{Error, Result};
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// chrono layout of the API's date strings
pub const DATE_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// Format a timestamp in the API layout
pub fn encode(value: &DateTime<FixedOffset>) -> String {
    value.format(DATE_FORMAT).to_string()
}

/// Parse a timestamp in the API layout
pub fn decode(value: &str) -> Result<DateTime<FixedOffset>> {
    DateTime::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| Error::Other(format!("Invalid date '{value}': {e}")))
}

/// A timestamp that (de)serializes in the API layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TwitterDate(DateTime<FixedOffset>);

impl TwitterDate {
    /// Wrap an existing timestamp
    pub fn new(value: DateTime<FixedOffset>) -> Self {
        Self(value)
    }

    /// The timestamp with its original offset
    pub fn value(&self) -> DateTime<FixedOffset> {
        self.0
    }

    /// The timestamp in UTC
    pub fn to_utc(&self) -> DateTime<Utc> {
        self.0.with_timezone(&Utc)
    }
}

impl Default for TwitterDate {
    fn default() -> Self {
        Self(DateTime::<Utc>::default().fixed_offset())
    }
}

impl From<DateTime<FixedOffset>> for TwitterDate {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Self(value)
    }
}

impl From<DateTime<Utc>> for TwitterDate {
    fn from(value: DateTime<Utc>) -> Self {
        Self(value.fixed_offset())
    }
}

impl std::str::FromStr for TwitterDate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        decode(s).map(Self)
    }
}

impl fmt::Display for TwitterDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode(&self.0))
    }
}

impl Serialize for TwitterDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&encode(&self.0))
    }
}

impl<'de> Deserialize<'de> for TwitterDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        decode(&raw).map(Self).map_err(serde::de::Error::custom)
    }
}
