//! `HH:MM` clock-time serde helpers.
//!
//! Ward lists and progress notes record times to the minute. `chrono`'s default
//! `NaiveTime` representation includes seconds, so fields use
//! `#[serde(with = "census::hhmm")]` to keep the two-part form on the wire.

use chrono::NaiveTime;
use serde::{Deserialize, Deserializer, Serializer};

/// Wire format for clock times.
pub const FORMAT: &str = "%H:%M";

/// Parse an `HH:MM` string.
pub fn parse(input: &str) -> Result<NaiveTime, chrono::ParseError> {
    NaiveTime::parse_from_str(input.trim(), FORMAT)
}

pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(&time.format(FORMAT))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse(&s).map_err(|e| serde::de::Error::custom(format!("invalid HH:MM time '{s}': {e}")))
}
