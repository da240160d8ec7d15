// In crates/core-types/src/wire.rs

//! Textual wire forms shared by every record field.
//!
//! Decimals travel as strings holding their exact text, dates as `YYYY-MM-DD`
//! and date-times as ISO-8601 (`YYYY-MM-DDTHH:MM:SS[.ffffff][+HH:MM]`). The
//! parsers here are also what the schema validator uses to decide whether a
//! value has the right shape, so both decode paths agree on what is valid.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use rust_decimal::Decimal;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

use crate::{Error, Result, Timestamp};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

// The first entry is the canonical form; its parse error is the one reported.
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const OFFSET_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M%:z",
];

/// Parses a decimal from its exact textual form.
///
/// Plain notation (`"338.19"`) keeps its scale, so `"337.60"` prints back as
/// `"337.60"`. Scientific notation (`"1.5E+3"`) is accepted as well. Text that
/// cannot be represented without rounding is rejected.
pub fn parse_decimal(text: &str) -> Result<Decimal> {
    let trimmed = text.trim();
    let parsed = if trimmed.contains(['e', 'E']) {
        Decimal::from_scientific(trimmed)
    } else {
        Decimal::from_str_exact(trimmed)
    };
    let mut value = parsed.map_err(|source| Error::InvalidDecimal {
        value: text.to_string(),
        source,
    })?;
    // The parsers drop the sign of a negative zero.
    if value.is_zero() && trimmed.starts_with('-') {
        value.set_sign_negative(true);
    }
    Ok(value)
}

/// Parses a calendar date.
///
/// A full date-time is also accepted, in which case only its date part is kept.
pub fn parse_date(text: &str) -> Result<NaiveDate> {
    match NaiveDate::parse_from_str(text, DATE_FORMAT) {
        Ok(date) => Ok(date),
        Err(source) => parse_timestamp(text)
            .map(|timestamp| timestamp.naive_local().date())
            .map_err(|_| Error::InvalidDate {
                value: text.to_string(),
                source,
            }),
    }
}

/// Parses a naive ISO-8601 date-time.
///
/// Accepts `T` or a space as the separator, optional seconds and fraction, or a
/// bare date (read as midnight). Text carrying an offset is rejected here; see
/// [`parse_timestamp`].
pub fn parse_datetime(text: &str) -> Result<NaiveDateTime> {
    let canonical = match NaiveDateTime::parse_from_str(text, DATETIME_FORMATS[0]) {
        Ok(datetime) => return Ok(datetime),
        Err(e) => e,
    };

    for format in &DATETIME_FORMATS[1..] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(datetime);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(text, DATE_FORMAT) {
        return Ok(date.and_time(NaiveTime::MIN));
    }

    Err(Error::InvalidDateTime {
        value: text.to_string(),
        source: canonical,
    })
}

/// Parses a timestamp, keeping its UTC offset when one is written.
///
/// `Z` is read as `+00:00`. Without an offset the result is naive, exactly as
/// [`parse_datetime`] reads it.
pub fn parse_timestamp(text: &str) -> Result<Timestamp> {
    match parse_datetime(text) {
        Ok(naive) => Ok(Timestamp::from(naive)),
        Err(err) => parse_offset_datetime(text).map(Timestamp::from).ok_or(err),
    }
}

fn parse_offset_datetime(text: &str) -> Option<DateTime<FixedOffset>> {
    let text = match text.strip_suffix(['Z', 'z']) {
        Some(head) => format!("{head}+00:00"),
        None => text.to_string(),
    };
    OFFSET_DATETIME_FORMATS
        .iter()
        .find_map(|format| DateTime::parse_from_str(&text, format).ok())
}

/// Formats a timestamp: the local date-time followed by its offset, if any.
pub fn format_timestamp(value: &Timestamp) -> String {
    let local = format_datetime(&value.naive_local());
    match value.offset() {
        Some(offset) => format!("{local}{offset}"),
        None => local,
    }
}

/// Formats a date-time the way it goes on the wire.
///
/// The fraction is omitted when zero, written with microsecond digits when that
/// is exact, and with nanosecond digits otherwise.
pub fn format_datetime(value: &NaiveDateTime) -> String {
    let nanos = value.nanosecond();
    let format = if nanos == 0 {
        "%Y-%m-%dT%H:%M:%S"
    } else if nanos % 1_000 == 0 {
        "%Y-%m-%dT%H:%M:%S%.6f"
    } else {
        "%Y-%m-%dT%H:%M:%S%.9f"
    };
    value.format(format).to_string()
}

/// Serializes any `Display` value as a JSON string.
// rust_decimal's `serde-str` feature reads through `from_str`, which rounds
// over-long text and has no scientific notation, so decimals go through here
// and `DecimalVisitor` instead.
pub struct AsText<'a, T: fmt::Display>(pub &'a T);

impl<T: fmt::Display> Serialize for AsText<'_, T> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self.0)
    }
}

// --- Field deserializers ---

pub fn deserialize_decimal<'de, D>(deserializer: D) -> std::result::Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(DecimalVisitor)
}

pub fn deserialize_date<'de, D>(deserializer: D) -> std::result::Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    parse_date(&text).map_err(de::Error::custom)
}

pub fn deserialize_timestamp<'de, D>(deserializer: D) -> std::result::Result<Timestamp, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    parse_timestamp(&text).map_err(de::Error::custom)
}

/// Accepts decimal text or a JSON integer. Floats are refused.
struct DecimalVisitor;

impl Visitor<'_> for DecimalVisitor {
    type Value = Decimal;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a decimal string")
    }

    fn visit_str<E>(self, value: &str) -> std::result::Result<Decimal, E>
    where
        E: de::Error,
    {
        parse_decimal(value).map_err(E::custom)
    }

    fn visit_i64<E>(self, value: i64) -> std::result::Result<Decimal, E>
    where
        E: de::Error,
    {
        Ok(Decimal::from(value))
    }

    fn visit_u64<E>(self, value: u64) -> std::result::Result<Decimal, E>
    where
        E: de::Error,
    {
        Ok(Decimal::from(value))
    }
}
