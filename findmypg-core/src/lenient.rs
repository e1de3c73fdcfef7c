//! Lenient JSON decoding
//!
//! The web client is loose with types: identifiers and rents arrive as
//! numbers or numeric strings, flags as `true`, `1` or `"1"`, and unset
//! fields as `""`. These `deserialize_with` helpers accept all of those
//! shapes. Fields using them should also carry `#[serde(default)]`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, de::Error};
use serde_json::Value;

/// Boolean flag: `true`, non-zero numbers, and `"1"`/`"true"`/`"yes"`/`"on"`.
/// Anything else (including `null`) is `false`.
pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_flag(&value))
}

pub fn value_to_flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        _ => false,
    }
}

/// Flag that remembers whether it was sent. A present key is always
/// `Some`, decoded like [`flag`]; pair with `#[serde(default)]` so an
/// absent key stays `None`.
pub fn optional_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(Some(value_to_flag(&value)))
}

/// Optional integer from a number or a numeric string. `null` and `""` are `None`.
pub fn optional_int<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    value_to_int(&value).map_err(D::Error::custom)
}

pub fn value_to_int(value: &Value) -> Result<Option<i32>, String> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => {
            if let Some(v) = n.as_i64() {
                return i32::try_from(v)
                    .map(Some)
                    .map_err(|_| format!("integer out of range: {}", v));
            }
            match n.as_f64() {
                Some(f) if f.fract() == 0.0 && f.abs() <= i32::MAX as f64 => Ok(Some(f as i32)),
                _ => Err(format!("expected an integer, got {}", n)),
            }
        }
        Value::String(s) => parse_int(s),
        other => Err(format!("expected an integer, got {}", other)),
    }
}

/// Parse a textual integer; blank text is `None`.
pub fn parse_int(raw: &str) -> Result<Option<i32>, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if let Ok(v) = trimmed.parse::<i32>() {
        return Ok(Some(v));
    }
    match trimmed.parse::<f64>() {
        Ok(f) if f.fract() == 0.0 && f.abs() <= i32::MAX as f64 => Ok(Some(f as i32)),
        _ => Err(format!("expected an integer, got {:?}", raw)),
    }
}

/// Optional float from a number or a numeric string.
pub fn optional_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::Number(n) => Ok(n.as_f64()),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("expected an amount, got {:?}", s))),
        other => Err(D::Error::custom(format!("expected an amount, got {}", other))),
    }
}

/// Optional text. Numbers are rendered as text; `null` and `""` are `None`.
pub fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) if s.is_empty() => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        other => Err(D::Error::custom(format!("expected text, got {}", other))),
    }
}

/// Optional calendar date. Unparseable input is an error.
pub fn optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => parse_calendar_date(&s)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("invalid date: {:?}", s))),
        other => Err(D::Error::custom(format!("expected a date, got {}", other))),
    }
}

/// Optional calendar date where anything unparseable silently becomes `None`.
pub fn date_or_none<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => parse_calendar_date(&s),
        _ => None,
    })
}

/// Normalise a client date to a calendar date.
///
/// RFC 3339 timestamps are converted to UTC first, so
/// `2024-05-01T20:00:00-05:00` is `2024-05-02`.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc).date_naive());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.date())
}
