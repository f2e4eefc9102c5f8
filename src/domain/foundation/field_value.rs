//! Typed runtime values held in a session's field store.

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Declared type of a field definition.
///
/// Drives parameter-binding conversion and SQL literal formatting; runtime
/// values are otherwise free to hold whatever an action produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    Text,
    Integer,
    Boolean,
    DateTime,
}

/// A runtime field value.
///
/// Absence from the field store is the null value; `FieldValue` itself has no
/// null variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Decimal(Decimal),
    Boolean(bool),
    Timestamp(DateTime<Utc>),
}

impl FieldValue {
    /// Renders the value as display text.
    ///
    /// This is the text the comparison operators, concatenation, and screen
    /// rendering all see; timestamps use the fixed `YYYY-MM-DD HH:MM:SS`
    /// terminal format.
    pub fn render(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Integer(i) => i.to_string(),
            FieldValue::Decimal(d) => d.to_string(),
            FieldValue::Boolean(b) => b.to_string(),
            FieldValue::Timestamp(ts) => ts.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    /// Attempts a numeric view of the value.
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            FieldValue::Integer(i) => Some(Decimal::from(*i)),
            FieldValue::Decimal(d) => Some(*d),
            FieldValue::Text(s) => Decimal::from_str(s.trim()).ok(),
            FieldValue::Boolean(_) | FieldValue::Timestamp(_) => None,
        }
    }

    /// Attempts a boolean view of the value.
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            FieldValue::Boolean(b) => Some(*b),
            FieldValue::Integer(i) => Some(*i != 0),
            FieldValue::Text(s) => {
                let t = s.trim();
                if t.eq_ignore_ascii_case("true") {
                    Some(true)
                } else if t.eq_ignore_ascii_case("false") {
                    Some(false)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Converts the value toward a field's declared type.
    ///
    /// Conversion is tolerant: a value that cannot be represented in the
    /// target type passes through unchanged rather than failing, so parameter
    /// binding never aborts a process over a formatting mismatch.
    pub fn coerce(self, target: FieldType) -> FieldValue {
        match target {
            FieldType::Text => FieldValue::Text(self.render()),
            FieldType::Integer => {
                if matches!(self, FieldValue::Integer(_)) {
                    return self;
                }
                match self.render().trim().parse::<i64>() {
                    Ok(i) => FieldValue::Integer(i),
                    Err(_) => self,
                }
            }
            FieldType::Boolean => match self.as_boolean() {
                Some(b) => FieldValue::Boolean(b),
                None => self,
            },
            FieldType::DateTime => {
                if matches!(self, FieldValue::Timestamp(_)) {
                    return self;
                }
                let parsed = match &self {
                    FieldValue::Text(s) => parse_timestamp(s),
                    _ => None,
                };
                match parsed {
                    Some(ts) => FieldValue::Timestamp(ts),
                    None => self,
                }
            }
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Integer(i)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Boolean(b)
    }
}

impl From<Decimal> for FieldValue {
    fn from(d: Decimal) -> Self {
        FieldValue::Decimal(d)
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let t = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(t) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(t, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}
