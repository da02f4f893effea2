//! Submitted filter data.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use serde_json::Value as JsonValue;

/// A single submitted value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    DateTime(NaiveDateTime),
}

impl ScalarValue {
    /// Whether the form layer would treat this value as "not filled in".
    ///
    /// Null, `false`, zero, `""` and `"0"` are empty; a date never is.
    pub fn is_empty(&self) -> bool {
        match self {
            ScalarValue::Null => true,
            ScalarValue::Bool(b) => !b,
            ScalarValue::Int(i) => *i == 0,
            ScalarValue::Float(f) => *f == 0.0,
            ScalarValue::String(s) => s.is_empty() || s == "0",
            ScalarValue::DateTime(_) => false,
        }
    }

    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            ScalarValue::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    /// Epoch seconds for a date, `0` for anything else.
    pub fn to_timestamp(&self) -> ScalarValue {
        ScalarValue::Int(self.as_datetime().map_or(0, |dt| dt.and_utc().timestamp()))
    }

    /// Convert a JSON value. Strings holding an ISO date or date-time become
    /// dates; arrays and objects are kept as their JSON text.
    pub fn from_json(value: &JsonValue) -> Self {
        match value {
            JsonValue::Null => ScalarValue::Null,
            JsonValue::Bool(b) => ScalarValue::Bool(*b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => ScalarValue::Int(i),
                None => ScalarValue::Float(n.as_f64().unwrap_or_default()),
            },
            JsonValue::String(s) => parse_datetime(s)
                .map(ScalarValue::DateTime)
                .unwrap_or_else(|| ScalarValue::String(s.clone())),
            JsonValue::Array(items) if items.is_empty() => ScalarValue::Null,
            other => ScalarValue::String(other.to_string()),
        }
    }
}

fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.naive_utc())
        .ok()
        .or_else(|| s.parse::<NaiveDateTime>().ok())
        .or_else(|| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

impl From<NaiveDateTime> for ScalarValue {
    fn from(value: NaiveDateTime) -> Self {
        ScalarValue::DateTime(value)
    }
}

impl From<bool> for ScalarValue {
    fn from(value: bool) -> Self {
        ScalarValue::Bool(value)
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        ScalarValue::Int(value)
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        ScalarValue::String(value.to_string())
    }
}

/// The `value` part of a submission: a scalar, or a `start`/`end` record
/// whose keys may each be missing.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterInput {
    Scalar(ScalarValue),
    Range {
        start: Option<ScalarValue>,
        end: Option<ScalarValue>,
    },
}

impl FilterInput {
    pub fn range(start: impl Into<ScalarValue>, end: impl Into<ScalarValue>) -> Self {
        FilterInput::Range {
            start: Some(start.into()),
            end: Some(end.into()),
        }
    }

    /// A scalar is empty by [`ScalarValue::is_empty`]; a record only when it
    /// has no keys at all.
    pub fn is_empty(&self) -> bool {
        match self {
            FilterInput::Scalar(value) => value.is_empty(),
            FilterInput::Range { start, end } => start.is_none() && end.is_none(),
        }
    }

    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            FilterInput::Scalar(value) => value.as_datetime(),
            FilterInput::Range { .. } => None,
        }
    }

    pub fn from_json(value: &JsonValue) -> Self {
        match value {
            JsonValue::Object(map) => FilterInput::Range {
                start: map.get("start").map(ScalarValue::from_json),
                end: map.get("end").map(ScalarValue::from_json),
            },
            other => FilterInput::Scalar(ScalarValue::from_json(other)),
        }
    }
}

impl From<ScalarValue> for FilterInput {
    fn from(value: ScalarValue) -> Self {
        FilterInput::Scalar(value)
    }
}

impl From<NaiveDateTime> for FilterInput {
    fn from(value: NaiveDateTime) -> Self {
        FilterInput::Scalar(value.into())
    }
}

impl From<&str> for FilterInput {
    fn from(value: &str) -> Self {
        FilterInput::Scalar(value.into())
    }
}

/// Data submitted for one filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterData {
    /// The submitted value; `None` when the `value` key is missing
    pub value: Option<FilterInput>,
    /// Numeric comparison tag, when one was submitted
    pub comparison: Option<i64>,
}

impl FilterData {
    pub fn new(value: impl Into<FilterInput>) -> Self {
        Self {
            value: Some(value.into()),
            comparison: None,
        }
    }

    pub fn with_comparison(mut self, tag: i64) -> Self {
        self.comparison = Some(tag);
        self
    }

    /// Read a submission from JSON. Anything but an object yields `None`.
    ///
    /// `type` is accepted as a number or a numeric string; any other value
    /// is ignored.
    pub fn from_json(data: &JsonValue) -> Option<Self> {
        let map = data.as_object()?;

        Some(Self {
            value: map.get("value").map(FilterInput::from_json),
            comparison: map.get("type").and_then(numeric_tag),
        })
    }
}

/// Tag recorded for a numeric `type` with a fractional part. No comparison
/// uses it, so range filters fall back to between and single values to
/// equality.
pub const UNMATCHED_TAG: i64 = i64::MIN;

fn numeric_tag(value: &JsonValue) -> Option<i64> {
    let number = match value {
        JsonValue::Number(n) => match n.as_i64() {
            Some(tag) => return Some(tag),
            None => n.as_f64()?,
        },
        JsonValue::String(s) => {
            let s = s.trim();
            if let Ok(tag) = s.parse::<i64>() {
                return Some(tag);
            }
            s.parse::<f64>().ok().filter(|f| f.is_finite())?
        }
        _ => return None,
    };

    if number.fract() == 0.0 && number >= i64::MIN as f64 && number < i64::MAX as f64 {
        Some(number as i64)
    } else {
        Some(UNMATCHED_TAG)
    }
}
