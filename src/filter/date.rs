//! Date and date-range filters.
//!
//! The same engine backs four filters. Range filters take a `start`/`end`
//! pair and default to an inclusive BETWEEN; single-value filters default to
//! EQUAL. Date-only filters treat EQUAL as "anywhere on that day" so that
//! stored times do not cause misses.

use crate::filter::data::{FilterData, FilterInput, ScalarValue};
use crate::filter::query::{Condition, Operator, ProxyQuery};
use crate::filter::types::{DateRangeType, DateType};
use crate::filter::{
    Filter, FilterOptions, FilterOutcome, RenderSettings, WhereClauses, DEFAULT_INPUT_TYPE,
};
use chrono::{Days, NaiveDateTime};
use log::debug;
use serde_json::{Map, Value as JsonValue};
use std::fmt;
use std::str::FromStr;

/// Widget name the date filters are rendered with, before suffixes.
pub const DATE_FILTER_WIDGET: &str = "sonata_type_filter_date";

/// Which of the date filters an instance is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateFilterKind {
    Date,
    DateRange,
    DateTime,
    DateTimeRange,
}

impl DateFilterKind {
    /// Accepts a `start`/`end` pair
    pub fn is_range(self) -> bool {
        matches!(self, DateFilterKind::DateRange | DateFilterKind::DateTimeRange)
    }

    /// Compares full date-times rather than days
    pub fn is_time(self) -> bool {
        matches!(self, DateFilterKind::DateTime | DateFilterKind::DateTimeRange)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DateFilterKind::Date => "date",
            DateFilterKind::DateRange => "date-range",
            DateFilterKind::DateTime => "datetime",
            DateFilterKind::DateTimeRange => "datetime-range",
        }
    }
}

impl FromStr for DateFilterKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.replace('_', "-").as_str() {
            "date" => Ok(DateFilterKind::Date),
            "date-range" => Ok(DateFilterKind::DateRange),
            "datetime" => Ok(DateFilterKind::DateTime),
            "datetime-range" => Ok(DateFilterKind::DateTimeRange),
            _ => Err(format!("Unknown date filter kind: {}", s)),
        }
    }
}

impl fmt::Display for DateFilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filter on a date field.
#[derive(Debug, Clone, PartialEq)]
pub struct DateFilter {
    name: String,
    kind: DateFilterKind,
    options: FilterOptions,
}

impl DateFilter {
    pub fn new(name: impl Into<String>, kind: DateFilterKind, options: FilterOptions) -> Self {
        Self {
            name: name.into(),
            kind,
            options,
        }
    }

    pub fn date(name: impl Into<String>) -> Self {
        Self::new(name, DateFilterKind::Date, FilterOptions::default())
    }

    pub fn date_range(name: impl Into<String>) -> Self {
        Self::new(name, DateFilterKind::DateRange, FilterOptions::default())
    }

    pub fn datetime(name: impl Into<String>) -> Self {
        Self::new(name, DateFilterKind::DateTime, FilterOptions::default())
    }

    pub fn datetime_range(name: impl Into<String>) -> Self {
        Self::new(name, DateFilterKind::DateTimeRange, FilterOptions::default())
    }

    pub fn with_options(mut self, options: FilterOptions) -> Self {
        self.options = options;
        self
    }

    pub fn kind(&self) -> DateFilterKind {
        self.kind
    }

    /// Operator for a single-value comparison tag. Unknown tags compare for
    /// equality.
    pub fn operator_for(tag: i64) -> Operator {
        match DateType::from_tag(tag) {
            Some(DateType::GreaterEqual) => Operator::Gte,
            Some(DateType::GreaterThan) => Operator::Gt,
            Some(DateType::LessEqual) => Operator::Lte,
            Some(DateType::LessThan) => Operator::Lt,
            Some(DateType::Equal) | Some(DateType::Null) | Some(DateType::NotNull) | None => {
                Operator::Equals
            }
        }
    }

    fn filter_range(
        &self,
        clauses: &mut WhereClauses<'_>,
        field: &str,
        value: &FilterInput,
        comparison: Option<i64>,
    ) {
        let FilterInput::Range {
            start: Some(start),
            end: Some(end),
        } = value
        else {
            debug!("Skipping range filter on '{}': start or end missing", field);
            return;
        };

        if start.is_empty() {
            debug!("Skipping range filter on '{}': empty start", field);
            return;
        }

        let (start, end) = if self.options.is_timestamp_input() {
            (start.to_timestamp(), end.to_timestamp())
        } else {
            (start.clone(), end.clone())
        };

        let comparison = comparison.unwrap_or(DateRangeType::Between.tag());

        if DateRangeType::from_tag(comparison) == Some(DateRangeType::NotBetween) {
            clauses.set_condition(Condition::Or);
            clauses.apply_where(field, Self::operator_for(DateType::LessThan.tag()), start);
            if !end.is_empty() {
                clauses.apply_where(field, Self::operator_for(DateType::GreaterThan.tag()), end);
            }
        } else {
            clauses.set_condition(Condition::And);
            clauses.apply_where(field, Self::operator_for(DateType::GreaterEqual.tag()), start);
            if !end.is_empty() {
                clauses.apply_where(field, Self::operator_for(DateType::LessEqual.tag()), end);
            }
        }
    }

    fn filter_single(
        &self,
        clauses: &mut WhereClauses<'_>,
        field: &str,
        value: &FilterInput,
        comparison: Option<i64>,
    ) {
        if value.is_empty() {
            debug!("Skipping date filter on '{}': empty value", field);
            return;
        }

        let comparison = comparison.unwrap_or(DateType::Equal.tag());

        match DateType::from_tag(comparison) {
            Some(DateType::Null) => {
                clauses.apply_where(field, Operator::Exists, ScalarValue::Bool(false));
            }
            Some(DateType::NotNull) => {
                clauses.apply_where(field, Operator::Exists, ScalarValue::Bool(true));
            }
            ty => {
                let Some(date) = value.as_datetime() else {
                    debug!("Skipping date filter on '{}': value is not a date", field);
                    return;
                };

                if !self.kind.is_time() && ty == Some(DateType::Equal) {
                    self.apply_day(clauses, field, date);
                } else {
                    // Single values are stored as timestamps unless the field
                    // itself is declared as one.
                    let value = if self.options.is_timestamp_input() {
                        ScalarValue::DateTime(date)
                    } else {
                        ScalarValue::DateTime(date).to_timestamp()
                    };
                    clauses.apply_where(field, Self::operator_for(comparison), value);
                }
            }
        }
    }

    /// Match anywhere within the calendar day starting at `day`.
    fn apply_day(&self, clauses: &mut WhereClauses<'_>, field: &str, day: NaiveDateTime) {
        let Some(next_day) = day.checked_add_days(Days::new(1)) else {
            debug!("Skipping date filter on '{}': {} has no next day", field, day);
            return;
        };

        let (selected, next) = if self.options.is_timestamp_input() {
            (
                ScalarValue::DateTime(day).to_timestamp(),
                ScalarValue::DateTime(next_day).to_timestamp(),
            )
        } else {
            (ScalarValue::DateTime(day), ScalarValue::DateTime(next_day))
        };

        clauses.set_condition(Condition::And);
        clauses.apply_where(field, Operator::Gte, selected);
        clauses.apply_where(field, Operator::Lt, next);
    }
}

impl Filter for DateFilter {
    fn name(&self) -> &str {
        &self.name
    }

    fn options(&self) -> &FilterOptions {
        &self.options
    }

    fn filter(
        &self,
        query: &mut dyn ProxyQuery,
        field: &str,
        data: Option<&FilterData>,
    ) -> FilterOutcome {
        let mut clauses = WhereClauses::new(query);

        let Some(data) = data else {
            debug!("Skipping date filter on '{}': no data submitted", field);
            return clauses.finish();
        };
        let Some(value) = &data.value else {
            debug!("Skipping date filter on '{}': no value submitted", field);
            return clauses.finish();
        };

        if self.kind.is_range() {
            self.filter_range(&mut clauses, field, value, data.comparison);
        } else {
            self.filter_single(&mut clauses, field, value, data.comparison);
        }

        clauses.finish()
    }

    fn default_options(&self) -> Map<String, JsonValue> {
        let mut options = Map::new();
        options.insert(
            "input_type".to_string(),
            JsonValue::String(DEFAULT_INPUT_TYPE.to_string()),
        );
        options
    }

    fn render_settings(&self) -> RenderSettings {
        let mut widget = DATE_FILTER_WIDGET.to_string();
        if self.kind.is_time() {
            widget.push_str("time");
        }
        if self.kind.is_range() {
            widget.push_str("_range");
        }

        RenderSettings {
            widget,
            field_type: self.field_type().to_string(),
            field_options: self.options.field_options.clone(),
            label: self.label().to_string(),
        }
    }
}
