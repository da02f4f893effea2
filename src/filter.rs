//! Datagrid filters for document queries.
//!
//! A filter turns the value a user submitted in the list view into
//! predicates on a [`ProxyQuery`]. Each call works on its own
//! [`WhereClauses`] accumulator, so a filter holds nothing but its
//! configuration and can be shared between requests.

use log::trace;
use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};

pub mod data;
pub mod date;
pub mod query;
pub mod types;

pub use data::{FilterData, FilterInput, ScalarValue};
pub use date::{DateFilter, DateFilterKind};
pub use query::{Condition, Operator, Predicate, ProxyQuery, QueryDocument};
pub use types::{DateRangeType, DateType};

/// Default `input_type` option.
pub const DEFAULT_INPUT_TYPE: &str = "datetime";

/// Configuration of a filter.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FilterOptions {
    /// `"timestamp"` when the field stores epoch seconds
    pub input_type: String,
    /// Document field to filter on; defaults to the filter name
    pub field_name: Option<String>,
    /// Form type used to render the value widget
    pub field_type: Option<String>,
    pub field_options: Map<String, JsonValue>,
    pub label: Option<String>,
}

impl FilterOptions {
    pub fn is_timestamp_input(&self) -> bool {
        self.input_type == "timestamp"
    }
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            input_type: DEFAULT_INPUT_TYPE.to_string(),
            field_name: None,
            field_type: None,
            field_options: Map::new(),
            label: None,
        }
    }
}

/// Widget and options the filter form is rendered with.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    pub widget: String,
    pub field_type: String,
    pub field_options: Map<String, JsonValue>,
    pub label: String,
}

/// What a single `filter` call contributed to the query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterOutcome {
    predicates: usize,
}

impl FilterOutcome {
    /// True once at least one predicate was appended.
    pub fn is_active(&self) -> bool {
        self.predicates > 0
    }

    pub fn predicate_count(&self) -> usize {
        self.predicates
    }
}

/// Per-call accumulator attaching predicates to a query.
pub struct WhereClauses<'q> {
    query: &'q mut dyn ProxyQuery,
    condition: Condition,
    appended: usize,
}

impl<'q> WhereClauses<'q> {
    pub fn new(query: &'q mut dyn ProxyQuery) -> Self {
        Self {
            query,
            condition: Condition::default(),
            appended: 0,
        }
    }

    pub fn condition(&self) -> Condition {
        self.condition
    }

    /// Select how the following predicates are attached.
    pub fn set_condition(&mut self, condition: Condition) {
        self.condition = condition;
    }

    /// Attach `field <operator> value` using the current condition.
    pub fn apply_where(&mut self, field: &str, operator: Operator, value: ScalarValue) {
        let predicate = self.query.comparison(field, operator, value);
        trace!("Appending {:?} predicate: {}", self.condition, predicate);

        match self.condition {
            Condition::Or => self.query.add_or(predicate),
            Condition::And => self.query.add_and(predicate),
        }
        self.appended += 1;
    }

    pub fn finish(self) -> FilterOutcome {
        FilterOutcome {
            predicates: self.appended,
        }
    }
}

/// A filter over one document field.
pub trait Filter {
    fn name(&self) -> &str;

    fn options(&self) -> &FilterOptions;

    /// Document field the filter applies to.
    fn field_name(&self) -> &str {
        self.options().field_name.as_deref().unwrap_or(self.name())
    }

    fn label(&self) -> &str {
        self.options().label.as_deref().unwrap_or(self.name())
    }

    fn field_type(&self) -> &str {
        self.options().field_type.as_deref().unwrap_or("text")
    }

    /// Translate `data` into predicates on `field`.
    ///
    /// Missing or malformed data is not an error: nothing is appended and the
    /// outcome stays inactive.
    fn filter(
        &self,
        query: &mut dyn ProxyQuery,
        field: &str,
        data: Option<&FilterData>,
    ) -> FilterOutcome;

    /// Filter on [`Filter::field_name`].
    fn apply(&self, query: &mut dyn ProxyQuery, data: Option<&FilterData>) -> FilterOutcome {
        self.filter(query, self.field_name(), data)
    }

    fn default_options(&self) -> Map<String, JsonValue>;

    fn render_settings(&self) -> RenderSettings;
}
