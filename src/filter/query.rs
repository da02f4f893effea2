//! Query-builder abstraction.
//!
//! Filters never talk to a storage backend directly. They build
//! [`Predicate`]s through a [`ProxyQuery`] and hand them back to it, joined
//! either by AND or by OR.

use crate::filter::data::ScalarValue;
use serde::Serialize;
use serde_json::{json, Map, Value as JsonValue};
use std::fmt;

/// Comparison operators a filter can apply to a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    Equals,
    Gte,
    Gt,
    Lte,
    Lt,
    Exists,
}

impl Operator {
    /// Expression-builder method name for this operator
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Equals => "equals",
            Operator::Gte => "gte",
            Operator::Gt => "gt",
            Operator::Lte => "lte",
            Operator::Lt => "lt",
            Operator::Exists => "exists",
        }
    }

    /// Query-document key; `None` for plain equality.
    pub fn document_key(&self) -> Option<&'static str> {
        match self {
            Operator::Equals => None,
            Operator::Gte => Some("$gte"),
            Operator::Gt => Some("$gt"),
            Operator::Lte => Some("$lte"),
            Operator::Lt => Some("$lt"),
            Operator::Exists => Some("$exists"),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Boolean combinator used when a predicate is attached to a query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Condition {
    #[default]
    And,
    Or,
}

/// A single `field <operator> value` comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Predicate {
    pub field: String,
    pub operator: Operator,
    pub value: ScalarValue,
}

impl Predicate {
    pub fn new(field: impl Into<String>, operator: Operator, value: ScalarValue) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
        }
    }

    /// Render as a query document: `{field: value}` for equality,
    /// `{field: {"$op": value}}` otherwise.
    pub fn to_document(&self) -> JsonValue {
        let value = json!(self.value);
        let condition = match self.operator.document_key() {
            Some(key) => {
                let mut condition = Map::new();
                condition.insert(key.to_string(), value);
                JsonValue::Object(condition)
            }
            None => value,
        };

        let mut document = Map::new();
        document.insert(self.field.clone(), condition);
        JsonValue::Object(document)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.field, self.operator, json!(self.value))
    }
}

/// The query a filter appends its predicates to.
pub trait ProxyQuery {
    /// Build the expression `field <operator> value`.
    fn comparison(&self, field: &str, operator: Operator, value: ScalarValue) -> Predicate {
        Predicate::new(field, operator, value)
    }

    fn add_and(&mut self, predicate: Predicate);

    fn add_or(&mut self, predicate: Predicate);
}

/// In-memory query for a document database.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryDocument {
    and: Vec<Predicate>,
    or: Vec<Predicate>,
}

impl QueryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn and_clauses(&self) -> &[Predicate] {
        &self.and
    }

    pub fn or_clauses(&self) -> &[Predicate] {
        &self.or
    }

    /// Total number of predicates attached
    pub fn len(&self) -> usize {
        self.and.len() + self.or.len()
    }

    pub fn is_empty(&self) -> bool {
        self.and.is_empty() && self.or.is_empty()
    }

    /// Render as a filter document with `$and` / `$or` arrays.
    pub fn to_document(&self) -> JsonValue {
        let mut document = Map::new();
        if !self.and.is_empty() {
            document.insert(
                "$and".to_string(),
                self.and.iter().map(Predicate::to_document).collect(),
            );
        }
        if !self.or.is_empty() {
            document.insert(
                "$or".to_string(),
                self.or.iter().map(Predicate::to_document).collect(),
            );
        }
        JsonValue::Object(document)
    }
}

impl ProxyQuery for QueryDocument {
    fn add_and(&mut self, predicate: Predicate) {
        self.and.push(predicate);
    }

    fn add_or(&mut self, predicate: Predicate) {
        self.or.push(predicate);
    }
}
