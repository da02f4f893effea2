//! Widget types and the option bag handed to form widgets.

use crate::admin::{FieldDescription, ModelManager};
use std::collections::btree_map::{self, BTreeMap};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Form widget selected for a field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WidgetType {
    /// Choice among documents of the target class
    Model,
    /// Single document picked from a list popup
    ModelList,
    /// Form of the nested admin, embedded inline
    Admin,
    /// Editable collection of nested admin forms
    Collection,
    /// Any other widget; gets the base options only
    Other(String),
}

impl WidgetType {
    pub fn as_str(&self) -> &str {
        match self {
            WidgetType::Model => "sonata_type_model",
            WidgetType::ModelList => "sonata_type_model_list",
            WidgetType::Admin => "sonata_type_admin",
            WidgetType::Collection => "sonata_type_collection",
            WidgetType::Other(name) => name,
        }
    }
}

impl From<&str> for WidgetType {
    fn from(value: &str) -> Self {
        let short = value.strip_prefix("sonata_type_").unwrap_or(value);
        match short {
            "model" => WidgetType::Model,
            "model_list" => WidgetType::ModelList,
            "admin" => WidgetType::Admin,
            "collection" => WidgetType::Collection,
            _ => WidgetType::Other(value.to_string()),
        }
    }
}

impl FromStr for WidgetType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(WidgetType::from(s))
    }
}

impl fmt::Display for WidgetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single widget option.
#[derive(Debug, Clone)]
pub enum OptionValue<'a> {
    Null,
    Bool(bool),
    String(String),
    FieldDescription(&'a FieldDescription),
    ModelManager(Arc<dyn ModelManager>),
    Bag(OptionBag<'a>),
}

impl<'a> OptionValue<'a> {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_field_description(&self) -> Option<&'a FieldDescription> {
        match self {
            OptionValue::FieldDescription(description) => Some(*description),
            _ => None,
        }
    }

    pub fn as_model_manager(&self) -> Option<&Arc<dyn ModelManager>> {
        match self {
            OptionValue::ModelManager(manager) => Some(manager),
            _ => None,
        }
    }

    pub fn as_bag(&self) -> Option<&OptionBag<'a>> {
        match self {
            OptionValue::Bag(bag) => Some(bag),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, OptionValue::Null)
    }
}

impl From<bool> for OptionValue<'_> {
    fn from(value: bool) -> Self {
        OptionValue::Bool(value)
    }
}

impl From<&str> for OptionValue<'_> {
    fn from(value: &str) -> Self {
        OptionValue::String(value.to_string())
    }
}

impl From<Option<&str>> for OptionValue<'_> {
    fn from(value: Option<&str>) -> Self {
        value.map_or(OptionValue::Null, OptionValue::from)
    }
}

/// Options passed to a widget constructor, keyed by option name.
#[derive(Debug, Clone, Default)]
pub struct OptionBag<'a> {
    entries: BTreeMap<String, OptionValue<'a>>,
}

impl<'a> OptionBag<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<OptionValue<'a>>) {
        self.entries.insert(name.into(), value.into());
    }

    pub fn entry(
        &mut self,
        name: impl Into<String>,
    ) -> btree_map::Entry<'_, String, OptionValue<'a>> {
        self.entries.entry(name.into())
    }

    pub fn get(&self, name: &str) -> Option<&OptionValue<'a>> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl<'a> From<OptionBag<'a>> for OptionValue<'a> {
    fn from(value: OptionBag<'a>) -> Self {
        OptionValue::Bag(value)
    }
}

impl<'a> From<&'a FieldDescription> for OptionValue<'a> {
    fn from(value: &'a FieldDescription) -> Self {
        OptionValue::FieldDescription(value)
    }
}

impl From<Arc<dyn ModelManager>> for OptionValue<'_> {
    fn from(value: Arc<dyn ModelManager>) -> Self {
        OptionValue::ModelManager(value)
    }
}
