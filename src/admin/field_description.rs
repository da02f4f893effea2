//! Field descriptions.

use crate::admin::Admin;
use crate::mapping::{FieldMapping, MappingType};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Metadata describing one form or filter field.
#[derive(Debug, Clone, Default)]
pub struct FieldDescription {
    name: String,
    field_type: Option<String>,
    field_mapping: Option<FieldMapping>,
    association_mapping: Option<FieldMapping>,
    mapping_type: Option<MappingType>,
    target_entity: Option<String>,
    admin: Option<Arc<dyn Admin>>,
    association_admin: Option<Arc<dyn Admin>>,
    options: BTreeMap<String, JsonValue>,
}

impl FieldDescription {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Create a field description with a widget-type tag already set.
    pub fn with_type(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        let mut description = Self::new(name);
        description.set_type(field_type);
        description
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Widget-type tag; an empty tag counts as unset.
    pub fn field_type(&self) -> Option<&str> {
        self.field_type.as_deref().filter(|t| !t.is_empty())
    }

    pub fn set_type(&mut self, field_type: impl Into<String>) {
        self.field_type = Some(field_type.into());
    }

    pub fn field_mapping(&self) -> Option<&FieldMapping> {
        self.field_mapping.as_ref()
    }

    /// Attach the mapper's field mapping. The mapping type is only taken
    /// from it when none is known yet.
    pub fn set_field_mapping(&mut self, mapping: FieldMapping) {
        if self.mapping_type.is_none() {
            self.mapping_type = Some(mapping.mapping_type.clone());
        }
        self.field_mapping = Some(mapping);
    }

    pub fn association_mapping(&self) -> Option<&FieldMapping> {
        self.association_mapping.as_ref()
    }

    pub fn set_association_mapping(&mut self, mapping: FieldMapping) {
        self.mapping_type = Some(mapping.mapping_type.clone());
        self.association_mapping = Some(mapping);
    }

    pub fn mapping_type(&self) -> Option<&MappingType> {
        self.mapping_type.as_ref()
    }

    /// Target class of the association: the explicit value if one was set,
    /// otherwise the association mapping's target document.
    pub fn target_entity(&self) -> Option<&str> {
        self.target_entity.as_deref().or_else(|| {
            self.association_mapping
                .as_ref()
                .and_then(|m| m.target_document.as_deref())
        })
    }

    pub fn set_target_entity(&mut self, target: impl Into<String>) {
        self.target_entity = Some(target.into());
    }

    pub fn admin(&self) -> Option<&Arc<dyn Admin>> {
        self.admin.as_ref()
    }

    pub fn set_admin(&mut self, admin: Arc<dyn Admin>) {
        self.admin = Some(admin);
    }

    /// Nested admin managing the association's target class
    pub fn association_admin(&self) -> Option<&Arc<dyn Admin>> {
        self.association_admin.as_ref()
    }

    pub fn set_association_admin(&mut self, admin: Arc<dyn Admin>) {
        self.association_admin = Some(admin);
    }

    pub fn options(&self) -> &BTreeMap<String, JsonValue> {
        &self.options
    }

    pub fn option(&self, name: &str) -> Option<&JsonValue> {
        self.options.get(name)
    }

    /// The option as a string slice, if it is set to a string.
    pub fn option_str(&self, name: &str) -> Option<&str> {
        self.option(name).and_then(JsonValue::as_str)
    }

    pub fn set_option(&mut self, name: impl Into<String>, value: impl Into<JsonValue>) {
        self.options.insert(name.into(), value.into());
    }

    /// Set `name` to `default` unless a value is already present.
    pub fn default_option(&mut self, name: impl Into<String>, default: impl Into<JsonValue>) {
        self.options
            .entry(name.into())
            .or_insert_with(|| default.into());
    }
}
