//! Document-mapper metadata.
//!
//! A [`ClassMetadata`] describes how the fields of one document class are
//! stored. The admin layer only reads it: the mapping type decides whether a
//! field needs a nested admin, and the target document names the class an
//! association points at.

use crate::admin::ModelManager;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// How a field is mapped in the stored document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MappingType {
    /// Single referenced or embedded document
    One,
    /// Collection of referenced or embedded documents
    Many,
    /// Plain field (`string`, `date`, `int`, ...)
    Field(String),
}

impl MappingType {
    pub fn as_str(&self) -> &str {
        match self {
            MappingType::One => "one",
            MappingType::Many => "many",
            MappingType::Field(name) => name,
        }
    }

    /// True for `one` and `many` mappings.
    pub fn is_association(&self) -> bool {
        matches!(self, MappingType::One | MappingType::Many)
    }
}

impl From<&str> for MappingType {
    fn from(value: &str) -> Self {
        match value {
            "one" => MappingType::One,
            "many" => MappingType::Many,
            other => MappingType::Field(other.to_string()),
        }
    }
}

impl From<String> for MappingType {
    fn from(value: String) -> Self {
        MappingType::from(value.as_str())
    }
}

impl From<MappingType> for String {
    fn from(value: MappingType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for MappingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mapping descriptor for a single field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMapping {
    pub field_name: String,
    #[serde(rename = "type")]
    pub mapping_type: MappingType,
    #[serde(default)]
    pub target_document: Option<String>,
    #[serde(default)]
    pub reference: bool,
    #[serde(default)]
    pub embedded: bool,
}

impl FieldMapping {
    pub fn new(field_name: impl Into<String>, mapping_type: impl Into<MappingType>) -> Self {
        Self {
            field_name: field_name.into(),
            mapping_type: mapping_type.into(),
            target_document: None,
            reference: false,
            embedded: false,
        }
    }

    /// Reference to a single document of `target`.
    pub fn reference_one(field_name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            target_document: Some(target.into()),
            reference: true,
            ..Self::new(field_name, MappingType::One)
        }
    }

    /// Reference to many documents of `target`.
    pub fn reference_many(field_name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            target_document: Some(target.into()),
            reference: true,
            ..Self::new(field_name, MappingType::Many)
        }
    }

    /// Embedded collection of `target` documents.
    pub fn embed_many(field_name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            target_document: Some(target.into()),
            embedded: true,
            ..Self::new(field_name, MappingType::Many)
        }
    }
}

/// Mapping metadata for a document class.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassMetadata {
    pub name: String,
    #[serde(default)]
    pub field_mappings: HashMap<String, FieldMapping>,
}

impl ClassMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_mappings: HashMap::new(),
        }
    }

    /// Add a field mapping, keyed by its field name.
    pub fn with_mapping(mut self, mapping: FieldMapping) -> Self {
        self.field_mappings
            .insert(mapping.field_name.clone(), mapping);
        self
    }

    pub fn field_mapping(&self, field_name: &str) -> Option<&FieldMapping> {
        self.field_mappings.get(field_name)
    }
}

/// In-memory model manager backed by a map of class metadata.
#[derive(Debug, Default)]
pub struct MetadataCatalog {
    classes: HashMap<String, Arc<ClassMetadata>>,
}

impl MetadataCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from a list of metadata records.
    pub fn from_classes(classes: impl IntoIterator<Item = ClassMetadata>) -> Self {
        let mut catalog = Self::new();
        for metadata in classes {
            catalog.register(metadata);
        }
        catalog
    }

    /// Register (or replace) the metadata for a class.
    pub fn register(&mut self, metadata: ClassMetadata) {
        self.classes
            .insert(metadata.name.clone(), Arc::new(metadata));
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl ModelManager for MetadataCatalog {
    fn has_metadata(&self, class: &str) -> bool {
        self.classes.contains_key(class)
    }

    fn metadata(&self, class: &str) -> Option<Arc<ClassMetadata>> {
        self.classes.get(class).cloned()
    }
}
