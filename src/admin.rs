//! Admin-framework collaborators.
//!
//! The admin framework owns the CRUD lifecycle; this crate only needs a
//! narrow view of it: the model manager that answers metadata lookups and
//! the admin that owns a field.

use crate::mapping::ClassMetadata;
use std::fmt;
use std::sync::Arc;

pub mod field_description;

pub use field_description::FieldDescription;

/// Metadata lookup exposed by the admin's model manager.
pub trait ModelManager: fmt::Debug + Send + Sync {
    /// Whether mapping metadata is known for `class`.
    fn has_metadata(&self, class: &str) -> bool;

    /// Mapping metadata for `class`, if any.
    fn metadata(&self, class: &str) -> Option<Arc<ClassMetadata>>;
}

/// An admin managing one document class.
pub trait Admin: fmt::Debug + Send + Sync {
    /// Identifier of the admin itself, used in diagnostics
    fn name(&self) -> &str;

    /// The document class managed by this admin
    fn class(&self) -> &str;

    /// Metadata source for the managed class and its associations
    fn model_manager(&self) -> Arc<dyn ModelManager>;

    /// Attach the nested admin responsible for the field's target class.
    fn attach_admin_class(&self, field_description: &mut FieldDescription);
}
