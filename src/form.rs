//! Form building for document-backed admins.
//!
//! This module provides:
//! - The closed set of widget types the contractor knows about
//! - The option bag handed to widget constructors
//! - The form contractor that computes those options

pub mod contractor;
pub mod options;

pub use contractor::{FormContractor, ROOT_FORM_TYPE};
pub use options::{OptionBag, OptionValue, WidgetType};

/// Creates form builders. Implemented by the surrounding form framework.
pub trait FormFactory {
    type Builder;

    /// Create a builder for a form named `name` of type `form_type`.
    fn create_named_builder(
        &self,
        name: &str,
        form_type: &str,
        options: OptionBag<'_>,
    ) -> Self::Builder;
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Factory returning a description of the builder it was asked for
    struct RecordingFactory;

    impl FormFactory for RecordingFactory {
        type Builder = (String, String, Vec<String>);

        fn create_named_builder(
            &self,
            name: &str,
            form_type: &str,
            options: OptionBag<'_>,
        ) -> Self::Builder {
            (
                name.to_string(),
                form_type.to_string(),
                options.keys().map(str::to_string).collect(),
            )
        }
    }

    #[test]
    fn test_form_builder_uses_root_form_type() {
        let contractor = FormContractor::new(RecordingFactory);

        let mut options = OptionBag::new();
        options.insert("csrf_protection", false);

        let (name, form_type, keys) = contractor.form_builder("filter", options);
        assert_eq!(name, "filter");
        assert_eq!(form_type, "form");
        assert_eq!(keys, vec!["csrf_protection"]);
    }
}
