//! Form contractor.
//!
//! Fills in the defaults a field description needs before a form can be
//! built for it, and computes the options handed to the widget the field is
//! rendered with.

use crate::admin::{Admin, FieldDescription};
use crate::error::{AdminResult, ConfigurationError};
use crate::form::{FormFactory, OptionBag, OptionValue, WidgetType};
use crate::mapping::MappingType;
use log::{debug, warn};
use std::sync::Arc;

/// Root form type used by [`FormContractor::form_builder`].
pub const ROOT_FORM_TYPE: &str = "form";

/// Computes form defaults for document-backed admin fields.
pub struct FormContractor<F> {
    form_factory: F,
}

impl<F> FormContractor<F> {
    pub fn new(form_factory: F) -> Self {
        Self { form_factory }
    }

    pub fn form_factory(&self) -> &F {
        &self.form_factory
    }

    /// Attach mapping metadata, the owning admin and default options to
    /// `field_description`.
    ///
    /// Fails when the description has no widget type; everything else is
    /// filled in with defaults.
    pub fn fix_field_description(
        &self,
        admin: &Arc<dyn Admin>,
        field_description: &mut FieldDescription,
    ) -> AdminResult<()> {
        let model_manager = admin.model_manager();
        if model_manager.has_metadata(admin.class()) {
            let mapping = model_manager
                .metadata(admin.class())
                .and_then(|metadata| metadata.field_mapping(field_description.name()).cloned());

            if let Some(mapping) = mapping {
                // The mapper keeps associations in the field mappings too
                field_description.set_field_mapping(mapping.clone());
                field_description.set_association_mapping(mapping);
            }
        }

        if field_description.field_type().is_none() {
            return Err(ConfigurationError::MissingFieldType {
                field: field_description.name().to_string(),
                admin: admin.name().to_string(),
            });
        }

        field_description.set_admin(Arc::clone(admin));
        field_description.default_option("edit", "standard");

        if field_description
            .mapping_type()
            .is_some_and(MappingType::is_association)
        {
            debug!(
                "Attaching nested admin for field '{}' of '{}'",
                field_description.name(),
                admin.class()
            );
            admin.attach_admin_class(field_description);
        }

        Ok(())
    }

    /// Options for the widget `widget_type` rendering `field_description`.
    pub fn default_options<'a>(
        &self,
        widget_type: &WidgetType,
        field_description: &'a FieldDescription,
    ) -> AdminResult<OptionBag<'a>> {
        let mut options = OptionBag::new();
        options.insert("field_description", field_description);

        match widget_type {
            WidgetType::Model => {
                insert_model_options(&mut options, field_description);

                if field_description.mapping_type() == Some(&MappingType::Many) {
                    options.insert("multiple", true);
                }

                if field_description.option_str("edit") == Some("list") {
                    options
                        .entry("required")
                        .or_insert(OptionValue::Bool(false));
                }
            }
            WidgetType::ModelList => {
                insert_model_options(&mut options, field_description);
            }
            WidgetType::Admin => {
                association_admin(field_description)?;
            }
            WidgetType::Collection => {
                let nested = association_admin(field_description)?;

                let mut type_options = OptionBag::new();
                type_options.insert("field_description", field_description);
                type_options.insert("data_class", nested.class());

                options.insert("type", "admin");
                options.insert("modifiable", true);
                options.insert("type_options", type_options);
            }
            WidgetType::Other(_) => {}
        }

        Ok(options)
    }
}

impl<F: FormFactory> FormContractor<F> {
    /// Create a named builder of the root form type.
    pub fn form_builder(&self, name: &str, options: OptionBag<'_>) -> F::Builder {
        self.form_factory
            .create_named_builder(name, ROOT_FORM_TYPE, options)
    }
}

fn insert_model_options<'a>(options: &mut OptionBag<'a>, field_description: &'a FieldDescription) {
    options.insert("class", field_description.target_entity());

    match field_description.admin() {
        Some(admin) => options.insert("model_manager", admin.model_manager()),
        None => warn!(
            "Field '{}' has no admin; model_manager option left unset",
            field_description.name()
        ),
    }
}

fn association_admin(field_description: &FieldDescription) -> AdminResult<&Arc<dyn Admin>> {
    field_description.association_admin().ok_or_else(|| {
        ConfigurationError::MissingAssociationAdmin {
            field: field_description.name().to_string(),
            target_entity: field_description
                .target_entity()
                .unwrap_or_default()
                .to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::ModelManager;
    use crate::mapping::{ClassMetadata, FieldMapping, MetadataCatalog};
    use std::sync::Mutex;

    /// Admin double recording which fields asked for a nested admin
    #[derive(Debug)]
    struct MockAdmin {
        class: String,
        model_manager: Arc<dyn ModelManager>,
        nested: Option<Arc<dyn Admin>>,
        attached: Mutex<Vec<String>>,
    }

    impl MockAdmin {
        fn new(class: &str, model_manager: Arc<dyn ModelManager>) -> Self {
            Self {
                class: class.to_string(),
                model_manager,
                nested: None,
                attached: Mutex::new(Vec::new()),
            }
        }
    }

    impl Admin for MockAdmin {
        fn name(&self) -> &str {
            "mock_admin"
        }

        fn class(&self) -> &str {
            &self.class
        }

        fn model_manager(&self) -> Arc<dyn ModelManager> {
            Arc::clone(&self.model_manager)
        }

        fn attach_admin_class(&self, field_description: &mut FieldDescription) {
            self.attached
                .lock()
                .unwrap()
                .push(field_description.name().to_string());
            if let Some(nested) = &self.nested {
                field_description.set_association_admin(Arc::clone(nested));
            }
        }
    }

    fn post_catalog() -> Arc<dyn ModelManager> {
        Arc::new(MetadataCatalog::from_classes([ClassMetadata::new("Post")
            .with_mapping(FieldMapping::new("title", "string"))
            .with_mapping(FieldMapping::reference_one("author", "User"))
            .with_mapping(FieldMapping::reference_many("tags", "Tag"))]))
    }

    fn contractor() -> FormContractor<()> {
        FormContractor::new(())
    }

    #[test]
    fn test_fix_requires_field_type() {
        let admin: Arc<dyn Admin> = Arc::new(MockAdmin::new("Post", post_catalog()));
        let mut description = FieldDescription::new("title");

        let err = contractor()
            .fix_field_description(&admin, &mut description)
            .unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::MissingFieldType {
                field: "title".to_string(),
                admin: "mock_admin".to_string(),
            }
        );
        assert!(description.admin().is_none());
    }

    #[test]
    fn test_fix_copies_mapping_and_defaults() {
        let admin: Arc<dyn Admin> = Arc::new(MockAdmin::new("Post", post_catalog()));
        let mut description = FieldDescription::with_type("title", "text");

        contractor()
            .fix_field_description(&admin, &mut description)
            .unwrap();

        let mapping = description.field_mapping().unwrap();
        assert_eq!(mapping.field_name, "title");
        assert_eq!(description.association_mapping(), Some(mapping));
        assert_eq!(description.option_str("edit"), Some("standard"));
        assert!(description.admin().is_some());
    }

    #[test]
    fn test_fix_keeps_existing_edit_option() {
        let admin: Arc<dyn Admin> = Arc::new(MockAdmin::new("Post", post_catalog()));
        let mut description = FieldDescription::with_type("title", "text");
        description.set_option("edit", "inline");

        contractor()
            .fix_field_description(&admin, &mut description)
            .unwrap();
        assert_eq!(description.option_str("edit"), Some("inline"));
    }

    #[test]
    fn test_fix_attaches_nested_admin_for_associations() {
        let mock = Arc::new(MockAdmin::new("Post", post_catalog()));
        let admin: Arc<dyn Admin> = mock.clone();

        for field in ["title", "author", "tags"] {
            let mut description = FieldDescription::with_type(field, "sonata_type_model");
            contractor()
                .fix_field_description(&admin, &mut description)
                .unwrap();
        }

        assert_eq!(*mock.attached.lock().unwrap(), vec!["author", "tags"]);
    }

    #[test]
    fn test_fix_without_metadata() {
        let admin: Arc<dyn Admin> = Arc::new(MockAdmin::new("Comment", post_catalog()));
        let mut description = FieldDescription::with_type("title", "text");

        contractor()
            .fix_field_description(&admin, &mut description)
            .unwrap();
        assert!(description.field_mapping().is_none());
        assert!(description.mapping_type().is_none());
    }

    #[test]
    fn test_model_options() {
        let admin: Arc<dyn Admin> = Arc::new(MockAdmin::new("Post", post_catalog()));
        let mut tags = FieldDescription::with_type("tags", "sonata_type_model");
        contractor().fix_field_description(&admin, &mut tags).unwrap();

        let options = contractor()
            .default_options(&WidgetType::Model, &tags)
            .unwrap();
        assert!(std::ptr::eq(
            options
                .get("field_description")
                .and_then(OptionValue::as_field_description)
                .unwrap(),
            &tags
        ));
        assert_eq!(options.get("class").and_then(OptionValue::as_str), Some("Tag"));
        assert!(options.get("model_manager").and_then(OptionValue::as_model_manager).is_some());
        assert_eq!(options.get("multiple").and_then(OptionValue::as_bool), Some(true));
        assert!(!options.contains("required"));

        let mut author = FieldDescription::with_type("author", "sonata_type_model");
        contractor().fix_field_description(&admin, &mut author).unwrap();
        let options = contractor()
            .default_options(&WidgetType::Model, &author)
            .unwrap();
        assert!(!options.contains("multiple"));
    }

    #[test]
    fn test_model_options_list_edit() {
        let admin: Arc<dyn Admin> = Arc::new(MockAdmin::new("Post", post_catalog()));
        let mut author = FieldDescription::with_type("author", "sonata_type_model");
        author.set_option("edit", "list");
        contractor().fix_field_description(&admin, &mut author).unwrap();

        let options = contractor()
            .default_options(&WidgetType::Model, &author)
            .unwrap();
        assert_eq!(options.get("required").and_then(OptionValue::as_bool), Some(false));
    }

    #[test]
    fn test_model_list_options() {
        let admin: Arc<dyn Admin> = Arc::new(MockAdmin::new("Post", post_catalog()));
        let mut tags = FieldDescription::with_type("tags", "sonata_type_model_list");
        tags.set_option("edit", "list");
        contractor().fix_field_description(&admin, &mut tags).unwrap();

        let options = contractor()
            .default_options(&WidgetType::ModelList, &tags)
            .unwrap();
        let mut keys: Vec<_> = options.keys().collect();
        keys.sort();
        assert_eq!(keys, vec!["class", "field_description", "model_manager"]);
    }

    #[test]
    fn test_admin_and_collection_require_nested_admin() {
        let mut description = FieldDescription::new("comments");
        description.set_association_mapping(FieldMapping::embed_many("comments", "Comment"));

        for widget in [WidgetType::Admin, WidgetType::Collection] {
            let err = contractor()
                .default_options(&widget, &description)
                .unwrap_err();
            assert_eq!(
                err,
                ConfigurationError::MissingAssociationAdmin {
                    field: "comments".to_string(),
                    target_entity: "Comment".to_string(),
                }
            );
        }
    }

    #[test]
    fn test_collection_options() {
        let nested: Arc<dyn Admin> = Arc::new(MockAdmin::new("Comment", post_catalog()));
        let mut description = FieldDescription::new("comments");
        description.set_association_mapping(FieldMapping::embed_many("comments", "Comment"));
        description.set_association_admin(nested);

        let options = contractor()
            .default_options(&WidgetType::Collection, &description)
            .unwrap();
        assert_eq!(options.get("type").and_then(OptionValue::as_str), Some("admin"));
        assert_eq!(options.get("modifiable").and_then(OptionValue::as_bool), Some(true));

        let type_options = options
            .get("type_options")
            .and_then(OptionValue::as_bag)
            .unwrap();
        assert_eq!(
            type_options.get("data_class").and_then(OptionValue::as_str),
            Some("Comment")
        );
        assert!(type_options
            .get("field_description")
            .and_then(OptionValue::as_field_description)
            .is_some());

        let options = contractor()
            .default_options(&WidgetType::Admin, &description)
            .unwrap();
        assert_eq!(options.len(), 1);
    }

    #[test]
    fn test_other_widget_gets_base_options() {
        let description = FieldDescription::with_type("title", "text");
        let options = contractor()
            .default_options(&WidgetType::from("text"), &description)
            .unwrap();
        assert_eq!(options.keys().collect::<Vec<_>>(), vec!["field_description"]);
    }
}
