//! Configuration error types.

use thiserror::Error;

/// Errors raised while wiring admin fields.
///
/// Both variants describe a development-time misconfiguration; submitted
/// filter values never produce an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Please define a type for field `{field}` in `{admin}`")]
    MissingFieldType { field: String, admin: String },

    #[error(
        "The current field `{field}` is not linked to an admin. \
         Please create one for the target entity : `{target_entity}`"
    )]
    MissingAssociationAdmin {
        field: String,
        target_entity: String,
    },
}

/// Result type for admin configuration operations.
pub type AdminResult<T> = Result<T, ConfigurationError>;
