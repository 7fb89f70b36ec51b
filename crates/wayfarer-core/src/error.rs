//! Error types for the Wayfarer system.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WayfarerError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    /// A unique constraint rejected the write.
    #[error("Entity already exists: {entity} with {field} '{value}'")]
    AlreadyExists {
        entity: String,
        field: String,
        value: String,
    },

    #[error("Validation error on `{field}`: {message}")]
    Validation { field: String, message: String },

    /// A reference field points at a record that does not exist.
    #[error("Invalid reference: {entity} with id {id} does not exist")]
    InvalidReference { entity: String, id: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl WayfarerError {
    /// Shorthand for a required field that was absent or blank.
    pub fn missing(field: &str) -> Self {
        Self::Validation {
            field: field.into(),
            message: "field is required".into(),
        }
    }

    /// The offending field, for validation and uniqueness errors.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } | Self::AlreadyExists { field, .. } => {
                Some(field.as_str())
            }
            _ => None,
        }
    }
}

pub type WayfarerResult<T> = Result<T, WayfarerError>;
