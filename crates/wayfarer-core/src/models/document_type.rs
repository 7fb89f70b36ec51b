//! Document type domain model.
//!
//! A document type is a catalog entry naming a category of document
//! (passport, visa, travel insurance) that tours may ask travellers for.
//! Names are unique across the catalog, compared case-sensitively.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{WayfarerError, WayfarerResult};
use crate::ids::{DocumentTypeId, UserId};
use crate::models::{require_text, required_text};

pub const DEFAULT_IS_REQUIRED: bool = false;
pub const DEFAULT_IS_ACTIVE: bool = true;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentType {
    pub id: DocumentTypeId,
    pub document_type_name: String,
    pub description: Option<String>,
    /// Whether travellers must supply this document.
    pub is_required: bool,
    /// Inactive types are retained but hidden from new tours.
    pub is_active: bool,
    pub created_by: Option<UserId>,
    /// Set once on insert.
    pub created_date: DateTime<Utc>,
    /// Refreshed on every write.
    pub updated_date: DateTime<Utc>,
}

/// Fields required to create a new document type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateDocumentType {
    pub document_type_name: String,
    pub description: Option<String>,
    pub is_required: bool,
    pub is_active: bool,
    pub created_by: Option<UserId>,
}

impl CreateDocumentType {
    /// Starts a create input with every optional field at its default.
    pub fn new(document_type_name: impl Into<String>) -> Self {
        Self {
            document_type_name: document_type_name.into(),
            description: None,
            is_required: DEFAULT_IS_REQUIRED,
            is_active: DEFAULT_IS_ACTIVE,
            created_by: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn required(mut self, is_required: bool) -> Self {
        self.is_required = is_required;
        self
    }

    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    pub fn created_by(mut self, user_id: UserId) -> Self {
        self.created_by = Some(user_id);
        self
    }

    pub fn validate(&self) -> WayfarerResult<()> {
        require_text("document_type_name", &self.document_type_name)
    }
}

/// Loosely typed create input, as decoded from an incoming payload.
///
/// Every field is optional here; converting into [`CreateDocumentType`]
/// applies defaults and reports the first missing required field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentTypeDraft {
    pub document_type_name: Option<String>,
    pub description: Option<String>,
    pub is_required: Option<bool>,
    pub is_active: Option<bool>,
    pub created_by: Option<UserId>,
}

impl TryFrom<DocumentTypeDraft> for CreateDocumentType {
    type Error = WayfarerError;

    fn try_from(draft: DocumentTypeDraft) -> WayfarerResult<Self> {
        Ok(Self {
            document_type_name: required_text("document_type_name", draft.document_type_name)?,
            description: draft.description,
            is_required: draft.is_required.unwrap_or(DEFAULT_IS_REQUIRED),
            is_active: draft.is_active.unwrap_or(DEFAULT_IS_ACTIVE),
            created_by: draft.created_by,
        })
    }
}

/// Fields that can be updated on an existing document type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateDocumentType {
    pub document_type_name: Option<String>,
    /// `Some(Some(val))` = set, `Some(None)` = clear, `None` = no change.
    pub description: Option<Option<String>>,
    pub is_required: Option<bool>,
    pub is_active: Option<bool>,
}

impl UpdateDocumentType {
    pub fn validate(&self) -> WayfarerResult<()> {
        if let Some(name) = &self.document_type_name {
            require_text("document_type_name", name)?;
        }
        Ok(())
    }
}
