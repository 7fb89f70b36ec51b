//! Tour document domain model.
//!
//! A tour document records a file uploaded against a custom tour. The
//! file itself lives in external storage; only its name, URL and size are
//! kept here. Visibility to tourists is an independent flag, not a
//! lifecycle stage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{WayfarerError, WayfarerResult};
use crate::ids::{CustomTourId, TourDocumentId, UserId};
use crate::models::{require_text, required_text};

pub const DEFAULT_IS_VISIBLE_TO_TOURISTS: bool = true;

/// Largest file size the store can hold (its integers are signed 64-bit).
pub const MAX_FILE_SIZE: u64 = i64::MAX as u64;

fn check_file_size(bytes: Option<u64>) -> WayfarerResult<()> {
    match bytes {
        Some(bytes) if bytes > MAX_FILE_SIZE => Err(WayfarerError::Validation {
            field: "file_size".into(),
            message: format!("must not exceed {MAX_FILE_SIZE} bytes"),
        }),
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TourDocument {
    pub id: TourDocumentId,
    /// The tour this document belongs to.
    pub custom_tour_id: CustomTourId,
    pub document_name: String,
    pub description: Option<String>,
    pub file_name: String,
    pub file_url: String,
    /// Size in bytes, when the uploader reported one.
    pub file_size: Option<u64>,
    pub uploaded_by: UserId,
    pub is_visible_to_tourists: bool,
    pub created_by: Option<UserId>,
    pub created_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
}

/// Fields required to create a new tour document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTourDocument {
    pub custom_tour_id: CustomTourId,
    pub document_name: String,
    pub description: Option<String>,
    pub file_name: String,
    pub file_url: String,
    pub file_size: Option<u64>,
    pub uploaded_by: UserId,
    pub is_visible_to_tourists: bool,
    pub created_by: Option<UserId>,
}

impl CreateTourDocument {
    pub fn new(
        custom_tour_id: CustomTourId,
        document_name: impl Into<String>,
        file_name: impl Into<String>,
        file_url: impl Into<String>,
        uploaded_by: UserId,
    ) -> Self {
        Self {
            custom_tour_id,
            document_name: document_name.into(),
            description: None,
            file_name: file_name.into(),
            file_url: file_url.into(),
            file_size: None,
            uploaded_by,
            is_visible_to_tourists: DEFAULT_IS_VISIBLE_TO_TOURISTS,
            created_by: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_file_size(mut self, bytes: u64) -> Self {
        self.file_size = Some(bytes);
        self
    }

    pub fn visible_to_tourists(mut self, visible: bool) -> Self {
        self.is_visible_to_tourists = visible;
        self
    }

    pub fn created_by(mut self, user_id: UserId) -> Self {
        self.created_by = Some(user_id);
        self
    }

    pub fn validate(&self) -> WayfarerResult<()> {
        require_text("document_name", &self.document_name)?;
        require_text("file_name", &self.file_name)?;
        require_text("file_url", &self.file_url)?;
        check_file_size(self.file_size)
    }
}

/// Loosely typed create input, as decoded from an incoming payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TourDocumentDraft {
    pub custom_tour_id: Option<CustomTourId>,
    pub document_name: Option<String>,
    pub description: Option<String>,
    pub file_name: Option<String>,
    pub file_url: Option<String>,
    pub file_size: Option<u64>,
    pub uploaded_by: Option<UserId>,
    pub is_visible_to_tourists: Option<bool>,
    pub created_by: Option<UserId>,
}

impl TryFrom<TourDocumentDraft> for CreateTourDocument {
    type Error = WayfarerError;

    fn try_from(draft: TourDocumentDraft) -> WayfarerResult<Self> {
        let custom_tour_id = draft
            .custom_tour_id
            .ok_or_else(|| WayfarerError::missing("custom_tour_id"))?;
        let document_name = required_text("document_name", draft.document_name)?;
        let file_name = required_text("file_name", draft.file_name)?;
        let file_url = required_text("file_url", draft.file_url)?;
        let uploaded_by = draft
            .uploaded_by
            .ok_or_else(|| WayfarerError::missing("uploaded_by"))?;

        Ok(Self {
            custom_tour_id,
            document_name,
            description: draft.description,
            file_name,
            file_url,
            file_size: draft.file_size,
            uploaded_by,
            is_visible_to_tourists: draft
                .is_visible_to_tourists
                .unwrap_or(DEFAULT_IS_VISIBLE_TO_TOURISTS),
            created_by: draft.created_by,
        })
    }
}

/// Fields that can be updated on an existing tour document.
///
/// The owning tour and the uploader are fixed at creation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTourDocument {
    pub document_name: Option<String>,
    /// `Some(Some(val))` = set, `Some(None)` = clear, `None` = no change.
    pub description: Option<Option<String>>,
    pub file_name: Option<String>,
    pub file_url: Option<String>,
    pub file_size: Option<Option<u64>>,
    pub is_visible_to_tourists: Option<bool>,
    pub created_by: Option<Option<UserId>>,
}

impl UpdateTourDocument {
    pub fn validate(&self) -> WayfarerResult<()> {
        if let Some(name) = &self.document_name {
            require_text("document_name", name)?;
        }
        if let Some(file_name) = &self.file_name {
            require_text("file_name", file_name)?;
        }
        if let Some(file_url) = &self.file_url {
            require_text("file_url", file_url)?;
        }
        check_file_size(self.file_size.flatten())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn full_draft() -> serde_json::Value {
        json!({
            "custom_tour_id": CustomTourId::new(),
            "document_name": "Scan",
            "file_name": "p.pdf",
            "file_url": "https://x/p.pdf",
            "uploaded_by": UserId::new(),
        })
    }

    #[test]
    fn new_defaults_to_visible() {
        let input = CreateTourDocument::new(
            CustomTourId::new(),
            "Scan",
            "p.pdf",
            "https://x/p.pdf",
            UserId::new(),
        );
        assert!(input.is_visible_to_tourists);
        assert!(input.file_size.is_none());
        assert!(input.validate().is_ok());
    }

    #[test]
    fn each_missing_required_field_is_named() {
        for field in [
            "custom_tour_id",
            "document_name",
            "file_name",
            "file_url",
            "uploaded_by",
        ] {
            let mut value = full_draft();
            value.as_object_mut().unwrap().remove(field);
            let draft: TourDocumentDraft = serde_json::from_value(value).unwrap();

            let err = CreateTourDocument::try_from(draft).unwrap_err();
            assert!(matches!(err, WayfarerError::Validation { .. }));
            assert_eq!(err.field(), Some(field), "wrong field reported");
        }
    }

    #[test]
    fn blank_file_url_counts_as_missing() {
        let mut value = full_draft();
        value["file_url"] = json!("  ");
        let draft: TourDocumentDraft = serde_json::from_value(value).unwrap();
        let err = CreateTourDocument::try_from(draft).unwrap_err();
        assert_eq!(err.field(), Some("file_url"));
    }

    #[test]
    fn complete_draft_converts_with_defaults() {
        let mut value = full_draft();
        value["file_size"] = json!(2048);
        let draft: TourDocumentDraft = serde_json::from_value(value).unwrap();
        let input = CreateTourDocument::try_from(draft).unwrap();
        assert_eq!(input.document_name, "Scan");
        assert_eq!(input.file_size, Some(2048));
        assert!(input.is_visible_to_tourists);
    }

    #[test]
    fn update_validates_only_provided_fields() {
        assert!(UpdateTourDocument::default().validate().is_ok());

        let update = UpdateTourDocument {
            file_name: Some("".into()),
            ..Default::default()
        };
        assert_eq!(update.validate().unwrap_err().field(), Some("file_name"));
    }

    #[test]
    fn file_size_beyond_storable_range_is_rejected() {
        let base = CreateTourDocument::new(
            CustomTourId::new(),
            "Scan",
            "p.pdf",
            "https://x/p.pdf",
            UserId::new(),
        );
        assert!(base.clone().with_file_size(MAX_FILE_SIZE).validate().is_ok());

        let err = base.with_file_size(u64::MAX).validate().unwrap_err();
        assert_eq!(err.field(), Some("file_size"));

        let update = UpdateTourDocument {
            file_size: Some(Some(MAX_FILE_SIZE + 1)),
            ..Default::default()
        };
        assert_eq!(update.validate().unwrap_err().field(), Some("file_size"));
    }
}
