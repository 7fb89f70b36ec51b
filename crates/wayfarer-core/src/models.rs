//! Domain models for Wayfarer.

pub mod document_type;
pub mod tour_document;

use crate::error::{WayfarerError, WayfarerResult};

/// Rejects empty or whitespace-only values for a required text field.
pub(crate) fn require_text(field: &str, value: &str) -> WayfarerResult<()> {
    if value.trim().is_empty() {
        return Err(WayfarerError::missing(field));
    }
    Ok(())
}

/// Unwraps a required draft field, naming it when absent or blank.
pub(crate) fn required_text(field: &str, value: Option<String>) -> WayfarerResult<String> {
    let value = value.ok_or_else(|| WayfarerError::missing(field))?;
    require_text(field, &value)?;
    Ok(value)
}
