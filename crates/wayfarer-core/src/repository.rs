//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Implementations own validation of
//! create/update inputs, reference resolution and timestamp population;
//! the models themselves perform no I/O.

use crate::error::WayfarerResult;
use crate::ids::{CustomTourId, DocumentTypeId, TourDocumentId, UserId};
use crate::models::{
    document_type::{CreateDocumentType, DocumentType, UpdateDocumentType},
    tour_document::{CreateTourDocument, TourDocument, UpdateTourDocument},
};

/// Pagination parameters for list queries.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

// ---------------------------------------------------------------------------
// References
// ---------------------------------------------------------------------------

/// Resolves reference fields against the records owned by other services.
pub trait ReferenceResolver: Send + Sync {
    fn tour_exists(&self, id: CustomTourId) -> impl Future<Output = WayfarerResult<bool>> + Send;
    fn user_exists(&self, id: UserId) -> impl Future<Output = WayfarerResult<bool>> + Send;
}

// ---------------------------------------------------------------------------
// Document types
// ---------------------------------------------------------------------------

/// Query filters for document type listings. `None` matches any value.
#[derive(Debug, Clone, Default)]
pub struct DocumentTypeFilter {
    pub is_active: Option<bool>,
    pub is_required: Option<bool>,
}

impl DocumentTypeFilter {
    pub fn active() -> Self {
        Self {
            is_active: Some(true),
            ..Default::default()
        }
    }
}

pub trait DocumentTypeRepository: Send + Sync {
    /// Insert a new document type. Fails with `AlreadyExists` when the
    /// name is taken.
    fn create(
        &self,
        input: CreateDocumentType,
    ) -> impl Future<Output = WayfarerResult<DocumentType>> + Send;
    fn get_by_id(
        &self,
        id: DocumentTypeId,
    ) -> impl Future<Output = WayfarerResult<DocumentType>> + Send;
    /// Exact, case-sensitive name lookup.
    fn get_by_name(&self, name: &str) -> impl Future<Output = WayfarerResult<DocumentType>> + Send;
    fn update(
        &self,
        id: DocumentTypeId,
        input: UpdateDocumentType,
    ) -> impl Future<Output = WayfarerResult<DocumentType>> + Send;
    /// Soft-delete: sets `is_active` to false.
    fn deactivate(
        &self,
        id: DocumentTypeId,
    ) -> impl Future<Output = WayfarerResult<DocumentType>> + Send;
    fn delete(&self, id: DocumentTypeId) -> impl Future<Output = WayfarerResult<()>> + Send;
    fn list(
        &self,
        filter: DocumentTypeFilter,
        pagination: Pagination,
    ) -> impl Future<Output = WayfarerResult<PaginatedResult<DocumentType>>> + Send;
}

// ---------------------------------------------------------------------------
// Tour documents
// ---------------------------------------------------------------------------

/// Query filters for the documents of a single tour.
#[derive(Debug, Clone, Default)]
pub struct TourDocumentFilter {
    pub is_visible_to_tourists: Option<bool>,
    pub uploaded_by: Option<UserId>,
}

impl TourDocumentFilter {
    /// Only the documents a tourist is allowed to see.
    pub fn visible() -> Self {
        Self {
            is_visible_to_tourists: Some(true),
            ..Default::default()
        }
    }
}

pub trait TourDocumentRepository: Send + Sync {
    /// Insert a new tour document. The tour and every referenced user
    /// must exist.
    fn create(
        &self,
        input: CreateTourDocument,
    ) -> impl Future<Output = WayfarerResult<TourDocument>> + Send;
    fn get_by_id(
        &self,
        id: TourDocumentId,
    ) -> impl Future<Output = WayfarerResult<TourDocument>> + Send;
    fn update(
        &self,
        id: TourDocumentId,
        input: UpdateTourDocument,
    ) -> impl Future<Output = WayfarerResult<TourDocument>> + Send;
    fn set_visibility(
        &self,
        id: TourDocumentId,
        visible: bool,
    ) -> impl Future<Output = WayfarerResult<TourDocument>> + Send;
    fn delete(&self, id: TourDocumentId) -> impl Future<Output = WayfarerResult<()>> + Send;
    /// Documents attached to a tour, oldest first.
    fn list_by_tour(
        &self,
        custom_tour_id: CustomTourId,
        filter: TourDocumentFilter,
        pagination: Pagination,
    ) -> impl Future<Output = WayfarerResult<PaginatedResult<TourDocument>>> + Send;
}
