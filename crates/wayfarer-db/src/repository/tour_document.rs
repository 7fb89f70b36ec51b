//! SurrealDB implementation of [`TourDocumentRepository`].

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::debug;
use wayfarer_core::error::WayfarerResult;
use wayfarer_core::ids::{CustomTourId, TourDocumentId};
use wayfarer_core::models::tour_document::{
    CreateTourDocument, TourDocument, UpdateTourDocument,
};
use wayfarer_core::repository::{
    PaginatedResult, Pagination, TourDocumentFilter, TourDocumentRepository,
};

use super::reference::{SurrealReferenceResolver, ensure_tour, ensure_user};
use super::{CountRow, parse_id, parse_optional_id, retry_on_conflict, where_clause};
use crate::error::DbError;

const TABLE: &str = "tour_document";

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct TourDocumentRow {
    custom_tour_id: String,
    document_name: String,
    description: Option<String>,
    file_name: String,
    file_url: String,
    file_size: Option<u64>,
    uploaded_by: String,
    is_visible_to_tourists: bool,
    created_by: Option<String>,
    created_date: DateTime<Utc>,
    updated_date: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct TourDocumentRowWithId {
    record_id: String,
    custom_tour_id: String,
    document_name: String,
    description: Option<String>,
    file_name: String,
    file_url: String,
    file_size: Option<u64>,
    uploaded_by: String,
    is_visible_to_tourists: bool,
    created_by: Option<String>,
    created_date: DateTime<Utc>,
    updated_date: DateTime<Utc>,
}

impl TourDocumentRow {
    fn into_tour_document(self, id: TourDocumentId) -> Result<TourDocument, DbError> {
        Ok(TourDocument {
            id,
            custom_tour_id: parse_id("custom_tour_id", &self.custom_tour_id)?,
            document_name: self.document_name,
            description: self.description,
            file_name: self.file_name,
            file_url: self.file_url,
            file_size: self.file_size,
            uploaded_by: parse_id("uploaded_by", &self.uploaded_by)?,
            is_visible_to_tourists: self.is_visible_to_tourists,
            created_by: parse_optional_id("created_by", self.created_by.as_deref())?,
            created_date: self.created_date,
            updated_date: self.updated_date,
        })
    }
}

impl TourDocumentRowWithId {
    fn try_into_tour_document(self) -> Result<TourDocument, DbError> {
        let id = parse_id("tour_document", &self.record_id)?;
        TourDocumentRow {
            custom_tour_id: self.custom_tour_id,
            document_name: self.document_name,
            description: self.description,
            file_name: self.file_name,
            file_url: self.file_url,
            file_size: self.file_size,
            uploaded_by: self.uploaded_by,
            is_visible_to_tourists: self.is_visible_to_tourists,
            created_by: self.created_by,
            created_date: self.created_date,
            updated_date: self.updated_date,
        }
        .into_tour_document(id)
    }
}

fn not_found(id: impl ToString) -> DbError {
    DbError::NotFound {
        entity: TABLE.into(),
        id: id.to_string(),
    }
}

/// SurrealDB implementation of the TourDocument repository.
#[derive(Clone)]
pub struct SurrealTourDocumentRepository<C: Connection> {
    db: Surreal<C>,
    refs: SurrealReferenceResolver<C>,
}

impl<C: Connection> SurrealTourDocumentRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self {
            refs: SurrealReferenceResolver::new(db.clone()),
            db,
        }
    }

    async fn fetch_single(
        &self,
        query: &str,
        id: TourDocumentId,
        bind_visible: Option<bool>,
    ) -> WayfarerResult<TourDocument> {
        let id_str = id.to_string();
        let mut result = retry_on_conflict(|| {
            let mut builder = self.db.query(query).bind(("id", id_str.clone()));
            if let Some(visible) = bind_visible {
                builder = builder.bind(("visible", visible));
            }
            async move { builder.await?.check() }
        })
        .await
        .map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<TourDocumentRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| not_found(&id_str))?;

        Ok(row.into_tour_document(id)?)
    }
}

impl<C: Connection> TourDocumentRepository for SurrealTourDocumentRepository<C> {
    async fn create(&self, input: CreateTourDocument) -> WayfarerResult<TourDocument> {
        input.validate()?;
        ensure_tour(&self.refs, input.custom_tour_id).await?;
        ensure_user(&self.refs, input.uploaded_by).await?;
        if let Some(creator) = input.created_by {
            ensure_user(&self.refs, creator).await?;
        }

        let id = TourDocumentId::new();
        let id_str = id.to_string();

        let custom_tour_id = input.custom_tour_id.to_string();
        let uploaded_by = input.uploaded_by.to_string();
        let created_by = input.created_by.map(|u| u.to_string());

        let mut result = retry_on_conflict(|| {
            let query = self
                .db
                .query(
                    "CREATE type::record('tour_document', $id) SET \
                     custom_tour_id = $custom_tour_id, \
                     document_name = $document_name, \
                     description = $description, \
                     file_name = $file_name, \
                     file_url = $file_url, \
                     file_size = $file_size, \
                     uploaded_by = $uploaded_by, \
                     is_visible_to_tourists = $is_visible_to_tourists, \
                     created_by = $created_by",
                )
                .bind(("id", id_str.clone()))
                .bind(("custom_tour_id", custom_tour_id.clone()))
                .bind(("document_name", input.document_name.clone()))
                .bind(("description", input.description.clone()))
                .bind(("file_name", input.file_name.clone()))
                .bind(("file_url", input.file_url.clone()))
                .bind(("file_size", input.file_size))
                .bind(("uploaded_by", uploaded_by.clone()))
                .bind(("is_visible_to_tourists", input.is_visible_to_tourists))
                .bind(("created_by", created_by.clone()));
            async move { query.await?.check() }
        })
        .await
        .map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<TourDocumentRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| not_found(&id_str))?;

        debug!(
            id = %id,
            custom_tour_id = %input.custom_tour_id,
            "Created tour document"
        );
        Ok(row.into_tour_document(id)?)
    }

    async fn get_by_id(&self, id: TourDocumentId) -> WayfarerResult<TourDocument> {
        self.fetch_single("SELECT * FROM type::record('tour_document', $id)", id, None)
            .await
    }

    async fn update(
        &self,
        id: TourDocumentId,
        input: UpdateTourDocument,
    ) -> WayfarerResult<TourDocument> {
        input.validate()?;
        if let Some(Some(creator)) = input.created_by {
            ensure_user(&self.refs, creator).await?;
        }

        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.document_name.is_some() {
            sets.push("document_name = $document_name");
        }
        if input.description.is_some() {
            sets.push("description = $description");
        }
        if input.file_name.is_some() {
            sets.push("file_name = $file_name");
        }
        if input.file_url.is_some() {
            sets.push("file_url = $file_url");
        }
        if input.file_size.is_some() {
            sets.push("file_size = $file_size");
        }
        if input.is_visible_to_tourists.is_some() {
            sets.push("is_visible_to_tourists = $is_visible_to_tourists");
        }
        if input.created_by.is_some() {
            sets.push("created_by = $created_by");
        }

        let query = if sets.is_empty() {
            "UPDATE type::record('tour_document', $id)".to_string()
        } else {
            format!(
                "UPDATE type::record('tour_document', $id) SET {}",
                sets.join(", ")
            )
        };

        let mut result = retry_on_conflict(|| {
            let mut builder = self.db.query(&query).bind(("id", id_str.clone()));
            if let Some(document_name) = &input.document_name {
                builder = builder.bind(("document_name", document_name.clone()));
            }
            if let Some(description) = &input.description {
                builder = builder.bind(("description", description.clone()));
            }
            if let Some(file_name) = &input.file_name {
                builder = builder.bind(("file_name", file_name.clone()));
            }
            if let Some(file_url) = &input.file_url {
                builder = builder.bind(("file_url", file_url.clone()));
            }
            if let Some(file_size) = input.file_size {
                builder = builder.bind(("file_size", file_size));
            }
            if let Some(visible) = input.is_visible_to_tourists {
                builder = builder.bind(("is_visible_to_tourists", visible));
            }
            if let Some(created_by) = input.created_by {
                builder = builder.bind(("created_by", created_by.map(|u| u.to_string())));
            }
            async move { builder.await?.check() }
        })
        .await
        .map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<TourDocumentRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| not_found(&id_str))?;

        Ok(row.into_tour_document(id)?)
    }

    async fn set_visibility(
        &self,
        id: TourDocumentId,
        visible: bool,
    ) -> WayfarerResult<TourDocument> {
        let document = self
            .fetch_single(
                "UPDATE type::record('tour_document', $id) \
                 SET is_visible_to_tourists = $visible",
                id,
                Some(visible),
            )
            .await?;

        debug!(id = %id, visible, "Changed tour document visibility");
        Ok(document)
    }

    async fn delete(&self, id: TourDocumentId) -> WayfarerResult<()> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("DELETE type::record('tour_document', $id) RETURN BEFORE")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TourDocumentRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(not_found(id_str).into());
        }

        Ok(())
    }

    async fn list_by_tour(
        &self,
        custom_tour_id: CustomTourId,
        filter: TourDocumentFilter,
        pagination: Pagination,
    ) -> WayfarerResult<PaginatedResult<TourDocument>> {
        let tour_id_str = custom_tour_id.to_string();

        let mut conditions = vec!["custom_tour_id = $custom_tour_id"];
        if filter.is_visible_to_tourists.is_some() {
            conditions.push("is_visible_to_tourists = $visible");
        }
        if filter.uploaded_by.is_some() {
            conditions.push("uploaded_by = $uploaded_by");
        }
        let where_sql = where_clause(&conditions);

        let count_query =
            format!("SELECT count() AS total FROM tour_document{where_sql} GROUP ALL");
        let list_query = format!(
            "SELECT meta::id(id) AS record_id, * FROM tour_document{where_sql} \
             ORDER BY created_date ASC \
             LIMIT $limit START $offset"
        );

        let mut count_builder = self
            .db
            .query(&count_query)
            .bind(("custom_tour_id", tour_id_str.clone()));
        let mut list_builder = self
            .db
            .query(&list_query)
            .bind(("custom_tour_id", tour_id_str))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset));
        if let Some(visible) = filter.is_visible_to_tourists {
            count_builder = count_builder.bind(("visible", visible));
            list_builder = list_builder.bind(("visible", visible));
        }
        if let Some(uploader) = filter.uploaded_by {
            count_builder = count_builder.bind(("uploaded_by", uploader.to_string()));
            list_builder = list_builder.bind(("uploaded_by", uploader.to_string()));
        }

        let mut count_result = count_builder.await.map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = list_builder.await.map_err(DbError::from)?;
        let rows: Vec<TourDocumentRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_tour_document())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
