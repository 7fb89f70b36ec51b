//! SurrealDB implementation of [`DocumentTypeRepository`].

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::debug;
use wayfarer_core::error::WayfarerResult;
use wayfarer_core::ids::DocumentTypeId;
use wayfarer_core::models::document_type::{
    CreateDocumentType, DocumentType, UpdateDocumentType,
};
use wayfarer_core::repository::{
    DocumentTypeFilter, DocumentTypeRepository, PaginatedResult, Pagination,
};

use super::reference::{SurrealReferenceResolver, ensure_user};
use super::{
    CountRow, parse_id, parse_optional_id, retry_on_conflict, where_clause, write_error,
};
use crate::error::DbError;

const TABLE: &str = "document_type";

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct DocumentTypeRow {
    document_type_name: String,
    description: Option<String>,
    is_required: bool,
    is_active: bool,
    created_by: Option<String>,
    created_date: DateTime<Utc>,
    updated_date: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct DocumentTypeRowWithId {
    record_id: String,
    document_type_name: String,
    description: Option<String>,
    is_required: bool,
    is_active: bool,
    created_by: Option<String>,
    created_date: DateTime<Utc>,
    updated_date: DateTime<Utc>,
}

impl DocumentTypeRow {
    fn into_document_type(self, id: DocumentTypeId) -> Result<DocumentType, DbError> {
        Ok(DocumentType {
            id,
            document_type_name: self.document_type_name,
            description: self.description,
            is_required: self.is_required,
            is_active: self.is_active,
            created_by: parse_optional_id("created_by", self.created_by.as_deref())?,
            created_date: self.created_date,
            updated_date: self.updated_date,
        })
    }
}

impl DocumentTypeRowWithId {
    fn try_into_document_type(self) -> Result<DocumentType, DbError> {
        let id = parse_id("document_type", &self.record_id)?;
        DocumentTypeRow {
            document_type_name: self.document_type_name,
            description: self.description,
            is_required: self.is_required,
            is_active: self.is_active,
            created_by: self.created_by,
            created_date: self.created_date,
            updated_date: self.updated_date,
        }
        .into_document_type(id)
    }
}

fn not_found(id: impl ToString) -> DbError {
    DbError::NotFound {
        entity: TABLE.into(),
        id: id.to_string(),
    }
}

/// SurrealDB implementation of the DocumentType repository.
///
/// Name uniqueness is enforced by the `idx_document_type_name` index, so
/// concurrent inserts of the same name cannot both succeed.
#[derive(Clone)]
pub struct SurrealDocumentTypeRepository<C: Connection> {
    db: Surreal<C>,
    refs: SurrealReferenceResolver<C>,
}

impl<C: Connection> SurrealDocumentTypeRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self {
            refs: SurrealReferenceResolver::new(db.clone()),
            db,
        }
    }
}

impl<C: Connection> DocumentTypeRepository for SurrealDocumentTypeRepository<C> {
    async fn create(&self, input: CreateDocumentType) -> WayfarerResult<DocumentType> {
        input.validate()?;
        if let Some(user_id) = input.created_by {
            ensure_user(&self.refs, user_id).await?;
        }

        let id = DocumentTypeId::new();
        let id_str = id.to_string();
        let name = input.document_type_name;
        let description = input.description;
        let created_by = input.created_by.map(|u| u.to_string());

        let mut result = retry_on_conflict(|| {
            let query = self
                .db
                .query(
                    "CREATE type::record('document_type', $id) SET \
                     document_type_name = $name, \
                     description = $description, \
                     is_required = $is_required, \
                     is_active = $is_active, \
                     created_by = $created_by",
                )
                .bind(("id", id_str.clone()))
                .bind(("name", name.clone()))
                .bind(("description", description.clone()))
                .bind(("is_required", input.is_required))
                .bind(("is_active", input.is_active))
                .bind(("created_by", created_by.clone()));
            async move { query.await?.check() }
        })
        .await
        .map_err(|e| write_error(e, TABLE, "document_type_name", &name))?;

        let rows: Vec<DocumentTypeRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| not_found(&id_str))?;

        debug!(id = %id, name = %name, "Created document type");
        Ok(row.into_document_type(id)?)
    }

    async fn get_by_id(&self, id: DocumentTypeId) -> WayfarerResult<DocumentType> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('document_type', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<DocumentTypeRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| not_found(&id_str))?;

        Ok(row.into_document_type(id)?)
    }

    async fn get_by_name(&self, name: &str) -> WayfarerResult<DocumentType> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM document_type \
                 WHERE document_type_name = $name",
            )
            .bind(("name", name.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<DocumentTypeRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| not_found(format!("document_type_name={name}")))?;

        Ok(row.try_into_document_type()?)
    }

    async fn update(
        &self,
        id: DocumentTypeId,
        input: UpdateDocumentType,
    ) -> WayfarerResult<DocumentType> {
        input.validate()?;
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.document_type_name.is_some() {
            sets.push("document_type_name = $name");
        }
        if input.description.is_some() {
            sets.push("description = $description");
        }
        if input.is_required.is_some() {
            sets.push("is_required = $is_required");
        }
        if input.is_active.is_some() {
            sets.push("is_active = $is_active");
        }

        // `updated_date` is refreshed by its VALUE clause even when
        // nothing else changes.
        let query = if sets.is_empty() {
            "UPDATE type::record('document_type', $id)".to_string()
        } else {
            format!(
                "UPDATE type::record('document_type', $id) SET {}",
                sets.join(", ")
            )
        };

        let new_name = input.document_type_name.clone().unwrap_or_default();

        let mut result = retry_on_conflict(|| {
            let mut builder = self.db.query(&query).bind(("id", id_str.clone()));
            if let Some(name) = &input.document_type_name {
                builder = builder.bind(("name", name.clone()));
            }
            if let Some(description) = &input.description {
                builder = builder.bind(("description", description.clone()));
            }
            if let Some(is_required) = input.is_required {
                builder = builder.bind(("is_required", is_required));
            }
            if let Some(is_active) = input.is_active {
                builder = builder.bind(("is_active", is_active));
            }
            async move { builder.await?.check() }
        })
        .await
        .map_err(|e| write_error(e, TABLE, "document_type_name", &new_name))?;

        let rows: Vec<DocumentTypeRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| not_found(&id_str))?;

        Ok(row.into_document_type(id)?)
    }

    async fn deactivate(&self, id: DocumentTypeId) -> WayfarerResult<DocumentType> {
        let id_str = id.to_string();

        let mut result = retry_on_conflict(|| {
            let query = self
                .db
                .query("UPDATE type::record('document_type', $id) SET is_active = false")
                .bind(("id", id_str.clone()));
            async move { query.await?.check() }
        })
        .await
        .map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<DocumentTypeRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| not_found(&id_str))?;

        debug!(id = %id, "Deactivated document type");
        Ok(row.into_document_type(id)?)
    }

    async fn delete(&self, id: DocumentTypeId) -> WayfarerResult<()> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("DELETE type::record('document_type', $id) RETURN BEFORE")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<DocumentTypeRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(not_found(id_str).into());
        }

        Ok(())
    }

    async fn list(
        &self,
        filter: DocumentTypeFilter,
        pagination: Pagination,
    ) -> WayfarerResult<PaginatedResult<DocumentType>> {
        let mut conditions = Vec::new();
        if filter.is_active.is_some() {
            conditions.push("is_active = $is_active");
        }
        if filter.is_required.is_some() {
            conditions.push("is_required = $is_required");
        }
        let where_sql = where_clause(&conditions);

        let count_query =
            format!("SELECT count() AS total FROM document_type{where_sql} GROUP ALL");
        let list_query = format!(
            "SELECT meta::id(id) AS record_id, * FROM document_type{where_sql} \
             ORDER BY document_type_name ASC \
             LIMIT $limit START $offset"
        );

        let mut count_builder = self.db.query(&count_query);
        let mut list_builder = self
            .db
            .query(&list_query)
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset));
        if let Some(is_active) = filter.is_active {
            count_builder = count_builder.bind(("is_active", is_active));
            list_builder = list_builder.bind(("is_active", is_active));
        }
        if let Some(is_required) = filter.is_required {
            count_builder = count_builder.bind(("is_required", is_required));
            list_builder = list_builder.bind(("is_required", is_required));
        }

        let mut count_result = count_builder.await.map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = list_builder.await.map_err(DbError::from)?;
        let rows: Vec<DocumentTypeRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_document_type())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
