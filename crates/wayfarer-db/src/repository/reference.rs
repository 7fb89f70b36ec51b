//! Existence checks for reference fields.
//!
//! Tours and users live in tables owned by other services. References are
//! checked immediately before the write that stores them; the check and
//! the write are not one transaction.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use wayfarer_core::error::{WayfarerError, WayfarerResult};
use wayfarer_core::ids::{CustomTourId, UserId};
use wayfarer_core::repository::ReferenceResolver;

use crate::error::DbError;

const TOUR_TABLE: &str = "custom_tour";
const USER_TABLE: &str = "user";

#[derive(Debug, SurrealValue)]
struct IdRow {
    #[allow(dead_code)]
    record_id: String,
}

/// Resolves tour and user references against their SurrealDB tables.
#[derive(Clone)]
pub struct SurrealReferenceResolver<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealReferenceResolver<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn record_exists(&self, table: &'static str, id: String) -> Result<bool, DbError> {
        let mut result = self
            .db
            .query("SELECT meta::id(id) AS record_id FROM type::record($table, $id)")
            .bind(("table", table))
            .bind(("id", id))
            .await?;

        let rows: Vec<IdRow> = result.take(0)?;
        Ok(!rows.is_empty())
    }
}

impl<C: Connection> ReferenceResolver for SurrealReferenceResolver<C> {
    async fn tour_exists(&self, id: CustomTourId) -> WayfarerResult<bool> {
        Ok(self.record_exists(TOUR_TABLE, id.to_string()).await?)
    }

    async fn user_exists(&self, id: UserId) -> WayfarerResult<bool> {
        Ok(self.record_exists(USER_TABLE, id.to_string()).await?)
    }
}

pub(crate) async fn ensure_tour<R: ReferenceResolver>(
    refs: &R,
    id: CustomTourId,
) -> WayfarerResult<()> {
    if refs.tour_exists(id).await? {
        Ok(())
    } else {
        Err(invalid(TOUR_TABLE, id.to_string()))
    }
}

pub(crate) async fn ensure_user<R: ReferenceResolver>(refs: &R, id: UserId) -> WayfarerResult<()> {
    if refs.user_exists(id).await? {
        Ok(())
    } else {
        Err(invalid(USER_TABLE, id.to_string()))
    }
}

fn invalid(entity: &str, id: String) -> WayfarerError {
    DbError::InvalidReference {
        entity: entity.into(),
        id,
    }
    .into()
}
