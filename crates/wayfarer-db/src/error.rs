//! Database-specific error types and conversions.

use wayfarer_core::error::WayfarerError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Unique index rejected {entity}.{field} = '{value}'")]
    UniqueViolation {
        entity: String,
        field: String,
        value: String,
    },

    #[error("Referenced {entity} {id} does not exist")]
    InvalidReference { entity: String, id: String },

    #[error("Malformed stored value: {0}")]
    Corrupt(String),
}

impl DbError {
    /// Whether a failed statement was rejected by a UNIQUE index.
    ///
    /// The client API surfaces the engine's `IndexExists` error ("Database
    /// index `…` already contains …") only as text, so the message is matched.
    pub(crate) fn is_unique_violation(err: &surrealdb::Error) -> bool {
        err.to_string().contains("already contains")
    }

    /// Whether a write lost an optimistic transaction race and may be
    /// replayed. Matches the engine's `TxRetryable` conflict error, which the
    /// client API also only exposes as text.
    pub(crate) fn is_write_conflict(err: &surrealdb::Error) -> bool {
        let msg = err.to_string();
        msg.contains("retry the transaction") || msg.contains("can be retried")
    }
}

impl From<DbError> for WayfarerError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => WayfarerError::NotFound { entity, id },
            DbError::UniqueViolation {
                entity,
                field,
                value,
            } => WayfarerError::AlreadyExists {
                entity,
                field,
                value,
            },
            DbError::InvalidReference { entity, id } => {
                WayfarerError::InvalidReference { entity, id }
            }
            DbError::Corrupt(msg) => WayfarerError::Internal(msg),
            other => WayfarerError::Database(other.to_string()),
        }
    }
}
