//! SurrealDB repository implementations.

mod document_type;
mod reference;
mod tour_document;

pub use document_type::SurrealDocumentTypeRepository;
pub use reference::SurrealReferenceResolver;
pub use tour_document::SurrealTourDocumentRepository;

use std::str::FromStr;
use std::time::Duration;

use surrealdb_types::SurrealValue;
use tracing::debug;

use crate::error::DbError;

/// Upper bound on replays of a write that lost a transaction conflict.
const MAX_WRITE_ATTEMPTS: u32 = 8;

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// Parse an identifier stored as a UUID string.
fn parse_id<T>(field: &str, raw: &str) -> Result<T, DbError>
where
    T: FromStr<Err = uuid::Error>,
{
    raw.parse()
        .map_err(|e| DbError::Corrupt(format!("invalid {field} UUID '{raw}': {e}")))
}

fn parse_optional_id<T>(field: &str, raw: Option<&str>) -> Result<Option<T>, DbError>
where
    T: FromStr<Err = uuid::Error>,
{
    raw.map(|raw| parse_id(field, raw)).transpose()
}

/// Classify a statement error from a write that touches a unique column.
fn write_error(err: surrealdb::Error, entity: &str, field: &str, value: &str) -> DbError {
    if DbError::is_unique_violation(&err) {
        DbError::UniqueViolation {
            entity: entity.into(),
            field: field.into(),
            value: value.into(),
        }
    } else {
        DbError::Query(err.to_string())
    }
}

/// Run a write, replaying it while it fails with a transaction conflict.
///
/// Concurrent writers touching the same index entry race optimistically.
/// The losers are aborted with a retryable conflict, and replaying them lets
/// the committed winner decide the outcome (usually a unique-index error).
async fn retry_on_conflict<T, F, Fut>(mut write: F) -> Result<T, surrealdb::Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, surrealdb::Error>>,
{
    let mut attempt = 1;
    loop {
        match write().await {
            Err(err) if attempt < MAX_WRITE_ATTEMPTS && DbError::is_write_conflict(&err) => {
                debug!(attempt, "Write conflict, replaying");
                tokio::time::sleep(Duration::from_millis(2 * u64::from(attempt))).await;
                attempt += 1;
            }
            outcome => return outcome,
        }
    }
}

/// Join optional `WHERE` conditions into a clause (empty when none apply).
fn where_clause(conditions: &[&str]) -> String {
    if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    }
}
