//! Schema definitions and migration runner for SurrealDB.
//!
//! Catalog tables use SCHEMAFULL mode. UUIDs are stored as strings.
//! Timestamps are maintained by field clauses: `created_date` is written
//! once on insert and is READONLY afterwards, `updated_date` is recomputed
//! by its VALUE clause on every write.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::{debug, info};

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "document_catalog",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Referenced tables (owned by the tour and user services)
-- =======================================================================
DEFINE TABLE IF NOT EXISTS custom_tour SCHEMALESS;
DEFINE TABLE IF NOT EXISTS user SCHEMALESS;

-- =======================================================================
-- Document types (catalog)
-- =======================================================================
DEFINE TABLE document_type SCHEMAFULL;
DEFINE FIELD document_type_name ON TABLE document_type TYPE string \
    ASSERT string::len(string::trim($value)) > 0;
DEFINE FIELD description ON TABLE document_type TYPE option<string>;
DEFINE FIELD is_required ON TABLE document_type TYPE bool DEFAULT false;
DEFINE FIELD is_active ON TABLE document_type TYPE bool DEFAULT true;
DEFINE FIELD created_by ON TABLE document_type TYPE option<string>;
DEFINE FIELD created_date ON TABLE document_type TYPE datetime \
    DEFAULT time::now() READONLY;
DEFINE FIELD updated_date ON TABLE document_type TYPE datetime \
    VALUE time::now();
-- Case-sensitive: 'Passport' and 'passport' are distinct names.
DEFINE INDEX idx_document_type_name ON TABLE document_type \
    COLUMNS document_type_name UNIQUE;

-- =======================================================================
-- Tour documents
-- =======================================================================
DEFINE TABLE tour_document SCHEMAFULL;
DEFINE FIELD custom_tour_id ON TABLE tour_document TYPE string;
DEFINE FIELD document_name ON TABLE tour_document TYPE string \
    ASSERT string::len(string::trim($value)) > 0;
DEFINE FIELD description ON TABLE tour_document TYPE option<string>;
DEFINE FIELD file_name ON TABLE tour_document TYPE string \
    ASSERT string::len(string::trim($value)) > 0;
DEFINE FIELD file_url ON TABLE tour_document TYPE string \
    ASSERT string::len(string::trim($value)) > 0;
DEFINE FIELD file_size ON TABLE tour_document TYPE option<int> \
    ASSERT $value = NONE OR $value >= 0;
DEFINE FIELD uploaded_by ON TABLE tour_document TYPE string;
DEFINE FIELD is_visible_to_tourists ON TABLE tour_document TYPE bool \
    DEFAULT true;
DEFINE FIELD created_by ON TABLE tour_document TYPE option<string>;
DEFINE FIELD created_date ON TABLE tour_document TYPE datetime \
    DEFAULT time::now() READONLY;
DEFINE FIELD updated_date ON TABLE tour_document TYPE datetime \
    VALUE time::now();
DEFINE INDEX idx_tour_document_tour ON TABLE tour_document \
    COLUMNS custom_tour_id;
DEFINE INDEX idx_tour_document_uploader ON TABLE tour_document \
    COLUMNS uploaded_by;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Highest migration version recorded in `_migration`, or 0 when none is.
pub async fn schema_version<C: Connection>(db: &Surreal<C>) -> Result<u32, DbError> {
    let mut result = db
        .query("SELECT version FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let applied: Vec<MigrationRecord> = result.take(0)?;
    Ok(applied.into_iter().map(|m| m.version).max().unwrap_or(0))
}

/// Bring the database up to the newest schema version.
///
/// Safe to call on every start: migrations already recorded in
/// `_migration` are skipped.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(format!("tracking table: {e}")))?;

    let from = schema_version(db).await?;
    let pending: Vec<&Migration> = MIGRATIONS.iter().filter(|m| m.version > from).collect();
    if pending.is_empty() {
        debug!(version = from, "Schema is current");
        return Ok(());
    }

    for migration in pending {
        apply(db, migration).await?;
    }
    Ok(())
}

/// Apply one migration and its `_migration` row in a single transaction.
async fn apply<C: Connection>(db: &Surreal<C>, migration: &Migration) -> Result<(), DbError> {
    info!(version = migration.version, name = migration.name, "Migrating schema");

    let script = format!(
        "BEGIN TRANSACTION;\n{}\nCREATE _migration SET version = $version, name = $name;\n\
         COMMIT TRANSACTION;",
        migration.sql
    );
    db.query(script)
        .bind(("version", migration.version))
        .bind(("name", migration.name))
        .await?
        .check()
        .map_err(|e| {
            DbError::Migration(format!("v{} ({}): {e}", migration.version, migration.name))
        })?;

    info!(version = migration.version, "Schema migrated");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_ordered() {
        for window in MIGRATIONS.windows(2) {
            assert!(
                window[0].version < window[1].version,
                "Migrations must be in ascending version order"
            );
        }
    }

    #[test]
    fn migration_scripts_end_with_a_statement_terminator() {
        for migration in MIGRATIONS {
            assert!(migration.sql.trim_end().ends_with(';'), "v{}", migration.version);
        }
    }

    #[test]
    fn document_type_name_is_uniquely_indexed() {
        assert!(SCHEMA_V1.contains("COLUMNS document_type_name UNIQUE"));
    }

    #[test]
    fn timestamps_use_write_hooks() {
        assert_eq!(SCHEMA_V1.matches("DEFAULT time::now() READONLY").count(), 2);
        assert_eq!(SCHEMA_V1.matches("VALUE time::now()").count(), 2);
    }
}
