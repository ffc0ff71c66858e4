use camino::{Utf8Path, Utf8PathBuf};
use log::{info, warn};
use rusqlite::{Connection, Error as SqliteError, Statement, Transaction, ffi, params};
use silent_core::LocationRecord;
use thiserror::Error;

use super::SchemaRevision;
use crate::NormalisedBatch;

/// Errors raised while rebuilding the SQLite artefact.
#[derive(Debug, Error)]
pub enum StoreBuildError {
    /// Failed to create the parent directory for the SQLite artefact.
    #[error("failed to create parent directory for {path:?}")]
    CreateDirectory {
        /// Artefact path whose parent could not be created.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Removing the previous artefact or its journal failed.
    #[error("failed to remove previous artefact {path:?}")]
    RemoveExisting {
        /// Path of the stale file.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Opening the SQLite database failed.
    #[error("failed to open SQLite database at {path:?}")]
    Open {
        /// Destination database path.
        path: Utf8PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Recording the schema revision failed.
    #[error("failed to record schema revision {schema}")]
    UserVersion {
        /// Revision being recorded.
        schema: SchemaRevision,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Beginning the transaction failed.
    #[error("failed to begin store transaction")]
    BeginTransaction {
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Creating the `locations` table failed.
    #[error("failed to create locations table")]
    CreateSchema {
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Preparing the insert statement failed.
    #[error("failed to prepare location insert statement")]
    PrepareInsert {
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Writing a row failed for a reason other than a duplicate identifier.
    #[error("failed to persist location {id}")]
    PersistRow {
        /// Identifier of the row being persisted.
        id: i64,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Committing the transaction failed.
    #[error("failed to commit store transaction")]
    Commit {
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
}

/// A row skipped because its identifier was already present.
///
/// Recovered locally: the row is logged and counted, never propagated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("duplicate identifier {id} ({name}) skipped")]
pub struct DuplicateIdentifier {
    /// Conflicting store identifier.
    pub id: i64,
    /// Display name of the skipped row.
    pub name: String,
}

/// Outcome of a store build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreReport {
    /// Artefact path.
    pub path: Utf8PathBuf,
    /// Revision written.
    pub schema: SchemaRevision,
    /// Rows written.
    pub accepted: u64,
    /// Rows dropped earlier by the name denylist.
    pub excluded_by_name: u64,
    /// Rows skipped on identifier collisions.
    pub duplicates: Vec<DuplicateIdentifier>,
}

/// Path of the rollback journal SQLite keeps next to `path`.
#[must_use]
pub fn journal_path(path: &Utf8Path) -> Utf8PathBuf {
    Utf8PathBuf::from(format!("{path}-journal"))
}

/// Rebuild the SQLite artefact at `path` from a normalised batch.
///
/// Any existing file at `path`, and its stale journal, is deleted first.
/// Rows are inserted in one transaction; a primary-key collision skips the
/// offending row and the load continues. Any other SQLite failure aborts
/// the build.
///
/// # Examples
/// ```
/// use camino::Utf8PathBuf;
/// use silent_data::{NormalisedBatch, SchemaRevision, build_store};
///
/// let dir = tempfile::tempdir().expect("temp dir");
/// let path = Utf8PathBuf::from_path_buf(dir.path().join("silent_locations.db")).expect("utf-8");
/// let report = build_store(&path, &NormalisedBatch::default(), SchemaRevision::Current)
///     .expect("empty store builds");
/// assert_eq!(report.accepted, 0);
/// ```
pub fn build_store(
    path: &Utf8Path,
    batch: &NormalisedBatch,
    schema: SchemaRevision,
) -> Result<StoreReport, StoreBuildError> {
    silent_fs::ensure_parent_dir(path).map_err(|source| StoreBuildError::CreateDirectory {
        path: path.to_path_buf(),
        source,
    })?;
    for stale in [path.to_path_buf(), journal_path(path)] {
        let removed = silent_fs::remove_file_if_exists(&stale)
            .map_err(|source| StoreBuildError::RemoveExisting {
                path: stale.clone(),
                source,
            })?;
        if removed {
            info!("Removed previous artefact {stale}");
        }
    }

    let mut connection =
        Connection::open(path.as_std_path()).map_err(|source| StoreBuildError::Open {
            path: path.to_path_buf(),
            source,
        })?;
    connection
        .pragma_update(None, "user_version", schema.user_version())
        .map_err(|source| StoreBuildError::UserVersion { schema, source })?;

    let transaction = connection
        .transaction()
        .map_err(|source| StoreBuildError::BeginTransaction { source })?;
    transaction
        .execute(schema.create_table_sql(), [])
        .map_err(|source| StoreBuildError::CreateSchema { source })?;
    let (accepted, duplicates) = persist_rows(&transaction, &batch.records, schema)?;
    transaction
        .commit()
        .map_err(|source| StoreBuildError::Commit { source })?;

    info!(
        "Wrote {accepted} locations to {path} ({schema} schema, {} duplicates skipped)",
        duplicates.len()
    );
    Ok(StoreReport {
        path: path.to_path_buf(),
        schema,
        accepted,
        excluded_by_name: batch.excluded_by_name,
        duplicates,
    })
}

fn persist_rows(
    transaction: &Transaction<'_>,
    records: &[LocationRecord],
    schema: SchemaRevision,
) -> Result<(u64, Vec<DuplicateIdentifier>), StoreBuildError> {
    let mut statement = transaction
        .prepare(schema.insert_sql())
        .map_err(|source| StoreBuildError::PrepareInsert { source })?;
    let mut accepted = 0;
    let mut duplicates = Vec::new();

    for record in records {
        match insert_row(&mut statement, record, schema) {
            Ok(()) => accepted += 1,
            Err(source) if is_primary_key_violation(&source) => {
                let duplicate = DuplicateIdentifier {
                    id: record.id,
                    name: record.name.clone(),
                };
                warn!("{duplicate}");
                duplicates.push(duplicate);
            }
            Err(source) => {
                return Err(StoreBuildError::PersistRow {
                    id: record.id,
                    source,
                });
            }
        }
    }
    Ok((accepted, duplicates))
}

fn insert_row(
    statement: &mut Statement<'_>,
    record: &LocationRecord,
    schema: SchemaRevision,
) -> Result<(), SqliteError> {
    let category = record.category.as_str();
    if schema.has_address() {
        statement.execute(params![
            record.id,
            record.name,
            record.lat,
            record.lon,
            category,
            record.address
        ])?;
    } else {
        statement.execute(params![
            record.id,
            record.name,
            record.lat,
            record.lon,
            category
        ])?;
    }
    Ok(())
}

fn is_primary_key_violation(error: &SqliteError) -> bool {
    matches!(
        error,
        SqliteError::SqliteFailure(failure, _)
            if failure.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                || failure.extended_code == ffi::SQLITE_CONSTRAINT_ROWID
    )
}
