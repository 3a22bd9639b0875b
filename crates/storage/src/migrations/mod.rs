#![allow(
    clippy::redundant_pub_crate,
    reason = "migrations module is private, pub(crate) is intentional"
)]

mod v1;
mod v2;

use rusqlite::{Connection, Transaction};
use uniquify_core::{MigrationError, MigrationReport};

use crate::error::{Result, StorageError};

/// Lowest version a downgrade may target; dropping the entity tables is not
/// offered.
pub(crate) const BASE_VERSION: i32 = 1;

pub const SCHEMA_VERSION: i32 = 2;

pub(crate) fn schema_version(conn: &Connection) -> rusqlite::Result<i32> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
}

/// Runs `step` and bumps `user_version` inside a single transaction.
///
/// Any error drops the transaction, which rolls every write of the step back.
fn in_transaction<T>(
    conn: &mut Connection,
    version: i32,
    recorded_version: i32,
    step: impl FnOnce(&Transaction<'_>) -> std::result::Result<T, MigrationError>,
) -> Result<T> {
    let tx = conn.transaction()?;
    let out = step(&tx).map_err(|source| StorageError::Migration { version, source })?;
    tx.pragma_update(None, "user_version", recorded_version)?;
    tx.commit()?;
    Ok(out)
}

/// Applies every pending migration up to `target`.
///
/// Returns the reconciliation report when the unique-names step ran.
pub(crate) fn run_migrations(
    conn: &mut Connection,
    target: i32,
) -> Result<Option<MigrationReport>> {
    let current_version = schema_version(conn)?;
    if target > SCHEMA_VERSION || target < 0 {
        return Err(StorageError::UnsupportedTarget { current: current_version, target });
    }

    tracing::info!("Database schema version: {} (target: {})", current_version, target);

    let mut report = None;

    if current_version < 1i32 && target >= 1i32 {
        tracing::info!("Running migration v1: entity tables");
        in_transaction(conn, 1, 1, |tx| {
            tx.execute_batch(v1::SQL).map_err(|e| MigrationError::Schema(e.to_string()))
        })?;
    }

    if current_version < 2i32 && target >= 2i32 {
        tracing::info!("Running migration v2: unique name constraints");
        report = Some(in_transaction(conn, 2, 2, v2::upgrade)?);
    }

    tracing::info!("Database schema up to date (version {})", schema_version(conn)?);
    Ok(report)
}

/// Reverts applied migrations down to `target`.
pub(crate) fn revert_migrations(conn: &mut Connection, target: i32) -> Result<()> {
    let current_version = schema_version(conn)?;
    if target < BASE_VERSION || target > current_version {
        return Err(StorageError::UnsupportedTarget { current: current_version, target });
    }

    if current_version >= 2i32 && target < 2i32 {
        tracing::info!("Reverting migration v2: unique name constraints");
        in_transaction(conn, 2, 1, v2::downgrade)?;
    }

    tracing::info!("Database schema reverted to version {}", schema_version(conn)?);
    Ok(())
}
