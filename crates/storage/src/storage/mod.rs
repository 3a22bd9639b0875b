//! `SQLite` storage: connection pool, migration entry points and status.

mod entity_store;

use std::path::Path;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use serde::Serialize;
use uniquify_core::{MigrationReport, ResolutionPlan, UNIQUE_CONSTRAINTS, orchestrator};

pub use entity_store::SqliteEntityStore;

use crate::config::StorageConfig;
use crate::error::{Result, StorageError};
use crate::migrations::{self, SCHEMA_VERSION};

/// Type alias for pooled connection
pub(crate) type PooledConn = PooledConnection<SqliteConnectionManager>;

/// Main storage struct wrapping a `SQLite` connection pool
#[derive(Clone, Debug)]
pub struct Storage {
    pub(crate) pool: Pool<SqliteConnectionManager>,
}

/// Presence of one unique constraint in the current schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConstraintStatus {
    pub name: &'static str,
    pub table: &'static str,
    pub present: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaStatus {
    pub version: i32,
    pub latest_version: i32,
    pub constraints: Vec<ConstraintStatus>,
}

/// Get a connection from the pool
pub(crate) fn get_conn(pool: &Pool<SqliteConnectionManager>) -> Result<PooledConn> {
    Ok(pool.get()?)
}

impl Storage {
    /// Opens (or creates) the database file. Migrations are not run.
    ///
    /// # Errors
    /// Returns error if the pool cannot establish its first connection.
    pub fn open(db_path: &Path, config: StorageConfig) -> Result<Self> {
        let busy_timeout_ms = config.busy_timeout_ms;
        let manager = SqliteConnectionManager::file(db_path).with_init(move |conn| {
            conn.execute_batch(&format!(
                "PRAGMA busy_timeout = {busy_timeout_ms};
                 PRAGMA foreign_keys = ON;
                 PRAGMA journal_mode = WAL;
                 PRAGMA synchronous = NORMAL;"
            ))
        });

        let pool = Pool::builder().max_size(config.pool_size).build(manager)?;

        tracing::info!(
            path = %db_path.display(),
            pool_size = config.pool_size,
            "Storage opened"
        );
        Ok(Self { pool })
    }

    /// Current `user_version` of the schema.
    ///
    /// # Errors
    /// Returns error on connection or pragma failure.
    pub fn schema_version(&self) -> Result<i32> {
        let conn = get_conn(&self.pool)?;
        Ok(migrations::schema_version(&conn)?)
    }

    /// Creates the entity tables without touching existing data.
    ///
    /// # Errors
    /// Returns error if the base schema cannot be created.
    pub fn init(&self) -> Result<()> {
        let mut conn = get_conn(&self.pool)?;
        if migrations::schema_version(&conn)? < migrations::BASE_VERSION {
            migrations::run_migrations(&mut conn, migrations::BASE_VERSION)?;
        }
        Ok(())
    }

    /// Applies all pending migrations.
    ///
    /// Returns the reconciliation report when the unique-names step ran in
    /// this call.
    ///
    /// # Errors
    /// Returns error if any step fails; that step is rolled back and earlier
    /// steps stay committed.
    pub fn upgrade(&self) -> Result<Option<MigrationReport>> {
        let mut conn = get_conn(&self.pool)?;
        migrations::run_migrations(&mut conn, SCHEMA_VERSION)
    }

    /// Reverts the schema down to `target`.
    ///
    /// Only constraints are removed: renamed and renumbered rows are not
    /// restored.
    ///
    /// # Errors
    /// Returns [`StorageError::UnsupportedTarget`] for targets below the base
    /// schema or above the current version.
    pub fn downgrade(&self, target: i32) -> Result<()> {
        let mut conn = get_conn(&self.pool)?;
        migrations::revert_migrations(&mut conn, target)
    }

    /// Renames the unique-names step would apply, computed without writing.
    ///
    /// # Errors
    /// Returns error if the entity tables cannot be read.
    pub fn plan(&self) -> Result<ResolutionPlan> {
        let conn = get_conn(&self.pool)?;
        orchestrator::plan(&SqliteEntityStore::new(&conn)).map_err(StorageError::Plan)
    }

    /// Schema version and which unique constraints currently exist.
    ///
    /// # Errors
    /// Returns error on query failure.
    pub fn status(&self) -> Result<SchemaStatus> {
        let conn = get_conn(&self.pool)?;
        let constraints = UNIQUE_CONSTRAINTS
            .iter()
            .map(|c| -> rusqlite::Result<ConstraintStatus> {
                Ok(ConstraintStatus {
                    name: c.name,
                    table: c.table,
                    present: index_exists(&conn, c.name)?,
                })
            })
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(SchemaStatus {
            version: migrations::schema_version(&conn)?,
            latest_version: SCHEMA_VERSION,
            constraints,
        })
    }
}

fn index_exists(conn: &Connection, name: &str) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'index' AND name = ?1)",
        [name],
        |row| row.get(0),
    )
}
