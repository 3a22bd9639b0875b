//! rusqlite implementation of the reconciliation collaborators.
//!
//! Columns are always addressed by name so the reader keeps working when
//! later schema versions add or reorder columns.

use rusqlite::{Connection, ErrorCode, params};
use uniquify_core::{
    ConstraintApplier, EntityKind, EntityStore, MigrationError, NameUpdate, SimpleRow,
    UniqueConstraint, VERSION_TABLE, VersionRow, VersionUpdate,
};

/// Entity access and constraint DDL over one connection, usually the
/// transaction of the running migration step.
pub struct SqliteEntityStore<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteEntityStore<'c> {
    pub const fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }
}

fn read_failure(table: &'static str) -> impl Fn(rusqlite::Error) -> MigrationError {
    move |e| MigrationError::ReadFailure { table, message: e.to_string() }
}

fn write_failure(table: &'static str, id: &str) -> impl Fn(rusqlite::Error) -> MigrationError {
    let id = id.to_owned();
    move |e| MigrationError::WriteFailure { table, id: id.clone(), message: e.to_string() }
}

fn expect_one_row(changed: usize, table: &'static str, id: &str) -> Result<(), MigrationError> {
    if changed == 1 {
        Ok(())
    } else {
        Err(MigrationError::WriteFailure {
            table,
            id: id.to_owned(),
            message: format!("expected to update 1 row, updated {changed}"),
        })
    }
}

impl EntityStore for SqliteEntityStore<'_> {
    fn read_simple(&self, kind: EntityKind) -> Result<Vec<SimpleRow>, MigrationError> {
        let table = kind.table();
        let scope_column = kind.scope_column();
        let sql = format!("SELECT id, name, {scope_column} FROM {table} ORDER BY rowid");
        let mut stmt = self.conn.prepare(&sql).map_err(read_failure(table))?;
        let rows = stmt
            .query_map([], |row| {
                Ok(SimpleRow {
                    id: row.get("id")?,
                    name: row.get("name")?,
                    scope_id: row.get(scope_column)?,
                })
            })
            .map_err(read_failure(table))?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(read_failure(table))
    }

    fn read_versions(&self) -> Result<Vec<VersionRow>, MigrationError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, number, model_id FROM model_version ORDER BY rowid")
            .map_err(read_failure(VERSION_TABLE))?;
        let rows = stmt
            .query_map([], |row| {
                Ok(VersionRow {
                    id: row.get("id")?,
                    name: row.get("name")?,
                    number: row.get("number")?,
                    group_id: row.get("model_id")?,
                })
            })
            .map_err(read_failure(VERSION_TABLE))?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(read_failure(VERSION_TABLE))
    }

    fn update_name(&self, update: &NameUpdate) -> Result<(), MigrationError> {
        let table = update.kind.table();
        let sql = format!("UPDATE {table} SET name = ?1 WHERE id = ?2");
        let changed = self
            .conn
            .execute(&sql, params![update.new_name, update.id])
            .map_err(write_failure(table, &update.id))?;
        expect_one_row(changed, table, &update.id)
    }

    fn update_version(&self, update: &VersionUpdate) -> Result<(), MigrationError> {
        let result = match (&update.new_name, update.new_number) {
            (Some(name), Some(number)) => self.conn.execute(
                "UPDATE model_version SET name = ?1, number = ?2 WHERE id = ?3",
                params![name, number, update.id],
            ),
            (Some(name), None) => self.conn.execute(
                "UPDATE model_version SET name = ?1 WHERE id = ?2",
                params![name, update.id],
            ),
            (None, Some(number)) => self.conn.execute(
                "UPDATE model_version SET number = ?1 WHERE id = ?2",
                params![number, update.id],
            ),
            (None, None) => return Ok(()),
        };
        let changed = result.map_err(write_failure(VERSION_TABLE, &update.id))?;
        expect_one_row(changed, VERSION_TABLE, &update.id)
    }
}

impl ConstraintApplier for SqliteEntityStore<'_> {
    /// SQLite has no `ADD CONSTRAINT`; a named unique index enforces the same
    /// rule and can be dropped by name.
    fn add_unique_constraint(&self, constraint: &UniqueConstraint) -> Result<(), MigrationError> {
        let sql = format!(
            "CREATE UNIQUE INDEX {} ON {} ({})",
            constraint.name,
            constraint.table,
            constraint.columns.join(", ")
        );
        tracing::debug!(constraint = constraint.name, %sql, "adding unique constraint");
        self.conn.execute_batch(&sql).map_err(|e| match e {
            rusqlite::Error::SqliteFailure(ref err, _)
                if err.code == ErrorCode::ConstraintViolation =>
            {
                MigrationError::ConstraintViolation {
                    constraint: constraint.name,
                    message: e.to_string(),
                }
            },
            other => MigrationError::Schema(format!("{}: {other}", constraint.name)),
        })
    }

    fn drop_unique_constraint(&self, constraint: &UniqueConstraint) -> Result<(), MigrationError> {
        tracing::debug!(constraint = constraint.name, "dropping unique constraint");
        self.conn
            .execute_batch(&format!("DROP INDEX {}", constraint.name))
            .map_err(|e| MigrationError::Schema(format!("{}: {e}", constraint.name)))
    }
}
