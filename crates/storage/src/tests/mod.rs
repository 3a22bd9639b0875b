//! Test utilities and module declarations for storage tests.

use rusqlite::params;
use tempfile::TempDir;

use crate::storage::get_conn;
use crate::{Storage, StorageConfig};

#[expect(clippy::unwrap_used, reason = "test code")]
pub fn create_test_storage() -> (Storage, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");
    let storage = Storage::open(&db_path, StorageConfig::default()).unwrap();
    storage.init().unwrap();
    (storage, temp_dir)
}

#[expect(clippy::unwrap_used, reason = "test code")]
pub fn insert_named(storage: &Storage, table: &str, id: &str, name: &str, workspace: &str) {
    let conn = get_conn(&storage.pool).unwrap();
    conn.execute(
        &format!("INSERT INTO {table} (id, name, workspace_id) VALUES (?1, ?2, ?3)"),
        params![id, name, workspace],
    )
    .unwrap();
}

#[expect(clippy::unwrap_used, reason = "test code")]
pub fn insert_version(storage: &Storage, id: &str, name: &str, number: i64, model_id: &str) {
    let conn = get_conn(&storage.pool).unwrap();
    // model_version.model_id is a foreign key into model.
    conn.execute(
        "INSERT OR IGNORE INTO model (id, name, workspace_id) VALUES (?1, ?1, 'ws1')",
        [model_id],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO model_version (id, name, number, model_id) VALUES (?1, ?2, ?3, ?4)",
        params![id, name, number, model_id],
    )
    .unwrap();
}

#[expect(clippy::unwrap_used, reason = "test code")]
pub fn name_of(storage: &Storage, table: &str, id: &str) -> String {
    let conn = get_conn(&storage.pool).unwrap();
    conn.query_row(&format!("SELECT name FROM {table} WHERE id = ?1"), [id], |row| row.get(0))
        .unwrap()
}

#[expect(clippy::unwrap_used, reason = "test code")]
pub fn version_of(storage: &Storage, id: &str) -> (String, i64) {
    let conn = get_conn(&storage.pool).unwrap();
    conn.query_row("SELECT name, number FROM model_version WHERE id = ?1", [id], |row| {
        Ok((row.get(0)?, row.get(1)?))
    })
    .unwrap()
}
