//! Migration v2: resolve duplicate names, then add unique name constraints.
//!
//! The downgrade only drops the constraints. Rows renamed or renumbered by the
//! upgrade keep their new values.

use rusqlite::Transaction;
use uniquify_core::{MigrationError, MigrationReport, orchestrator};

use crate::storage::SqliteEntityStore;

pub(super) fn upgrade(tx: &Transaction<'_>) -> Result<MigrationReport, MigrationError> {
    orchestrator::forward(&SqliteEntityStore::new(tx))
}

pub(super) fn downgrade(tx: &Transaction<'_>) -> Result<(), MigrationError> {
    orchestrator::backward(&SqliteEntityStore::new(tx))
}
