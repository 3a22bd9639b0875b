//! SQLite storage for uniquify.
//!
//! Hosts the entity tables, the versioned migration runner and the
//! rusqlite implementation of the reconciliation collaborators.

mod config;
mod error;
mod migrations;
mod storage;
#[cfg(test)]
mod tests;

pub use config::StorageConfig;
pub use error::{Result, StorageError};
pub use migrations::SCHEMA_VERSION;
pub use storage::{ConstraintStatus, SchemaStatus, SqliteEntityStore, Storage};
