//! Typed error enum for the storage layer.

use thiserror::Error;
use uniquify_core::MigrationError;

/// Storage-layer error covering connection, SQL and migration failures.
#[derive(Debug, Error)]
pub enum StorageError {
    /// SQL or connection failure outside a migration step.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Could not obtain a pooled connection.
    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// A migration step failed and its transaction was rolled back.
    #[error("migration v{version} failed: {source}")]
    Migration {
        version: i32,
        #[source]
        source: MigrationError,
    },

    /// The dry-run rename plan could not be computed; nothing was written.
    #[error("cannot compute rename plan: {0}")]
    Plan(#[source] MigrationError),

    /// Requested schema version is outside what this build can reach.
    #[error("cannot move schema from v{current} to v{target}")]
    UnsupportedTarget { current: i32, target: i32 },
}

impl StorageError {
    /// Whether the failure was a uniqueness collision left after resolution.
    pub fn is_collision(&self) -> bool {
        matches!(
            self,
            Self::Migration {
                source: MigrationError::ConstraintViolation { .. }
                    | MigrationError::RenameCollisionUnresolved { .. },
                ..
            }
        )
    }
}

pub type Result<T> = std::result::Result<T, StorageError>;
