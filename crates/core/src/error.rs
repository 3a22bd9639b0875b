use std::result::Result as StdResult;

use thiserror::Error;

/// Errors raised while reconciling names or applying uniqueness constraints.
///
/// Every variant is fatal: the caller owns the transaction and rolls it back.
#[derive(Error, Debug)]
pub enum MigrationError {
    #[error("failed to read {table}: {message}")]
    ReadFailure { table: &'static str, message: String },

    #[error("failed to update {table} row {id}: {message}")]
    WriteFailure { table: &'static str, id: String, message: String },

    #[error("constraint {constraint} rejected by the store: {message}")]
    ConstraintViolation { constraint: &'static str, message: String },

    /// A rewritten value still collides with another row in the same scope.
    #[error("rewritten value {value:?} in {table} still collides within scope {scope}")]
    RenameCollisionUnresolved { table: &'static str, scope: String, value: String },

    #[error("schema error: {0}")]
    Schema(String),
}

pub type Result<T> = StdResult<T, MigrationError>;
