//! Collaborator interfaces the migration runs against.
//!
//! The storage crate implements these over a SQLite transaction; tests use an
//! in-memory double.

use crate::entity::{EntityKind, SimpleRow, UniqueConstraint, VersionRow};
use crate::error::Result;
use crate::resolve::{NameUpdate, VersionUpdate};

/// Typed row access for the tables reconciled by the migration.
pub trait EntityStore {
    /// All rows of a simple entity table, in a stable order.
    fn read_simple(&self, kind: EntityKind) -> Result<Vec<SimpleRow>>;

    /// All model versions, in a stable order.
    fn read_versions(&self) -> Result<Vec<VersionRow>>;

    fn update_name(&self, update: &NameUpdate) -> Result<()>;

    /// Writes only the fields the update changes.
    fn update_version(&self, update: &VersionUpdate) -> Result<()>;
}

/// Issues uniqueness-constraint DDL.
pub trait ConstraintApplier {
    fn add_unique_constraint(&self, constraint: &UniqueConstraint) -> Result<()>;

    fn drop_unique_constraint(&self, constraint: &UniqueConstraint) -> Result<()>;
}
