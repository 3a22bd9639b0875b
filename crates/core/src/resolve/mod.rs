//! Conflict detection and renaming ahead of uniqueness constraints.
//!
//! Resolvers are pure: they take the rows as read from the store and return
//! the updates to stage. All bookkeeping lives for one call only.

mod simple;
mod verify;
mod versioned;

#[cfg(test)]
mod property_tests;

use serde::Serialize;

use crate::entity::EntityKind;

pub use simple::resolve_duplicate_names;
pub use verify::{verify_simple, verify_versions};
pub use versioned::resolve_versions;

/// Rename of a simple entity row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameUpdate {
    pub kind: EntityKind,
    pub id: String,
    pub old_name: String,
    pub new_name: String,
}

/// Rename and/or renumber of a model version row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionUpdate {
    pub id: String,
    pub group_id: String,
    pub old_name: String,
    pub old_number: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_number: Option<i64>,
}

impl VersionUpdate {
    #[must_use]
    pub fn name(&self) -> &str {
        self.new_name.as_deref().unwrap_or(&self.old_name)
    }

    #[must_use]
    pub const fn number(&self) -> i64 {
        match self.new_number {
            Some(n) => n,
            None => self.old_number,
        }
    }
}

/// Every update the forward migration would apply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionPlan {
    pub names: Vec<NameUpdate>,
    pub versions: Vec<VersionUpdate>,
}

impl ResolutionPlan {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty() && self.versions.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len().saturating_add(self.versions.len())
    }
}
