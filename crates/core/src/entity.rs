//! Row shapes and the catalogue of tables and constraints touched by the
//! unique-names migration.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of id characters appended when a duplicate name is rewritten.
pub const ID_SUFFIX_LEN: usize = 6;

/// Table holding versioned entities (two uniqueness dimensions per model).
pub const VERSION_TABLE: &str = "model_version";

/// Entity kinds whose name must be unique within a workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    PipelineRun,
    Pipeline,
    Model,
}

impl EntityKind {
    /// Resolution order used by the forward migration.
    pub const ALL: [Self; 3] = [Self::PipelineRun, Self::Pipeline, Self::Model];

    #[must_use]
    pub const fn table(self) -> &'static str {
        match self {
            Self::PipelineRun => "pipeline_run",
            Self::Pipeline => "pipeline",
            Self::Model => "model",
        }
    }

    /// Column naming the scope a name must be unique in.
    #[must_use]
    pub const fn scope_column(self) -> &'static str {
        "workspace_id"
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table())
    }
}

/// A row of a simple entity table: `(name, scope_id)` must become unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleRow {
    pub id: String,
    pub name: String,
    pub scope_id: String,
}

impl SimpleRow {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        scope_id: impl Into<String>,
    ) -> Self {
        Self { id: id.into(), name: name.into(), scope_id: scope_id.into() }
    }
}

/// A model version: both `(name, group_id)` and `(number, group_id)` must
/// become unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRow {
    pub id: String,
    pub name: String,
    pub number: i64,
    pub group_id: String,
}

impl VersionRow {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        number: i64,
        group_id: impl Into<String>,
    ) -> Self {
        Self { id: id.into(), name: name.into(), number, group_id: group_id.into() }
    }

    /// Whether the name is exactly the decimal rendering of the number.
    #[must_use]
    pub fn is_numeric_form(&self) -> bool {
        self.number.to_string() == self.name
    }
}

/// A named uniqueness constraint over one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UniqueConstraint {
    pub name: &'static str,
    pub table: &'static str,
    pub columns: &'static [&'static str],
}

/// Constraints added by the forward migration, in creation order.
/// The backward migration drops them in reverse.
pub const UNIQUE_CONSTRAINTS: [UniqueConstraint; 5] = [
    UniqueConstraint {
        name: "unique_pipeline_name_in_workspace",
        table: "pipeline",
        columns: &["name", "workspace_id"],
    },
    UniqueConstraint {
        name: "unique_run_name_in_workspace",
        table: "pipeline_run",
        columns: &["name", "workspace_id"],
    },
    UniqueConstraint {
        name: "unique_model_name_in_workspace",
        table: "model",
        columns: &["name", "workspace_id"],
    },
    UniqueConstraint {
        name: "unique_version_for_model_id",
        table: VERSION_TABLE,
        columns: &["name", "model_id"],
    },
    UniqueConstraint {
        name: "unique_version_number_for_model_id",
        table: VERSION_TABLE,
        columns: &["number", "model_id"],
    },
];

/// `name` with the first [`ID_SUFFIX_LEN`] characters of `id` appended.
#[must_use]
pub fn suffixed_name(name: &str, id: &str) -> String {
    let prefix: String = id.chars().take(ID_SUFFIX_LEN).collect();
    format!("{name}_{prefix}")
}
