use std::collections::{HashMap, HashSet};

use super::{NameUpdate, VersionUpdate};
use crate::entity::{EntityKind, SimpleRow, VERSION_TABLE, VersionRow};
use crate::error::{MigrationError, Result};

/// Checks that `(name, scope)` is unique once `updates` are applied.
///
/// # Errors
/// Returns [`MigrationError::RenameCollisionUnresolved`] naming the first value
/// that still collides.
pub fn verify_simple(kind: EntityKind, rows: &[SimpleRow], updates: &[NameUpdate]) -> Result<()> {
    let renamed: HashMap<&str, &str> =
        updates.iter().map(|u| (u.id.as_str(), u.new_name.as_str())).collect();
    let mut seen: HashSet<(&str, &str)> = HashSet::with_capacity(rows.len());

    for row in rows {
        let name = renamed.get(row.id.as_str()).copied().unwrap_or(row.name.as_str());
        if !seen.insert((row.scope_id.as_str(), name)) {
            return Err(MigrationError::RenameCollisionUnresolved {
                table: kind.table(),
                scope: row.scope_id.clone(),
                value: name.to_owned(),
            });
        }
    }
    Ok(())
}

/// Checks that `(name, group)` and `(number, group)` are unique once
/// `updates` are applied.
///
/// # Errors
/// Returns [`MigrationError::RenameCollisionUnresolved`] naming the first value
/// that still collides.
pub fn verify_versions(rows: &[VersionRow], updates: &[VersionUpdate]) -> Result<()> {
    let fixed: HashMap<&str, &VersionUpdate> = updates.iter().map(|u| (u.id.as_str(), u)).collect();
    let mut names: HashSet<(&str, &str)> = HashSet::with_capacity(rows.len());
    let mut numbers: HashSet<(&str, i64)> = HashSet::with_capacity(rows.len());

    for row in rows {
        let (name, number) = match fixed.get(row.id.as_str()) {
            Some(update) => (update.name(), update.number()),
            None => (row.name.as_str(), row.number),
        };
        let group = row.group_id.as_str();
        if !names.insert((group, name)) {
            return Err(collision(group, name.to_owned()));
        }
        if !numbers.insert((group, number)) {
            return Err(collision(group, number.to_string()));
        }
    }
    Ok(())
}

fn collision(group: &str, value: String) -> MigrationError {
    MigrationError::RenameCollisionUnresolved {
        table: VERSION_TABLE,
        scope: group.to_owned(),
        value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::{resolve_duplicate_names, resolve_versions};

    #[test]
    fn resolved_simple_rows_verify() {
        let rows = [
            SimpleRow::new("a1", "p", "ws1"),
            SimpleRow::new("b2", "p", "ws1"),
            SimpleRow::new("c3", "p", "ws2"),
        ];
        let updates = resolve_duplicate_names(EntityKind::Pipeline, &rows);
        assert!(verify_simple(EntityKind::Pipeline, &rows, &updates).is_ok());
    }

    #[test]
    fn one_shot_rename_collision_is_reported() {
        let rows = [
            SimpleRow::new("a1", "p", "ws1"),
            SimpleRow::new("c3", "p_b2b2b2", "ws1"),
            SimpleRow::new("b2b2b2ff", "p", "ws1"),
        ];
        let updates = resolve_duplicate_names(EntityKind::Pipeline, &rows);

        let err = verify_simple(EntityKind::Pipeline, &rows, &updates).unwrap_err();

        assert!(matches!(
            err,
            MigrationError::RenameCollisionUnresolved { table: "pipeline", ref value, .. }
                if value == "p_b2b2b2"
        ));
    }

    #[test]
    fn resolved_versions_verify() {
        let rows = [
            VersionRow::new("v1", "1", 1, "m1"),
            VersionRow::new("v2", "1", 1, "m1"),
            VersionRow::new("v3", "alpha", 2, "m1"),
            VersionRow::new("v4", "alpha", 2, "m1"),
        ];
        let updates = resolve_versions(&rows);
        assert!(verify_versions(&rows, &updates).is_ok());
    }

    #[test]
    fn unresolved_version_number_is_reported() {
        let rows = [VersionRow::new("v1", "a", 1, "m1"), VersionRow::new("v2", "b", 1, "m1")];

        let err = verify_versions(&rows, &[]).unwrap_err();

        assert!(matches!(
            err,
            MigrationError::RenameCollisionUnresolved { ref value, .. } if value == "1"
        ));
    }
}
