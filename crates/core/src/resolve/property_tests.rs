//! Generated-input checks of the resolver post-conditions.
//!
//! Small name and number alphabets make collisions frequent. Every input
//! either resolves to a unique, stable state or is rejected as an
//! unresolvable rename.

use std::collections::{HashMap, HashSet};

use proptest::prelude::*;

use super::{
    NameUpdate, VersionUpdate, resolve_duplicate_names, resolve_versions, verify_simple,
    verify_versions,
};
use crate::entity::{EntityKind, SimpleRow, VersionRow, suffixed_name};
use crate::error::MigrationError;

fn arb_simple_rows() -> impl Strategy<Value = Vec<SimpleRow>> {
    let name = prop_oneof![Just("p"), Just("q"), Just("p_id0001"), Just("p_id0002")];
    let scope = prop_oneof![Just("ws1"), Just("ws2")];
    prop::collection::vec((name, scope), 0..8).prop_map(|cells| {
        cells
            .into_iter()
            .enumerate()
            .map(|(i, (name, scope))| SimpleRow::new(format!("id{i:04}ff"), name, scope))
            .collect()
    })
}

fn arb_version_rows() -> impl Strategy<Value = Vec<VersionRow>> {
    let name = prop_oneof![Just("1"), Just("2"), Just("3"), Just("a"), Just("a_id0001")];
    let group = prop_oneof![Just("m1"), Just("m2")];
    prop::collection::vec((name, 1i64..=4, group), 0..8).prop_map(|cells| {
        cells
            .into_iter()
            .enumerate()
            .map(|(i, (name, number, group))| {
                VersionRow::new(format!("id{i:04}ff"), name, number, group)
            })
            .collect()
    })
}

fn apply_names(rows: &[SimpleRow], updates: &[NameUpdate]) -> Vec<SimpleRow> {
    let renamed: HashMap<&str, &str> =
        updates.iter().map(|u| (u.id.as_str(), u.new_name.as_str())).collect();
    rows.iter()
        .map(|row| {
            let name = renamed.get(row.id.as_str()).copied().unwrap_or(row.name.as_str());
            SimpleRow::new(row.id.as_str(), name, row.scope_id.as_str())
        })
        .collect()
}

fn apply_versions(rows: &[VersionRow], updates: &[VersionUpdate]) -> Vec<VersionRow> {
    let fixed: HashMap<&str, &VersionUpdate> = updates.iter().map(|u| (u.id.as_str(), u)).collect();
    rows.iter()
        .map(|row| match fixed.get(row.id.as_str()) {
            Some(u) => {
                VersionRow::new(row.id.as_str(), u.name(), u.number(), row.group_id.as_str())
            },
            None => row.clone(),
        })
        .collect()
}

proptest! {
    #[test]
    fn simple_resolution_is_unique_stable_and_first_seen_wins(rows in arb_simple_rows()) {
        let kind = EntityKind::Pipeline;
        let updates = resolve_duplicate_names(kind, &rows);

        match verify_simple(kind, &rows, &updates) {
            Ok(()) => {
                let resolved = apply_names(&rows, &updates);
                let distinct: HashSet<_> =
                    resolved.iter().map(|r| (r.scope_id.as_str(), r.name.as_str())).collect();
                prop_assert_eq!(distinct.len(), resolved.len());
                prop_assert!(resolve_duplicate_names(kind, &resolved).is_empty());
            },
            Err(err) => {
                let is_collision =
                    matches!(err, MigrationError::RenameCollisionUnresolved { .. });
                prop_assert!(is_collision, "unexpected error: {}", err);
            },
        }

        let mut first_seen: HashSet<(&str, &str)> = HashSet::new();
        let first_ids: HashSet<&str> = rows
            .iter()
            .filter(|r| first_seen.insert((r.scope_id.as_str(), r.name.as_str())))
            .map(|r| r.id.as_str())
            .collect();
        for update in &updates {
            prop_assert!(!first_ids.contains(update.id.as_str()));
            prop_assert_eq!(&update.new_name, &suffixed_name(&update.old_name, &update.id));
        }
    }

    #[test]
    fn version_resolution_is_unique_stable_and_coupled(rows in arb_version_rows()) {
        let updates = resolve_versions(&rows);

        match verify_versions(&rows, &updates) {
            Ok(()) => {
                let resolved = apply_versions(&rows, &updates);
                let names: HashSet<_> =
                    resolved.iter().map(|r| (r.group_id.as_str(), r.name.as_str())).collect();
                let numbers: HashSet<_> =
                    resolved.iter().map(|r| (r.group_id.as_str(), r.number)).collect();
                prop_assert_eq!(names.len(), resolved.len());
                prop_assert_eq!(numbers.len(), resolved.len());
                prop_assert!(resolve_versions(&resolved).is_empty());
            },
            Err(err) => {
                let is_collision =
                    matches!(err, MigrationError::RenameCollisionUnresolved { .. });
                prop_assert!(is_collision, "unexpected error: {}", err);
            },
        }

        for update in &updates {
            if update.old_number.to_string() == update.old_name {
                let number = update.new_number.expect("numeric-form version gets a new number");
                prop_assert_eq!(update.new_name.clone(), Some(number.to_string()));
            } else if let Some(name) = &update.new_name {
                prop_assert_eq!(name, &suffixed_name(&update.old_name, &update.id));
            }
        }
    }
}
