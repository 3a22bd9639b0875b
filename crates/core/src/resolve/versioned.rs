use std::collections::{HashMap, HashSet};

use super::VersionUpdate;
use crate::entity::{VERSION_TABLE, VersionRow, suffixed_name};

struct Staged<'a> {
    row: &'a VersionRow,
    needs_new_name: bool,
    needs_new_number: bool,
}

/// Resolves name and number collisions among model versions of one model.
///
/// Detection runs over the original values of every row before any fix is
/// computed. Numeric-form versions (name == number) are always moved together
/// to the next free number; custom names get an id suffix and, when their
/// number collided too, a fresh number.
#[must_use]
pub fn resolve_versions(rows: &[VersionRow]) -> Vec<VersionUpdate> {
    let mut existing_names: HashMap<&str, HashSet<&str>> = HashMap::new();
    let mut existing_numbers: HashMap<&str, HashSet<i64>> = HashMap::new();
    let mut staged = Vec::new();

    for row in rows {
        let names_for_group = existing_names.entry(row.group_id.as_str()).or_default();
        let numbers_for_group = existing_numbers.entry(row.group_id.as_str()).or_default();

        let needs_new_name = names_for_group.contains(row.name.as_str());
        let needs_new_number = numbers_for_group.contains(&row.number);

        if needs_new_name || needs_new_number {
            staged.push(Staged { row, needs_new_name, needs_new_number });
        }

        names_for_group.insert(row.name.as_str());
        numbers_for_group.insert(row.number);
    }

    let mut updates = Vec::with_capacity(staged.len());
    for Staged { row, needs_new_name, needs_new_number } in staged {
        let numbers_for_group = existing_numbers.entry(row.group_id.as_str()).or_default();
        let next_number =
            numbers_for_group.iter().copied().max().unwrap_or(0).saturating_add(1);

        let mut update = VersionUpdate {
            id: row.id.clone(),
            group_id: row.group_id.clone(),
            old_name: row.name.clone(),
            old_number: row.number,
            new_name: None,
            new_number: None,
        };

        if row.is_numeric_form() {
            update.new_number = Some(next_number);
            update.new_name = Some(next_number.to_string());
            numbers_for_group.insert(next_number);
        } else {
            if needs_new_name {
                update.new_name = Some(suffixed_name(&row.name, &row.id));
            }
            if needs_new_number {
                update.new_number = Some(next_number);
                numbers_for_group.insert(next_number);
            }
        }

        tracing::warn!(
            table = VERSION_TABLE,
            id = %row.id,
            model_id = %row.group_id,
            old_name = %row.name,
            new_name = %update.name(),
            old_number = row.number,
            new_number = update.number(),
            "Migrating model version {} (#{}) to {} (#{}) to resolve duplicate",
            row.name,
            row.number,
            update.name(),
            update.number()
        );
        updates.push(update);
    }

    updates
}
