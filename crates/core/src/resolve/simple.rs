use std::collections::{HashMap, HashSet};

use super::NameUpdate;
use crate::entity::{EntityKind, SimpleRow, suffixed_name};

/// Renames every row whose name was already seen in its scope.
///
/// First-seen-wins: the earliest row keeps its name, later ones get
/// `name_<first 6 chars of id>`. The new name joins the seen-set but is not
/// itself checked against it.
#[must_use]
pub fn resolve_duplicate_names(kind: EntityKind, rows: &[SimpleRow]) -> Vec<NameUpdate> {
    let mut existing: HashMap<&str, HashSet<String>> = HashMap::new();
    let mut updates = Vec::new();

    for row in rows {
        let names_in_scope = existing.entry(row.scope_id.as_str()).or_default();

        if names_in_scope.contains(&row.name) {
            let new_name = suffixed_name(&row.name, &row.id);
            tracing::warn!(
                table = kind.table(),
                id = %row.id,
                old = %row.name,
                new = %new_name,
                "Migrating {} name from {} to {} to resolve duplicate name",
                kind,
                row.name,
                new_name
            );
            names_in_scope.insert(new_name.clone());
            updates.push(NameUpdate {
                kind,
                id: row.id.clone(),
                old_name: row.name.clone(),
                new_name,
            });
        } else {
            names_in_scope.insert(row.name.clone());
        }
    }

    updates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, name: &str, scope: &str) -> SimpleRow {
        SimpleRow::new(id, name, scope)
    }

    #[test]
    fn later_duplicate_gets_id_suffix() {
        let rows = [row("a1000000", "p", "ws1"), row("b2c3d4e5", "p", "ws1")];

        let updates = resolve_duplicate_names(EntityKind::Pipeline, &rows);

        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].id, "b2c3d4e5");
        assert_eq!(updates[0].old_name, "p");
        assert_eq!(updates[0].new_name, "p_b2c3d4");
    }

    #[test]
    fn same_name_in_different_scopes_is_untouched() {
        let rows = [row("a1", "p", "ws1"), row("b2", "p", "ws2")];
        assert!(resolve_duplicate_names(EntityKind::Model, &rows).is_empty());
    }

    #[test]
    fn every_later_duplicate_is_renamed() {
        let rows = [
            row("aaaaaa01", "run", "ws1"),
            row("bbbbbb02", "run", "ws1"),
            row("cccccc03", "run", "ws1"),
        ];

        let updates = resolve_duplicate_names(EntityKind::PipelineRun, &rows);

        let renamed: Vec<_> = updates.iter().map(|u| u.new_name.as_str()).collect();
        assert_eq!(renamed, ["run_bbbbbb", "run_cccccc"]);
    }

    #[test]
    fn synthesized_name_is_not_rechecked() {
        // "p_b2b2b2" already exists, the one-shot rename collides with it.
        let rows = [
            row("a1", "p", "ws1"),
            row("c3", "p_b2b2b2", "ws1"),
            row("b2b2b2ff", "p", "ws1"),
        ];

        let updates = resolve_duplicate_names(EntityKind::Pipeline, &rows);

        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].new_name, "p_b2b2b2");
    }

    #[test]
    fn renamed_value_counts_as_seen() {
        // The third row's original name equals the second row's new name.
        let rows = [
            row("a1", "p", "ws1"),
            row("b2xxxx99", "p", "ws1"),
            row("c3", "p_b2xxxx", "ws1"),
        ];

        let updates = resolve_duplicate_names(EntityKind::Pipeline, &rows);

        assert_eq!(updates.len(), 2);
        assert_eq!(updates[1].id, "c3");
        assert_eq!(updates[1].new_name, "p_b2xxxx_c3");
    }

    #[test]
    fn empty_input_yields_no_updates() {
        assert!(resolve_duplicate_names(EntityKind::Pipeline, &[]).is_empty());
    }
}
