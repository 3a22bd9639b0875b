//! Forward and backward steps of the unique-names migration.
//!
//! Callers own the transaction: any error returned here must abort it.

use serde::Serialize;

use crate::entity::{EntityKind, SimpleRow, UNIQUE_CONSTRAINTS, VersionRow};
use crate::error::Result;
use crate::resolve::{
    ResolutionPlan, resolve_duplicate_names, resolve_versions, verify_simple, verify_versions,
};
use crate::store_trait::{ConstraintApplier, EntityStore};

/// Outcome of a forward run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MigrationReport {
    pub plan: ResolutionPlan,
    pub constraints_added: Vec<&'static str>,
}

/// Rows read from the store together with the updates they need.
struct Resolution {
    simple: Vec<(EntityKind, Vec<SimpleRow>)>,
    versions: Vec<VersionRow>,
    plan: ResolutionPlan,
}

fn resolve_all<S: EntityStore + ?Sized>(store: &S) -> Result<Resolution> {
    let mut simple = Vec::with_capacity(EntityKind::ALL.len());
    let mut plan = ResolutionPlan::default();

    for kind in EntityKind::ALL {
        let rows = store.read_simple(kind)?;
        plan.names.extend(resolve_duplicate_names(kind, &rows));
        simple.push((kind, rows));
    }

    let versions = store.read_versions()?;
    plan.versions = resolve_versions(&versions);

    Ok(Resolution { simple, versions, plan })
}

/// Computes the updates the forward step would apply, without writing.
///
/// # Errors
/// Propagates read failures from the store.
pub fn plan<S: EntityStore + ?Sized>(store: &S) -> Result<ResolutionPlan> {
    resolve_all(store).map(|resolution| resolution.plan)
}

/// Resolves duplicates, writes the fixes, then adds the unique constraints.
///
/// The resolved state is verified before any DDL runs so a rename that still
/// collides surfaces as [`crate::MigrationError::RenameCollisionUnresolved`]
/// rather than as a store-specific constraint failure.
///
/// # Errors
/// Returns the first read, write, verification or DDL failure.
pub fn forward<S: EntityStore + ConstraintApplier + ?Sized>(store: &S) -> Result<MigrationReport> {
    let Resolution { simple, versions, plan } = resolve_all(store)?;

    for (kind, rows) in &simple {
        let updates: Vec<_> = plan.names.iter().filter(|u| u.kind == *kind).cloned().collect();
        verify_simple(*kind, rows, &updates)?;
    }
    verify_versions(&versions, &plan.versions)?;

    for update in &plan.names {
        store.update_name(update)?;
    }
    for update in &plan.versions {
        store.update_version(update)?;
    }
    tracing::info!(
        renamed = plan.names.len(),
        versions_fixed = plan.versions.len(),
        "duplicate identifiers resolved"
    );

    let mut constraints_added = Vec::with_capacity(UNIQUE_CONSTRAINTS.len());
    for constraint in &UNIQUE_CONSTRAINTS {
        store.add_unique_constraint(constraint)?;
        constraints_added.push(constraint.name);
    }

    Ok(MigrationReport { plan, constraints_added })
}

/// Drops the unique constraints in reverse creation order.
///
/// Renamed and renumbered rows keep their new values: the original duplicate
/// configuration cannot be reconstructed.
///
/// # Errors
/// Returns the first DDL failure.
pub fn backward<S: ConstraintApplier + ?Sized>(store: &S) -> Result<()> {
    tracing::warn!(
        "dropping unique name constraints; names and version numbers rewritten by the \
         forward migration are NOT restored"
    );
    for constraint in UNIQUE_CONSTRAINTS.iter().rev() {
        store.drop_unique_constraint(constraint)?;
    }
    Ok(())
}
