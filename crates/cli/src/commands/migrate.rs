//! Schema migration commands.

use anyhow::Result;
use uniquify_storage::Storage;

pub(crate) fn run_init(storage: &Storage) -> Result<()> {
    storage.init()?;
    println!("Schema at version {}", storage.schema_version()?);
    Ok(())
}

pub(crate) fn run_plan(storage: &Storage) -> Result<()> {
    let plan = storage.plan()?;
    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}

pub(crate) fn run_upgrade(storage: &Storage) -> Result<()> {
    match storage.upgrade()? {
        Some(report) => println!("{}", serde_json::to_string_pretty(&report)?),
        None => println!("Schema already at version {}", storage.schema_version()?),
    }
    Ok(())
}

pub(crate) fn run_downgrade(storage: &Storage, target: i32) -> Result<()> {
    storage.downgrade(target)?;
    println!("Schema at version {}", storage.schema_version()?);
    eprintln!(
        "warning: names and version numbers rewritten by the upgrade were not restored"
    );
    Ok(())
}
