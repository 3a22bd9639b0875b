use anyhow::Result;
use uniquify_storage::Storage;

pub(crate) fn run_status(storage: &Storage) -> Result<()> {
    let status = storage.status()?;
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}
