//! Unlock command implementation

use anyhow::{Context, Result};
use mig_runner::LockTable;

use crate::cli::GlobalArgs;
use crate::context::RuntimeContext;

/// Execute the unlock command
pub async fn execute(global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let db = ctx.connect()?;
    let table = LockTable::new(&db);

    let holder = table
        .current_holder()
        .await
        .context("Failed to read the run lock")?;
    let released = table
        .force_release()
        .await
        .context("Failed to release the run lock")?;

    match holder {
        Some(info) if released => {
            log::warn!("Force-released run lock held by {}", info.holder);
            println!(
                "Released run lock held by {} since {}",
                info.holder, info.acquired_at
            );
        }
        _ => println!("No run lock held"),
    }

    Ok(())
}
