//! History command implementation

use anyhow::{Context, Result};
use mig_runner::{MetadataRecord, MetadataStore};

use crate::cli::{GlobalArgs, HistoryArgs, OutputFormat};
use crate::commands::common::{print_json, print_table};
use crate::context::RuntimeContext;

/// Execute the history command
pub async fn execute(args: &HistoryArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let db = ctx.connect()?;
    let store = MetadataStore::new(&db);

    // Nothing has been recorded until the first run creates the table
    let records = if store.table_exists().await? {
        store
            .history(args.limit)
            .await
            .context("Failed to read migration history")?
    } else {
        Vec::new()
    };

    match args.output {
        OutputFormat::Json => print_json(&records)?,
        OutputFormat::Table => print_history(&records),
    }

    Ok(())
}

fn print_history(records: &[MetadataRecord]) {
    if records.is_empty() {
        println!("No migrations recorded");
        return;
    }

    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|r| {
            vec![
                r.migrated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                r.script_name.clone(),
            ]
        })
        .collect();
    print_table(&["MIGRATED_AT", "SCRIPT"], &rows);
}
