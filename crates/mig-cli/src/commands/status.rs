//! Status command implementation

use anyhow::{Context, Result};
use mig_runner::{MigrationPlan, Migrator, ScriptState};

use crate::cli::{GlobalArgs, OutputFormat, StatusArgs};
use crate::commands::common::{print_json, print_table};
use crate::context::RuntimeContext;

/// Execute the status command
pub async fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let db = ctx.connect()?;
    let plan = Migrator::new(&db, &ctx.config, &ctx.root)
        .plan()
        .await
        .context("Failed to read migration status")?;

    match args.output {
        OutputFormat::Json => print_json(&plan)?,
        OutputFormat::Table => print_status(&plan),
    }

    Ok(())
}

fn print_status(plan: &MigrationPlan) {
    println!(
        "Last applied: {}",
        plan.last_applied.as_deref().unwrap_or("<none>")
    );
    if plan.entries.is_empty() {
        println!("No migration scripts found");
        return;
    }

    println!();
    let rows: Vec<Vec<String>> = plan
        .entries
        .iter()
        .map(|e| vec![e.state.to_string(), e.script.clone()])
        .collect();
    print_table(&["STATE", "SCRIPT"], &rows);

    println!();
    println!(
        "{} applied, {} pending",
        plan.count(ScriptState::Applied),
        plan.count(ScriptState::Pending)
    );
    if let Some(bad) = plan.invalid_name() {
        println!(
            "Runs stop at {bad}; {} later script(s) are blocked",
            plan.count(ScriptState::Blocked)
        );
    }
}
