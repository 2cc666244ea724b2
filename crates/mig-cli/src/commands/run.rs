//! Run command implementation

use anyhow::{Context, Result};
use mig_runner::{MigrationPlan, MigrationReport, Migrator};

use crate::cli::{GlobalArgs, RunArgs};
use crate::commands::common::{ExitCode, EXIT_HALTED, EXIT_UNRECORDED};
use crate::context::RuntimeContext;

/// Execute the run command
pub async fn execute(args: &RunArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let db = ctx.connect()?;
    let migrator = Migrator::new(&db, &ctx.config, &ctx.root)
        .with_lock(ctx.config.lock.enabled && !args.no_lock);

    if args.dry_run {
        let plan = migrator
            .plan()
            .await
            .context("Failed to plan migrations")?;
        print_dry_run(&plan);
        return match plan.invalid_name() {
            Some(_) => Err(ExitCode(EXIT_HALTED).into()),
            None => Ok(()),
        };
    }

    if args.no_lock {
        log::warn!("Running without the run lock");
    }

    let report = migrator.run().await.context("Migration run failed")?;
    print_report(&report);

    exit_for(&report)
}

fn print_dry_run(plan: &MigrationPlan) {
    let pending = plan.pending();
    println!(
        "Last applied: {}",
        plan.last_applied.as_deref().unwrap_or("<none>")
    );
    if pending.is_empty() {
        println!("Dry run - no migrations to apply");
    } else {
        println!("Dry run - would apply {} migration(s):", pending.len());
        for script in &pending {
            println!("  {script}");
        }
    }
    if let Some(bad) = plan.invalid_name() {
        println!("Would stop at invalid file name: {bad}");
    }
}

fn print_report(report: &MigrationReport) {
    for script in &report.applied {
        println!("  ✓ {script}");
    }
    if let Some(halt) = &report.halt {
        println!("  ✗ {halt}");
    }
    println!();
    println!("{}", report.summary());

    if !report.unrecorded.is_empty() {
        eprintln!(
            "Warning: {} migration(s) applied but not recorded; they may run again:",
            report.unrecorded.len()
        );
        for script in &report.unrecorded {
            eprintln!("  {script}");
        }
    }
}

/// Map a finished run to its exit status. A halt outranks unrecorded scripts.
fn exit_for(report: &MigrationReport) -> Result<()> {
    if report.halt.is_some() {
        return Err(ExitCode(EXIT_HALTED).into());
    }
    if !report.unrecorded.is_empty() {
        return Err(ExitCode(EXIT_UNRECORDED).into());
    }
    Ok(())
}

#[cfg(test)]
#[path = "run_test.rs"]
mod tests;
