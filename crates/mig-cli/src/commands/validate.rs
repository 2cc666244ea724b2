//! Validate command implementation

use anyhow::{Context, Result};
use mig_core::{discover_scripts, ScriptName};

use crate::cli::GlobalArgs;
use crate::commands::common::ExitCode;
use crate::context::RuntimeContext;

/// Execute the validate command. Only file names are checked; no database
/// is opened.
pub async fn execute(global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let scripts = discover_scripts(&ctx.config.migrations_dir_absolute(&ctx.root))
        .context("Failed to discover scripts")?;

    let mut valid = Vec::new();
    let mut errors = Vec::new();
    for script in scripts {
        match ScriptName::parse(script.name) {
            Ok(name) => valid.push(name),
            Err(e) => errors.push(e),
        }
    }

    if global.verbose {
        for name in &valid {
            println!("  {}  {}", name.timestamp(), name.description());
        }
    }

    let scripts_dir = ctx.config.scripts_dir_absolute(&ctx.root);
    if errors.is_empty() {
        println!(
            "✓ {} migration script(s) in {} have valid names",
            valid.len(),
            scripts_dir.display()
        );
        return Ok(());
    }

    println!("✗ {} script(s) in {} have invalid names:", errors.len(), scripts_dir.display());
    for e in &errors {
        println!("  {e}");
    }
    Err(ExitCode(1).into())
}

#[cfg(test)]
#[path = "validate_test.rs"]
mod tests;
