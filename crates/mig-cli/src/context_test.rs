use super::*;
use std::fs;
use tempfile::tempdir;

fn global(project_dir: &std::path::Path) -> GlobalArgs {
    GlobalArgs {
        verbose: false,
        project_dir: project_dir.to_path_buf(),
        config: None,
        database: Some(":memory:".to_string()),
    }
}

#[test]
fn test_context_defaults_without_config_file() {
    let temp_dir = tempdir().unwrap();

    let ctx = RuntimeContext::new(&global(temp_dir.path())).unwrap();

    assert_eq!(ctx.config.migrations_dir, "migrations");
    assert!(ctx.config.lock.enabled);
    assert_eq!(ctx.database, ":memory:");
}

#[test]
fn test_context_reads_project_config() {
    let temp_dir = tempdir().unwrap();
    fs::write(
        temp_dir.path().join("mig.yml"),
        "migrations_dir: db\nlock:\n  enabled: false\n",
    )
    .unwrap();

    let ctx = RuntimeContext::new(&global(temp_dir.path())).unwrap();

    assert_eq!(ctx.config.migrations_dir, "db");
    assert!(!ctx.config.lock.enabled);
}

#[test]
fn test_context_custom_config_path() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("custom.yml");
    fs::write(&config_path, "migrations_dir: elsewhere\n").unwrap();

    let mut args = global(temp_dir.path());
    args.config = Some(config_path);
    let ctx = RuntimeContext::new(&args).unwrap();

    assert_eq!(ctx.config.migrations_dir, "elsewhere");
}

#[test]
fn test_context_missing_custom_config_fails() {
    let temp_dir = tempdir().unwrap();
    let mut args = global(temp_dir.path());
    args.config = Some(temp_dir.path().join("nope.yml"));

    let err = RuntimeContext::new(&args).err().unwrap();
    assert!(format!("{err:#}").contains("Failed to load configuration file"));
}

#[test]
fn test_context_relative_database_flag_resolves_against_root() {
    let temp_dir = tempdir().unwrap();
    let mut args = global(temp_dir.path());
    args.database = Some("dev.duckdb".to_string());

    let ctx = RuntimeContext::new(&args).unwrap();

    assert_eq!(
        ctx.database,
        temp_dir.path().join("dev.duckdb").display().to_string()
    );
}

#[test]
fn test_context_connects_to_file_database() {
    let temp_dir = tempdir().unwrap();
    let mut args = global(temp_dir.path());
    args.database = Some("dev.duckdb".to_string());

    let ctx = RuntimeContext::new(&args).unwrap();
    ctx.connect().unwrap();

    assert!(temp_dir.path().join("dev.duckdb").exists());
}
