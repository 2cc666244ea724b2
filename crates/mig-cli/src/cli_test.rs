use super::*;
use clap::CommandFactory;

#[test]
fn verify_cli_args() {
    // Validates the entire command tree: short flag conflicts,
    // duplicate args, and other clap definition errors.
    Cli::command().debug_assert();
}

#[test]
fn test_global_args_after_subcommand() {
    let cli = Cli::try_parse_from(["mig", "run", "--dry-run", "-d", "dev.duckdb", "-v"]).unwrap();
    assert!(cli.global.verbose);
    assert_eq!(cli.global.database.as_deref(), Some("dev.duckdb"));
    match cli.command {
        Commands::Run(args) => {
            assert!(args.dry_run);
            assert!(!args.no_lock);
        }
        other => panic!("expected run, got {other:?}"),
    }
}

#[test]
fn test_history_defaults() {
    let cli = Cli::try_parse_from(["mig", "history"]).unwrap();
    assert_eq!(cli.global.project_dir, PathBuf::from("."));
    match cli.command {
        Commands::History(args) => {
            assert_eq!(args.limit, None);
            assert_eq!(args.output, OutputFormat::Table);
        }
        other => panic!("expected history, got {other:?}"),
    }
}

#[test]
fn test_status_json_output() {
    let cli = Cli::try_parse_from(["mig", "status", "--output", "json"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Status(StatusArgs {
            output: OutputFormat::Json
        })
    ));
}

#[test]
fn test_unknown_output_format_rejected() {
    assert!(Cli::try_parse_from(["mig", "status", "--output", "xml"]).is_err());
}
