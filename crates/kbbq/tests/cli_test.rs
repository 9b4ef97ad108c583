use clap::Parser;
use kbbq::cli::{load_config, Cli, Commands};
use kbbq::observability::{ObservabilityConfig, DEFAULT_FILTER};
use std::path::{Path, PathBuf};

#[test]
fn test_run_flags() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::try_parse_from(["kbbq", "run", "--config", "bot.toml", "--json-logs", "-v"])?;
    assert!(cli.verbose);
    match cli.command {
        Commands::Run { config, json_logs } => {
            assert_eq!(config, Some(PathBuf::from("bot.toml")));
            assert!(json_logs);
        }
        Commands::Migrate => panic!("expected run"),
    }
    Ok(())
}

#[test]
fn test_migrate_takes_no_arguments() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::try_parse_from(["kbbq", "migrate"])?;
    assert!(matches!(cli.command, Commands::Migrate));
    assert!(!cli.verbose);
    assert!(Cli::try_parse_from(["kbbq", "migrate", "--json-logs"]).is_err());
    assert!(Cli::try_parse_from(["kbbq"]).is_err());
    Ok(())
}

#[test]
fn test_observability_defaults() {
    let config = ObservabilityConfig::default();
    assert_eq!(config.log_filter, DEFAULT_FILTER);
    assert!(!config.json_logs);

    let verbose = config.with_verbose(true).with_json_logs(true);
    assert_eq!(verbose.log_filter, "debug");
    assert!(verbose.json_logs);
}

#[test]
fn test_missing_config_file_fails() {
    assert!(load_config(Some(Path::new("/definitely/not/here.toml"))).is_err());
}
