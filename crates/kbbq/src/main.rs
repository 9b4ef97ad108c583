//! kbbq bot binary.
//!
//! - `kbbq run` connects to the gateway and starts the background services
//! - `kbbq migrate` applies the embedded database migrations

use clap::Parser;
use kbbq::cli::{Cli, Commands, migrate, run};
use kbbq::observability::{ObservabilityConfig, init_observability};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let json_logs = matches!(cli.command, Commands::Run { json_logs: true, .. });
    init_observability(
        ObservabilityConfig::default()
            .with_verbose(cli.verbose)
            .with_json_logs(json_logs),
    )?;

    match cli.command {
        Commands::Run { config, .. } => run(config.as_deref()).await?,
        Commands::Migrate => migrate()?,
    }

    Ok(())
}
