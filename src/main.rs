use std::process::ExitCode;

use clap::Parser;
use procflow::cli::{Cli, Commands};
use procflow::{run_deploy, AppConfig, AppError};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn run(cli: Cli) -> Result<(), AppError> {
    let config = AppConfig::from_env()?;
    match cli.command {
        Commands::Deploy(args) => {
            let summary = run_deploy(&args, &config)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::try_from_default_env()
                                        .unwrap_or_else(|_| "procflow=info,proc_core=info,proc_persistence=info".into()))
                                  .with(tracing_subscriber::fmt::layer())
                                  .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
