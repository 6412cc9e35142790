//! n9res - Bundle static resource provider
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use n9res::cli::{Cli, Commands};
use n9res::config::ConfigManager;
use n9res::error::ResourceResult;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> ResourceResult<()> {
    let cli = Cli::parse();

    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let mut config = config_manager.load().await?;

    init_logging(cli.verbose, &config.general.log_format);
    debug!("Loaded configuration from {}", config_manager.path().display());

    if let Some(bundle) = cli.bundle {
        debug!("Bundle root overridden: {}", bundle.display());
        config.bundle.root = bundle;
    }

    match cli.command {
        Commands::Fetch(args) => n9res::cli::commands::fetch(args, &config).await,
        Commands::List(args) => n9res::cli::commands::list(args, &config).await,
        Commands::Status => n9res::cli::commands::status(&config).await,
        Commands::Config(args) => {
            n9res::cli::commands::config(args, &config, &config_manager).await
        }
    }
}

/// 0 = warn, 1 = info, 2+ = debug; logs go to stderr so stdout stays parseable
fn init_logging(verbose: u8, log_format: &str) {
    let filter = match verbose {
        0 => EnvFilter::new("n9res=warn"),
        1 => EnvFilter::new("n9res=info"),
        _ => EnvFilter::new("n9res=debug"),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();

    if log_format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}
