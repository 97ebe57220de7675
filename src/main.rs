//! IterView - terminal pager for LLM iteration records
//!
#![doc = "IterView - terminal pager for LLM iteration records"]
#![doc = "Main entry point for the IterView application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use iterview::cli::{Cli, Commands};
use iterview::commands;
use iterview::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command_or_default() {
        Commands::Browse { page } => {
            if let Some(p) = page {
                tracing::debug!("Using start page override: {}", p);
            }
            commands::browse::run_browse(config, page).await?;
            Ok(())
        }
        Commands::Show { page, json } => {
            tracing::info!("Fetching iteration {}", page);
            commands::show::run_show(&config, page, json).await?;
            Ok(())
        }
        Commands::Meta { json } => {
            tracing::info!("Fetching iteration metadata");
            commands::meta::run_meta(&config, json).await?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
///
/// Logs go to stderr so rendered pages on stdout stay clean.
fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "iterview=debug" } else { "iterview=info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
