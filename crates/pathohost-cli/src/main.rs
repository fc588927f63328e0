mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod utils;

use crate::cli::{Cli, Commands};
use crate::config::{ConfigOverrides, load_config};
use crate::error::{CliError, Result};
use clap::Parser;
use tracing::{debug, error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run_app().await {
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(1);
    }
}

async fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;

    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default().into_hooks();
    eyre_hook.install().map_err(|e| CliError::Other(e.into()))?;
    std::panic::set_hook(Box::new(move |pi| {
        error!("{}", panic_hook.panic_report(pi));
    }));

    info!(
        "🚀 PathoHost CLI v{} starting up.",
        env!("CARGO_PKG_VERSION")
    );
    debug!("Full CLI arguments parsed: {:?}", &cli);

    let Cli {
        command,
        config: config_path,
        set_values,
        scratch_dir,
        ..
    } = cli;
    let base = ConfigOverrides {
        scratch_dir,
        ..Default::default()
    };
    let resolve = |overrides: ConfigOverrides| {
        load_config(config_path.as_deref(), &set_values, &overrides)
    };

    let command_result = match command {
        Commands::Search(args) => {
            info!("Dispatching to 'search' command.");
            let config = resolve(commands::search::overrides(&args, base))?;
            commands::search::run(args, &config).await
        }
        Commands::Fetch(args) => {
            info!("Dispatching to 'fetch' command.");
            let config = resolve(base)?;
            commands::fetch::run(args, &config).await
        }
        Commands::Dock(args) => {
            info!("Dispatching to 'dock' command.");
            let config = resolve(commands::dock::overrides(&args, base)?)?;
            commands::dock::run(args, &config).await
        }
        Commands::Poses(args) => {
            info!("Dispatching to 'poses' command.");
            let config = resolve(commands::poses::overrides(&args, base))?;
            commands::poses::run(args, &config).await
        }
        Commands::View(args) => {
            info!("Dispatching to 'view' command.");
            let config = resolve(commands::view::overrides(&args, base))?;
            commands::view::run(args, &config).await
        }
    };

    match &command_result {
        Ok(()) => {
            info!("✅ Command completed successfully.");
        }
        Err(e) => {
            error!("❌ Command failed: {}", e);
        }
    }
    command_result
}
