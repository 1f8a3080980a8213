mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod utils;

use crate::cli::Cli;
use crate::error::{CliError, Result};
use clap::Parser;
use tracing::{debug, error, info};

fn main() {
    if let Err(e) = run_app() {
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;

    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default().into_hooks();
    eyre_hook.install().map_err(|e| CliError::Other(e.into()))?;
    std::panic::set_hook(Box::new(move |pi| {
        error!("{}", panic_hook.panic_report(pi));
    }));

    info!("🌡 partemp v{} starting up.", env!("CARGO_PKG_VERSION"));
    debug!("Full CLI arguments parsed: {:?}", &cli);

    let config = config::builder::build_config(&cli.setup)?;
    debug!("Resolved run configuration: {:?}", &config);

    match commands::setup::run(&config, cli.quiet) {
        Ok(report) => {
            info!(
                "✅ Setup finished: {} replicate(s), {} grompp failure(s).",
                report.replicates.len(),
                report.failures().count()
            );
            Ok(())
        }
        Err(e) => {
            error!("❌ Setup failed: {}", e);
            Err(e)
        }
    }
}
