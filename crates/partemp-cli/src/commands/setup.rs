use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use partemp::core::ladder::format_temperature;
use partemp::engine::config::RunConfig;
use partemp::engine::progress::ProgressReporter;
use partemp::workflows::setup::{self, SetupReport};
use tracing::{info, warn};

pub fn run(config: &RunConfig, quiet: bool) -> Result<SetupReport> {
    let progress_handler = CliProgressHandler::new(quiet);
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Invoking the replicate setup workflow...");
    let report = setup::run(config, &reporter)?;

    for failed in report.failures() {
        warn!(
            "{} was not compiled cleanly (exit code {:?}).",
            failed.replicate.mdp_name, failed.outcome.exit_code
        );
        eprintln!(
            "⚠ grompp failed for {} (T = {} K); check {}",
            failed.replicate.mdp_name,
            format_temperature(failed.replicate.temperature),
            config.output.log_path(failed.replicate.index).display()
        );
    }

    if let (Some(first), Some(last)) = (report.replicates.first(), report.replicates.last()) {
        println!(
            "Prepared {} replicate(s) from {} K to {} K.",
            report.replicates.len(),
            format_temperature(first.replicate.temperature),
            format_temperature(last.replicate.temperature)
        );
    } else {
        println!("No replicates requested; nothing to do.");
    }

    Ok(report)
}
