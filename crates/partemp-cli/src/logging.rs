use crate::error::Result;
use std::fs::File;
use std::path::Path;
use tracing_subscriber::{
    filter::LevelFilter,
    fmt::{self},
    prelude::*,
};

/// Maps the `-v` count and `-q` flag to a level filter.
pub fn level_filter(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::OFF;
    }
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Installs the global subscriber: compact stderr output, plus a plain-text
/// file layer when `log_file` is given.
pub fn setup_logging(verbosity: u8, quiet: bool, log_file: Option<&Path>) -> Result<()> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(false)
        .compact();

    let file_layer = match log_file {
        Some(path) => Some(
            fmt::layer()
                .with_writer(File::create(path)?)
                .with_ansi(false)
                .with_thread_ids(true)
                .with_target(true),
        ),
        None => None,
    };

    tracing_subscriber::registry()
        .with(level_filter(verbosity, quiet))
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use serial_test::serial;
    use std::path::PathBuf;
    use tracing::{debug, info};

    #[test]
    fn verbosity_maps_to_increasing_levels() {
        assert_eq!(level_filter(0, false), LevelFilter::WARN);
        assert_eq!(level_filter(1, false), LevelFilter::INFO);
        assert_eq!(level_filter(2, false), LevelFilter::DEBUG);
        assert_eq!(level_filter(3, false), LevelFilter::TRACE);
        assert_eq!(level_filter(9, false), LevelFilter::TRACE);
    }

    #[test]
    fn quiet_turns_logging_off() {
        assert_eq!(level_filter(0, true), LevelFilter::OFF);
    }

    #[test]
    #[serial]
    fn file_layer_records_replicate_messages() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("partemp.log");

        let file = File::create(&log_path).unwrap();
        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_thread_ids(true);
        let subscriber = tracing_subscriber::registry()
            .with(level_filter(2, false))
            .with(file_layer);

        tracing::subscriber::with_default(subscriber, || {
            info!("Replicate 3: 212.8 K -> npt3.mdp");
            debug!("Running grompp for npt3.mdp");
        });

        let content = std::fs::read_to_string(log_path).unwrap();
        assert!(content.contains("npt3.mdp"));
        assert!(content.contains("DEBUG"));
        assert!(content.contains("ThreadId"));
    }

    #[test]
    #[serial]
    fn unwritable_log_file_propagates_error() {
        let invalid_path = PathBuf::from("/");

        if cfg!(unix) && invalid_path.is_dir() {
            let result = setup_logging(0, false, Some(&invalid_path));
            assert!(matches!(result, Err(CliError::Io(_))));
        }
    }
}
