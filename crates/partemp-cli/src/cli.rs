use clap::{Args, Parser, ValueEnum};
use partemp::engine::config::LogMode;
use serde::Deserialize;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Thomas Heavey",
    version,
    about = "A script to help set up parallel tempering jobs in GROMACS with PLUMED.",
    help_template = HELP_TEMPLATE,
)]
pub struct Cli {
    #[command(flatten)]
    pub setup: SetupArgs,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write diagnostics to a specified file in addition to the console output
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// Arguments describing the replicates to prepare.
///
/// Every value is optional here; unset values come from `--config` or the built-in defaults.
#[derive(Args, Debug, Default)]
pub struct SetupArgs {
    // --- Ladder ---
    /// Name of template file [default: templatemdp.txt]
    #[arg(short = 'l', long, value_name = "PATH")]
    pub template: Option<PathBuf>,

    /// Starting (lowest) temperature [default: 205]
    #[arg(
        short = 's',
        long = "start_temp",
        visible_alias = "start-temp",
        value_name = "FLOAT",
        allow_negative_numbers = true
    )]
    pub start_temp: Option<f64>,

    /// Number of replicates [default: 16]
    #[arg(short = 'n', long, value_name = "INT")]
    pub number: Option<usize>,

    /// Exponent by which to scale temperatures [default: 0.025]
    #[arg(
        short = 'e',
        long = "scaling_exponent",
        visible_alias = "scaling-exponent",
        value_name = "FLOAT",
        allow_negative_numbers = true
    )]
    pub scaling_exponent: Option<f64>,

    /// Base name for output mdp and tpr files [default: npt]
    #[arg(
        short = 'b',
        long = "base_name",
        visible_alias = "base-name",
        value_name = "NAME"
    )]
    pub base_name: Option<String>,

    // --- grompp inputs ---
    /// Topology file (.top) [default: ../taddol_3htmf_stilbene_em.top]
    #[arg(short = 'p', long, value_name = "PATH")]
    pub topology: Option<PathBuf>,

    /// Structure file (.gro) [default: ../major_endo.gro]
    #[arg(short = 'c', long, value_name = "PATH")]
    pub structure: Option<PathBuf>,

    /// Index file (.ndx) [default: ../index.ndx]
    #[arg(long, value_name = "PATH")]
    pub index: Option<PathBuf>,

    /// Preprocessor executable [default: grompp_mpi]
    #[arg(long, value_name = "BIN")]
    pub grompp: Option<String>,

    /// Value passed to grompp's -maxwarn [default: 2]
    #[arg(long, value_name = "INT")]
    pub maxwarn: Option<u32>,

    // --- Run control ---
    /// Path to a configuration file in TOML format.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory in which parameter files and logs are written and grompp is run [default: .]
    #[arg(long, value_name = "DIR")]
    pub workdir: Option<PathBuf>,

    /// File capturing grompp's standard output [default: gromacs_compile_output.log]
    #[arg(long, value_name = "PATH")]
    pub compile_log: Option<PathBuf>,

    /// How the compile log is shared between replicates [default: truncate]
    #[arg(long, value_enum, value_name = "MODE")]
    pub log_mode: Option<LogModeArg>,

    /// Stop at the first replicate whose grompp run fails.
    #[arg(long)]
    pub fail_fast: bool,

    /// Number of replicates prepared concurrently [default: 1]
    #[arg(short = 'j', long, value_name = "NUM")]
    pub jobs: Option<usize>,
}

#[derive(ValueEnum, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum LogModeArg {
    /// Reopen the log for every replicate; only the last replicate's output is kept.
    Truncate,
    /// Keep the output of every replicate in one log.
    Append,
    /// Write one numbered log per replicate.
    PerReplicate,
}

impl From<LogModeArg> for LogMode {
    fn from(arg: LogModeArg) -> Self {
        match arg {
            LogModeArg::Truncate => LogMode::Truncate,
            LogModeArg::Append => LogMode::Append,
            LogModeArg::PerReplicate => LogMode::PerReplicate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_arguments_leave_everything_unset() {
        let cli = Cli::try_parse_from(["para-temp-setup"]).unwrap();
        assert!(cli.setup.template.is_none());
        assert!(cli.setup.number.is_none());
        assert!(!cli.setup.fail_fast);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn short_and_snake_case_flags_are_accepted() {
        let cli = Cli::try_parse_from([
            "para-temp-setup",
            "-l",
            "tmpl.txt",
            "-s",
            "300",
            "-n",
            "8",
            "--scaling_exponent",
            "0.01",
            "--base_name",
            "nvt",
            "-p",
            "sys.top",
            "-c",
            "conf.gro",
            "--index",
            "idx.ndx",
        ])
        .unwrap();

        let s = &cli.setup;
        assert_eq!(s.template, Some(PathBuf::from("tmpl.txt")));
        assert_eq!(s.start_temp, Some(300.0));
        assert_eq!(s.number, Some(8));
        assert_eq!(s.scaling_exponent, Some(0.01));
        assert_eq!(s.base_name.as_deref(), Some("nvt"));
        assert_eq!(s.topology, Some(PathBuf::from("sys.top")));
        assert_eq!(s.structure, Some(PathBuf::from("conf.gro")));
        assert_eq!(s.index, Some(PathBuf::from("idx.ndx")));
    }

    #[test]
    fn kebab_case_aliases_and_negative_numbers_parse() {
        let cli = Cli::try_parse_from([
            "para-temp-setup",
            "--start-temp",
            "-10.5",
            "--scaling-exponent",
            "-0.02",
            "--log-mode",
            "per-replicate",
        ])
        .unwrap();
        assert_eq!(cli.setup.start_temp, Some(-10.5));
        assert_eq!(cli.setup.scaling_exponent, Some(-0.02));
        assert_eq!(cli.setup.log_mode, Some(LogModeArg::PerReplicate));
    }

    #[test]
    fn non_numeric_count_is_rejected() {
        assert!(Cli::try_parse_from(["para-temp-setup", "-n", "many"]).is_err());
    }

    #[test]
    fn version_flag_exits_with_version_message() {
        let err = Cli::try_parse_from(["para-temp-setup", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
        assert!(err.to_string().contains(env!("CARGO_PKG_VERSION")));
    }
}
