use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use crate::cli::SetupArgs;
use crate::error::{CliError, Result};
use partemp::engine::config::{FailurePolicy, LogMode, RunConfig, RunConfigBuilder};
use std::path::PathBuf;

/// Merges CLI arguments, the optional config file and built-in defaults, in that order of precedence.
pub fn build_config(args: &SetupArgs) -> Result<RunConfig> {
    let defaults = DefaultsConfig::default();

    let file = match &args.config {
        Some(path) => FileConfig::from_file(path)?,
        None => FileConfig::default(),
    };

    let pick_path = |cli: &Option<PathBuf>, file: Option<PathBuf>, default: &str| {
        cli.clone()
            .or(file)
            .unwrap_or_else(|| PathBuf::from(default))
    };

    let jobs = args.jobs.or(file.jobs).unwrap_or(1);

    let log_mode = match args.log_mode.or(file.log_mode) {
        Some(mode) => mode.into(),
        None if jobs > 1 => LogMode::PerReplicate,
        None => LogMode::Truncate,
    };

    let failure_policy = if args.fail_fast || file.fail_fast.unwrap_or(false) {
        FailurePolicy::Abort
    } else {
        FailurePolicy::Ignore
    };

    let mut builder = RunConfigBuilder::new()
        .template_path(pick_path(&args.template, file.template, &defaults.template))
        .start_temperature(
            args.start_temp
                .or(file.start_temp)
                .unwrap_or(defaults.start_temp),
        )
        .replicates(args.number.or(file.number).unwrap_or(defaults.number))
        .scaling_exponent(
            args.scaling_exponent
                .or(file.scaling_exponent)
                .unwrap_or(defaults.scaling_exponent),
        )
        .base_name(
            args.base_name
                .clone()
                .or(file.base_name)
                .unwrap_or(defaults.base_name),
        )
        .topology_path(pick_path(&args.topology, file.topology, &defaults.topology))
        .structure_path(pick_path(
            &args.structure,
            file.structure,
            &defaults.structure,
        ))
        .index_path(pick_path(&args.index, file.index, &defaults.index))
        .log_mode(log_mode)
        .failure_policy(failure_policy)
        .workers(jobs);

    if let Some(program) = args.grompp.clone().or(file.grompp) {
        builder = builder.program(program);
    }
    if let Some(maxwarn) = args.maxwarn.or(file.maxwarn) {
        builder = builder.max_warnings(maxwarn);
    }
    if let Some(dir) = args.workdir.clone().or(file.workdir) {
        builder = builder.work_dir(dir);
    }
    if let Some(log) = args.compile_log.clone().or(file.compile_log) {
        builder = builder.compile_log_path(log);
    }

    builder.build().map_err(|e| CliError::Config(e.to_string()))
}
