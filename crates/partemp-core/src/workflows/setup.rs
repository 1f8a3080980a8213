use crate::core::grompp::{CompileOutcome, tpr_name_for};
use crate::core::ladder;
use crate::core::template::{self, RenderSummary, TemplateError};
use crate::engine::config::{FailurePolicy, LogMode, RunConfig};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use rayon::prelude::*;
use std::fs::{File, OpenOptions};
use std::io::BufWriter;
use std::path::Path;
use tracing::{info, instrument, warn};

/// One replicate of the temperature ladder and the files derived for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Replicate {
    pub index: usize,
    pub temperature: f64,
    pub mdp_name: String,
    pub tpr_name: String,
}

impl Replicate {
    pub fn new(config: &RunConfig, index: usize) -> Self {
        let mdp_name = config.output.mdp_name(index);
        let tpr_name = tpr_name_for(&mdp_name);
        Self {
            index,
            temperature: ladder::temperature(
                config.ladder.start_temperature,
                config.ladder.scaling_exponent,
                index,
            ),
            mdp_name,
            tpr_name,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReplicateResult {
    pub replicate: Replicate,
    pub render: RenderSummary,
    pub outcome: CompileOutcome,
}

#[derive(Debug, Clone, Default)]
pub struct SetupReport {
    pub replicates: Vec<ReplicateResult>,
}

impl SetupReport {
    /// Replicates whose preprocessor run exited unsuccessfully.
    pub fn failures(&self) -> impl Iterator<Item = &ReplicateResult> {
        self.replicates.iter().filter(|r| !r.outcome.success)
    }

    pub fn all_succeeded(&self) -> bool {
        self.failures().next().is_none()
    }
}

/// Renders and compiles every replicate described by `config`.
///
/// Replicates are processed in index order, each one finishing before the
/// next starts, unless `config.workers > 1`.
///
/// # Errors
///
/// Any template, log or process-start failure aborts the run. A non-zero
/// preprocessor exit only aborts it under [`FailurePolicy::Abort`].
#[instrument(skip_all, name = "setup_workflow")]
pub fn run(config: &RunConfig, reporter: &ProgressReporter) -> Result<SetupReport, EngineError> {
    let template_path = &config.output.template_path;
    if !template_path.is_file() {
        return Err(TemplateError::NotFound {
            path: template_path.clone(),
        }
        .into());
    }

    let count = config.ladder.replicates;
    info!(
        "Preparing {} replicate(s) from {:?} starting at {} K.",
        count, template_path, config.ladder.start_temperature
    );
    reporter.report(Progress::TaskStart {
        total_steps: count as u64,
    });

    let replicates = if config.workers > 1 {
        run_parallel(config, reporter)?
    } else {
        run_sequential(config, reporter)?
    };

    reporter.report(Progress::TaskFinish);
    let report = SetupReport { replicates };
    info!(
        "Prepared {} replicate(s), {} preprocessor failure(s).",
        report.replicates.len(),
        report.failures().count()
    );
    Ok(report)
}

fn run_sequential(
    config: &RunConfig,
    reporter: &ProgressReporter,
) -> Result<Vec<ReplicateResult>, EngineError> {
    let count = config.ladder.replicates;
    let mut results = Vec::new();

    // Append mode shares one handle for the whole run.
    let mut shared_log = match config.output.log_mode {
        LogMode::Append if count > 0 => Some(open_log(&config.output.log_path(0))?),
        _ => None,
    };

    for index in 0..count {
        let result = prepare_replicate(config, index, shared_log.as_mut(), reporter)?;
        check_outcome(config, &result)?;
        results.push(result);
    }

    Ok(results)
}

fn run_parallel(
    config: &RunConfig,
    reporter: &ProgressReporter,
) -> Result<Vec<ReplicateResult>, EngineError> {
    info!("Running replicates on {} worker threads.", config.workers);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.workers)
        .build()
        .map_err(|e| EngineError::WorkerPool(e.to_string()))?;

    pool.install(|| {
        (0..config.ladder.replicates)
            .into_par_iter()
            .map(|index| -> Result<ReplicateResult, EngineError> {
                let result = prepare_replicate(config, index, None, reporter)?;
                check_outcome(config, &result)?;
                Ok(result)
            })
            .collect()
    })
}

fn prepare_replicate(
    config: &RunConfig,
    index: usize,
    shared_log: Option<&mut BufWriter<File>>,
    reporter: &ProgressReporter,
) -> Result<ReplicateResult, EngineError> {
    let replicate = Replicate::new(config, index);
    reporter.report(Progress::ReplicateStart {
        index,
        temperature: replicate.temperature,
    });
    info!(
        "Replicate {}: {} K -> {}",
        index, replicate.temperature, replicate.mdp_name
    );

    let work_dir = &config.output.work_dir;
    let render = template::render_file(
        &config.output.template_path,
        &work_dir.join(&replicate.mdp_name),
        replicate.temperature,
    )?;

    let preprocessor = &config.preprocessor;
    let outcome = match shared_log {
        Some(log) => {
            preprocessor.compile(work_dir, &replicate.mdp_name, &replicate.tpr_name, log)?
        }
        None => {
            // Opened only once the parameter file exists; in truncate mode this
            // discards the previous replicate's output.
            let mut log = open_log(&config.output.log_path(index))?;
            preprocessor.compile(work_dir, &replicate.mdp_name, &replicate.tpr_name, &mut log)?
        }
    };

    if !outcome.success {
        warn!(
            "Preprocessor exited unsuccessfully for replicate {} (exit code {:?}); {} may be missing or stale.",
            index, outcome.exit_code, replicate.tpr_name
        );
        reporter.report(Progress::Message(format!(
            "grompp failed for {} (exit code {:?})",
            replicate.mdp_name, outcome.exit_code
        )));
    }
    reporter.report(Progress::TaskIncrement);

    Ok(ReplicateResult {
        replicate,
        render,
        outcome,
    })
}

fn check_outcome(config: &RunConfig, result: &ReplicateResult) -> Result<(), EngineError> {
    match config.failure_policy {
        FailurePolicy::Abort if !result.outcome.success => Err(EngineError::CompileFailed {
            index: result.replicate.index,
            exit_code: result.outcome.exit_code,
        }),
        _ => Ok(()),
    }
}

fn open_log(path: &Path) -> Result<BufWriter<File>, EngineError> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map(BufWriter::new)
        .map_err(|source| EngineError::Log {
            path: path.to_path_buf(),
            source,
        })
}
