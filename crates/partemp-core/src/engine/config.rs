use crate::core::grompp::{DEFAULT_MAX_WARNINGS, DEFAULT_PROGRAM, Preprocessor};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File that receives the preprocessor's standard output.
pub const DEFAULT_COMPILE_LOG: &str = "gromacs_compile_output.log";

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// How the compile log is opened across replicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogMode {
    /// Reopen and truncate the log for every replicate. Only the last
    /// replicate's output survives a run.
    #[default]
    Truncate,
    /// Truncate once at the start of the run, then append every replicate.
    Append,
    /// Write one log per replicate, `{stem}_{index}.{ext}`.
    PerReplicate,
}

/// What to do when the preprocessor exits with a non-zero status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Log a warning and continue with the next replicate.
    #[default]
    Ignore,
    /// Stop before the next replicate and return an error.
    Abort,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LadderConfig {
    pub start_temperature: f64,
    pub scaling_exponent: f64,
    pub replicates: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutputConfig {
    pub template_path: PathBuf,
    pub base_name: String,
    pub work_dir: PathBuf,
    pub compile_log_path: PathBuf,
    pub log_mode: LogMode,
}

impl OutputConfig {
    /// Name of the parameter file of replicate `index`, relative to `work_dir`.
    pub fn mdp_name(&self, index: usize) -> String {
        format!("{}{}.mdp", self.base_name, index)
    }

    /// Log file that receives the output of replicate `index` under the current [`LogMode`].
    pub fn log_path(&self, index: usize) -> PathBuf {
        let base = self.work_dir.join(&self.compile_log_path);
        match self.log_mode {
            LogMode::Truncate | LogMode::Append => base,
            LogMode::PerReplicate => per_replicate_path(&base, index),
        }
    }
}

fn per_replicate_path(base: &Path, index: usize) -> PathBuf {
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match base.extension() {
        Some(ext) => format!("{}_{}.{}", stem, index, ext.to_string_lossy()),
        None => format!("{}_{}", stem, index),
    };
    base.with_file_name(name)
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub ladder: LadderConfig,
    pub output: OutputConfig,
    pub preprocessor: Preprocessor,
    pub failure_policy: FailurePolicy,
    pub workers: usize,
}

#[derive(Default)]
pub struct RunConfigBuilder {
    template_path: Option<PathBuf>,
    start_temperature: Option<f64>,
    replicates: Option<usize>,
    scaling_exponent: Option<f64>,
    base_name: Option<String>,
    topology_path: Option<PathBuf>,
    structure_path: Option<PathBuf>,
    index_path: Option<PathBuf>,
    program: Option<String>,
    max_warnings: Option<u32>,
    work_dir: Option<PathBuf>,
    compile_log_path: Option<PathBuf>,
    log_mode: Option<LogMode>,
    failure_policy: Option<FailurePolicy>,
    workers: Option<usize>,
}

impl RunConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn template_path(mut self, path: PathBuf) -> Self {
        self.template_path = Some(path);
        self
    }
    pub fn start_temperature(mut self, temperature: f64) -> Self {
        self.start_temperature = Some(temperature);
        self
    }
    pub fn replicates(mut self, n: usize) -> Self {
        self.replicates = Some(n);
        self
    }
    pub fn scaling_exponent(mut self, exponent: f64) -> Self {
        self.scaling_exponent = Some(exponent);
        self
    }
    pub fn base_name(mut self, name: impl Into<String>) -> Self {
        self.base_name = Some(name.into());
        self
    }
    pub fn topology_path(mut self, path: PathBuf) -> Self {
        self.topology_path = Some(path);
        self
    }
    pub fn structure_path(mut self, path: PathBuf) -> Self {
        self.structure_path = Some(path);
        self
    }
    pub fn index_path(mut self, path: PathBuf) -> Self {
        self.index_path = Some(path);
        self
    }
    pub fn program(mut self, program: impl Into<String>) -> Self {
        self.program = Some(program.into());
        self
    }
    pub fn max_warnings(mut self, n: u32) -> Self {
        self.max_warnings = Some(n);
        self
    }
    pub fn work_dir(mut self, path: PathBuf) -> Self {
        self.work_dir = Some(path);
        self
    }
    pub fn compile_log_path(mut self, path: PathBuf) -> Self {
        self.compile_log_path = Some(path);
        self
    }
    pub fn log_mode(mut self, mode: LogMode) -> Self {
        self.log_mode = Some(mode);
        self
    }
    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = Some(policy);
        self
    }
    pub fn workers(mut self, n: usize) -> Self {
        self.workers = Some(n);
        self
    }

    pub fn build(self) -> Result<RunConfig, ConfigError> {
        let start_temperature = self
            .start_temperature
            .ok_or(ConfigError::MissingParameter("start_temperature"))?;
        let scaling_exponent = self
            .scaling_exponent
            .ok_or(ConfigError::MissingParameter("scaling_exponent"))?;
        require_finite("start_temperature", start_temperature)?;
        require_finite("scaling_exponent", scaling_exponent)?;

        let ladder = LadderConfig {
            start_temperature,
            scaling_exponent,
            replicates: self
                .replicates
                .ok_or(ConfigError::MissingParameter("replicates"))?,
        };

        let log_mode = self.log_mode.unwrap_or_default();
        let workers = self.workers.unwrap_or(1);
        if workers == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "workers",
                reason: "at least one worker is required".to_string(),
            });
        }
        if workers > 1 && log_mode != LogMode::PerReplicate {
            return Err(ConfigError::InvalidParameter {
                name: "workers",
                reason: "parallel runs require per-replicate compile logs".to_string(),
            });
        }

        let output = OutputConfig {
            template_path: self
                .template_path
                .ok_or(ConfigError::MissingParameter("template_path"))?,
            base_name: self
                .base_name
                .ok_or(ConfigError::MissingParameter("base_name"))?,
            work_dir: self.work_dir.unwrap_or_else(|| PathBuf::from(".")),
            compile_log_path: self
                .compile_log_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_COMPILE_LOG)),
            log_mode,
        };

        let program = self
            .program
            .unwrap_or_else(|| DEFAULT_PROGRAM.to_string());
        if program.trim().is_empty() {
            return Err(ConfigError::InvalidParameter {
                name: "program",
                reason: "preprocessor name cannot be empty".to_string(),
            });
        }

        let preprocessor = Preprocessor {
            program,
            topology: self
                .topology_path
                .ok_or(ConfigError::MissingParameter("topology_path"))?,
            structure: self
                .structure_path
                .ok_or(ConfigError::MissingParameter("structure_path"))?,
            index: self
                .index_path
                .ok_or(ConfigError::MissingParameter("index_path"))?,
            max_warnings: self.max_warnings.unwrap_or(DEFAULT_MAX_WARNINGS),
        };

        Ok(RunConfig {
            ladder,
            output,
            preprocessor,
            failure_policy: self.failure_policy.unwrap_or_default(),
            workers,
        })
    }
}

fn require_finite(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter {
            name,
            reason: format!("expected a finite number, got {}", value),
        })
    }
}
