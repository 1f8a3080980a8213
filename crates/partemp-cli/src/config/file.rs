use crate::cli::LogModeArg;
use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Settings read from a `--config` TOML file. Keys mirror the long CLI flags in kebab-case.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileConfig {
    pub template: Option<PathBuf>,
    pub start_temp: Option<f64>,
    pub number: Option<usize>,
    pub scaling_exponent: Option<f64>,
    pub base_name: Option<String>,
    pub topology: Option<PathBuf>,
    pub structure: Option<PathBuf>,
    pub index: Option<PathBuf>,
    pub grompp: Option<String>,
    pub maxwarn: Option<u32>,
    pub workdir: Option<PathBuf>,
    pub compile_log: Option<PathBuf>,
    pub log_mode: Option<LogModeArg>,
    pub fail_fast: Option<bool>,
    pub jobs: Option<usize>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}
