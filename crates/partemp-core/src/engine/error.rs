use std::io;
use std::path::PathBuf;
use thiserror::Error;

use super::config::ConfigError;
use crate::core::grompp::CompileError;
use crate::core::template::TemplateError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid run configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error("Failed to open compile log '{path}': {source}", path = path.display())]
    Log {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Preprocessing of replicate {index} failed ({status}); remaining replicates aborted", status = describe_exit(*exit_code))]
    CompileFailed {
        index: usize,
        exit_code: Option<i32>,
    },

    #[error("Failed to build worker pool: {0}")]
    WorkerPool(String),
}

fn describe_exit(exit_code: Option<i32>) -> String {
    match exit_code {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}
