use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use thiserror::Error;
use tracing::debug;

/// Preprocessor invoked when none is configured.
pub const DEFAULT_PROGRAM: &str = "grompp_mpi";
/// Value passed to `-maxwarn` when none is configured.
pub const DEFAULT_MAX_WARNINGS: u32 = 2;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("Preprocessor '{program}' was not found; is it on PATH?")]
    NotFound { program: String },

    #[error("Failed to start preprocessor '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to capture output of '{program}': {source}")]
    Capture {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// Result of one preprocessor run.
///
/// A non-zero exit is not an error at this level; the caller decides whether
/// it should stop the remaining replicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOutcome {
    pub exit_code: Option<i32>,
    pub success: bool,
    pub stdout_lines: usize,
}

/// Derives the run-input name from a parameter file name (`npt3.mdp` -> `npt3.tpr`).
///
/// Only the first occurrence of `mdp` is replaced.
pub fn tpr_name_for(mdp_name: &str) -> String {
    mdp_name.replacen("mdp", "tpr", 1)
}

/// The external `grompp` preprocessor and the inputs shared by every replicate.
#[derive(Debug, Clone, PartialEq)]
pub struct Preprocessor {
    pub program: String,
    pub topology: PathBuf,
    pub structure: PathBuf,
    pub index: PathBuf,
    pub max_warnings: u32,
}

impl Preprocessor {
    /// Builds the full argument vector, program name first.
    pub fn command_line(&self, mdp_name: &str, tpr_name: &str) -> Vec<String> {
        vec![
            self.program.clone(),
            "-f".to_string(),
            mdp_name.to_string(),
            "-p".to_string(),
            self.topology.to_string_lossy().into_owned(),
            "-c".to_string(),
            self.structure.to_string_lossy().into_owned(),
            "-n".to_string(),
            self.index.to_string_lossy().into_owned(),
            "-o".to_string(),
            tpr_name.to_string(),
            "-maxwarn".to_string(),
            self.max_warnings.to_string(),
        ]
    }

    /// Runs the preprocessor in `work_dir` and copies its standard output into `log`.
    ///
    /// Blocks until the output stream is exhausted and the process has exited.
    /// Standard error is inherited from this process.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::NotFound`] if the program cannot be resolved, and
    /// other variants if the process cannot be started or its output cannot be
    /// copied. The exit status itself is reported through [`CompileOutcome`].
    pub fn compile(
        &self,
        work_dir: &Path,
        mdp_name: &str,
        tpr_name: &str,
        log: &mut impl Write,
    ) -> Result<CompileOutcome, CompileError> {
        let args = self.command_line(mdp_name, tpr_name);
        debug!("Running in {:?}: {}", work_dir, args.join(" "));

        let mut child = Command::new(&args[0])
            .args(&args[1..])
            .current_dir(work_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => CompileError::NotFound {
                    program: self.program.clone(),
                },
                _ => CompileError::Spawn {
                    program: self.program.clone(),
                    source: e,
                },
            })?;

        let capture_err = |source: io::Error| CompileError::Capture {
            program: self.program.clone(),
            source,
        };

        let mut stdout_lines = 0;
        if let Some(stdout) = child.stdout.take() {
            let mut reader = BufReader::new(stdout);
            let mut line = Vec::new();
            loop {
                line.clear();
                if reader.read_until(b'\n', &mut line).map_err(capture_err)? == 0 {
                    break;
                }
                stdout_lines += 1;
                log.write_all(&line).map_err(capture_err)?;
            }
        }
        log.flush().map_err(capture_err)?;

        let status = child.wait().map_err(capture_err)?;
        debug!("'{}' exited with {}", self.program, status);

        Ok(CompileOutcome {
            exit_code: status.code(),
            success: status.success(),
            stdout_lines,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn preprocessor(program: &str) -> Preprocessor {
        Preprocessor {
            program: program.to_string(),
            topology: PathBuf::from("../taddol_3htmf_stilbene_em.top"),
            structure: PathBuf::from("../major_endo.gro"),
            index: PathBuf::from("../index.ndx"),
            max_warnings: DEFAULT_MAX_WARNINGS,
        }
    }

    #[test]
    fn tpr_name_replaces_first_mdp_only() {
        assert_eq!(tpr_name_for("npt0.mdp"), "npt0.tpr");
        assert_eq!(tpr_name_for("npt15.mdp"), "npt15.tpr");
        assert_eq!(tpr_name_for("mdprun2.mdp"), "tprrun2.mdp");
    }

    #[test]
    fn command_line_has_fixed_shape() {
        let args = preprocessor(DEFAULT_PROGRAM).command_line("npt3.mdp", "npt3.tpr");
        assert_eq!(
            args,
            vec![
                "grompp_mpi",
                "-f",
                "npt3.mdp",
                "-p",
                "../taddol_3htmf_stilbene_em.top",
                "-c",
                "../major_endo.gro",
                "-n",
                "../index.ndx",
                "-o",
                "npt3.tpr",
                "-maxwarn",
                "2",
            ]
        );
    }

    #[test]
    fn missing_program_is_reported_as_not_found() {
        let mut log = Vec::new();
        let result = preprocessor("definitely-not-a-real-grompp-binary").compile(
            Path::new("."),
            "npt0.mdp",
            "npt0.tpr",
            &mut log,
        );
        assert!(matches!(result, Err(CompileError::NotFound { .. })));
        assert!(log.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn stdout_is_copied_to_log() {
        let mut log = Vec::new();
        let outcome = preprocessor("echo")
            .compile(Path::new("."), "npt0.mdp", "npt0.tpr", &mut log)
            .unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.exit_code, Some(0));
        assert_eq!(outcome.stdout_lines, 1);
        assert_eq!(
            String::from_utf8(log).unwrap(),
            "-f npt0.mdp -p ../taddol_3htmf_stilbene_em.top -c ../major_endo.gro \
             -n ../index.ndx -o npt0.tpr -maxwarn 2\n"
        );
    }

    #[cfg(unix)]
    #[test]
    fn nonzero_exit_is_an_outcome_not_an_error() {
        let mut log = Vec::new();
        let outcome = preprocessor("false")
            .compile(Path::new("."), "npt0.mdp", "npt0.tpr", &mut log)
            .unwrap();

        assert!(!outcome.success);
        assert_eq!(outcome.exit_code, Some(1));
        assert_eq!(outcome.stdout_lines, 0);
    }
}
