use super::failure::{DriverFailure, classify_stderr};
use crate::design::DesignJob;
use crate::progress::{Progress, ProgressReporter};
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info};

const STDERR_TAIL_LINES: usize = 20;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("Failed to launch '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Driver run failed: {failure}. Hint: {}", .failure.hint())]
    Classified { failure: DriverFailure },

    #[error("Driver exited with status {code:?}:\n{stderr_tail}")]
    Exited {
        code: Option<i32>,
        stderr_tail: String,
    },
}

#[derive(Debug)]
pub struct DriverOutput {
    pub stdout: String,
    pub stderr: String,
}

/// A ready-to-spawn driver invocation: interpreter, driver script, and the
/// rendered job arguments.
#[derive(Debug, Clone)]
pub struct DriverCommand {
    python: PathBuf,
    script: PathBuf,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
}

impl DriverCommand {
    pub fn new(python: impl Into<PathBuf>, script: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            python: python.into(),
            script: script.into(),
            args,
            working_dir: None,
        }
    }

    pub fn for_job(
        python: impl Into<PathBuf>,
        script: impl Into<PathBuf>,
        job: &DesignJob,
    ) -> Self {
        Self::new(python, script, job.to_args())
    }

    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Shell-style rendering for logs and dry runs.
    pub fn command_line(&self) -> String {
        let mut parts = vec![
            self.python.display().to_string(),
            self.script.display().to_string(),
        ];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }

    /// Runs the driver to completion, capturing its output. A non-zero exit
    /// is classified against the known failure signatures before being
    /// surfaced raw.
    pub async fn run(&self, reporter: &ProgressReporter<'_>) -> Result<DriverOutput, DriverError> {
        info!("Launching design driver: {}", self.command_line());
        reporter.report(Progress::PhaseStart {
            name: "Design optimization",
        });

        let mut command = Command::new(&self.python);
        command.arg(&self.script).args(&self.args);
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }

        let output = command.output().await.map_err(|e| DriverError::Spawn {
            program: self.python.display().to_string(),
            source: e,
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            debug!("Driver stderr:\n{}", stderr);
            if let Some(failure) = classify_stderr(&stderr) {
                return Err(DriverError::Classified { failure });
            }
            return Err(DriverError::Exited {
                code: output.status.code(),
                stderr_tail: tail_lines(&stderr, STDERR_TAIL_LINES),
            });
        }

        reporter.report(Progress::PhaseFinish);
        info!("Driver run completed.");
        Ok(DriverOutput { stdout, stderr })
    }
}

fn tail_lines(text: &str, n: usize) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(n);
    lines[start..].join("\n")
}
