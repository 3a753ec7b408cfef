//! External process invocation.
//!
//! Commands are described by a [`CommandSpec`] and executed by a
//! [`CommandRunner`]. The default runner spawns the child with tokio,
//! captures stdout and stderr, and kills the child when the cancellation
//! token fires.

use async_trait::async_trait;
use std::fmt;
use std::path::PathBuf;
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::{Error, Operation};

/// Environment variable the MySQL clients read the password from
pub const PASSWORD_ENV: &str = "MYSQL_PWD";

/// A fully constructed external command.
///
/// Neither `Display` nor `Debug` print environment values.
#[derive(Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub envs: Vec<(String, String)>,
    /// File streamed into the child's standard input
    pub stdin: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            envs: Vec::new(),
            stdin: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    pub fn stdin_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.stdin = Some(path.into());
        self
    }

    /// Value of an environment variable set for the child
    pub fn env_value(&self, key: &str) -> Option<&str> {
        self.envs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        if let Some(stdin) = &self.stdin {
            write!(f, " < {}", stdin.display())?;
        }
        Ok(())
    }
}

impl fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let env_keys: Vec<&str> = self.envs.iter().map(|(k, _)| k.as_str()).collect();
        f.debug_struct("CommandSpec")
            .field("program", &self.program)
            .field("args", &self.args)
            .field("envs", &env_keys)
            .field("stdin", &self.stdin)
            .finish()
    }
}

/// Result of a process that ran to completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    /// Exit status as reported by the OS, e.g. `exit status: 1`
    pub status: String,
    /// stdout followed by stderr
    pub combined: String,
}

impl From<std::process::Output> for CommandOutput {
    fn from(output: std::process::Output) -> Self {
        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        Self {
            success: output.status.success(),
            status: output.status.to_string(),
            combined,
        }
    }
}

impl CommandOutput {
    /// Turn a non-zero exit into a process execution error
    pub fn into_result(self, label: &str) -> crate::Result<()> {
        if self.success {
            return Ok(());
        }
        Err(Error::ProcessExecution {
            label: label.to_string(),
            message: self.status,
            output: self.combined,
        })
    }
}

/// Process did not run to completion
#[derive(Error, Debug)]
pub enum ExecError {
    #[error("failed to open {}: {source}", .path.display())]
    Stdin {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to launch {}: {source}", .program.display())]
    Launch {
        program: PathBuf,
        source: std::io::Error,
    },

    #[error("failed waiting for process: {0}")]
    Wait(std::io::Error),

    #[error("cancelled")]
    Cancelled,
}

impl ExecError {
    /// Map into the library error for the given job
    pub fn into_error(self, label: &str, operation: Operation) -> Error {
        match self {
            ExecError::Cancelled => Error::Cancelled(operation),
            other => Error::ProcessExecution {
                label: label.to_string(),
                message: other.to_string(),
                output: String::new(),
            },
        }
    }
}

/// Trait for executing external commands
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `spec` to completion, or until `cancel` fires.
    async fn run(
        &self,
        spec: &CommandSpec,
        cancel: &CancellationToken,
    ) -> Result<CommandOutput, ExecError>;
}

/// Runner spawning real child processes on the tokio runtime
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioCommandRunner;

#[async_trait]
impl CommandRunner for TokioCommandRunner {
    async fn run(
        &self,
        spec: &CommandSpec,
        cancel: &CancellationToken,
    ) -> Result<CommandOutput, ExecError> {
        if cancel.is_cancelled() {
            return Err(ExecError::Cancelled);
        }

        let stdin = match &spec.stdin {
            Some(path) => {
                let file = tokio::fs::File::open(path)
                    .await
                    .map_err(|source| ExecError::Stdin {
                        path: path.clone(),
                        source,
                    })?;
                Stdio::from(file.into_std().await)
            }
            None => Stdio::null(),
        };

        let mut command = Command::new(&spec.program);
        command
            .args(&spec.args)
            .envs(spec.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(stdin)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!("Running: {}", spec);

        let child = command.spawn().map_err(|source| ExecError::Launch {
            program: spec.program.clone(),
            source,
        })?;

        // Dropping the wait future drops the child, which kills it.
        tokio::select! {
            output = child.wait_with_output() => {
                output.map(CommandOutput::from).map_err(ExecError::Wait)
            }
            _ = cancel.cancelled() => {
                warn!("Cancellation requested, killing {}", spec.program.display());
                Err(ExecError::Cancelled)
            }
        }
    }
}
