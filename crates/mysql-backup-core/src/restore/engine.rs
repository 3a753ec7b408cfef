//! Restore job orchestration.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::command::restore_command;
use crate::config::{Config, ConnectionParams};
use crate::driver::{check_connectivity, DatabaseDriver};
use crate::error::Operation;
use crate::process::{CommandRunner, CommandSpec, TokioCommandRunner};
use crate::{Error, Result};

const LABEL: &str = "mysql restore";

/// Replays one dump file into a database.
pub struct Restorer {
    driver: Arc<dyn DatabaseDriver>,
    runner: Arc<dyn CommandRunner>,
    params: ConnectionParams,
    backup_path: PathBuf,
    program: PathBuf,
}

impl Restorer {
    /// Create a restorer reading `backup_path` with `mysql` from PATH
    pub fn new(
        driver: Arc<dyn DatabaseDriver>,
        params: ConnectionParams,
        backup_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            driver,
            runner: Arc::new(TokioCommandRunner),
            params,
            backup_path: backup_path.into(),
            program: PathBuf::from("mysql"),
        }
    }

    /// Create a restorer from a loaded configuration
    pub fn from_config(driver: Arc<dyn DatabaseDriver>, config: &Config) -> Self {
        Self::new(driver, config.database.clone(), config.backup_path.clone())
            .with_program(config.tools.mysql.clone())
    }

    /// Use a different command runner
    pub fn with_runner(mut self, runner: Arc<dyn CommandRunner>) -> Self {
        self.runner = runner;
        self
    }

    /// Use a different restore client binary
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    pub fn backup_path(&self) -> &Path {
        &self.backup_path
    }

    /// The restore command this restorer would run
    pub fn command(&self) -> CommandSpec {
        restore_command(&self.program, &self.params, &self.backup_path)
    }

    /// Ping the database, then load the dump into it.
    ///
    /// On failure the database may hold a partially applied dump.
    pub async fn restore(&self, cancel: &CancellationToken) -> Result<()> {
        info!(
            "Starting restore of database {} on {}:{} from {}",
            self.params.database,
            self.params.host,
            self.params.port,
            self.backup_path.display()
        );

        check_connectivity(
            self.driver.as_ref(),
            &self.params,
            cancel,
            Operation::Restore,
        )
        .await?;

        self.check_dump_file().await?;

        let spec = self.command();
        self.runner
            .run(&spec, cancel)
            .await
            .map_err(|e| e.into_error(LABEL, Operation::Restore))?
            .into_result(LABEL)?;

        info!("Restore of database {} completed", self.params.database);
        Ok(())
    }

    /// Reject missing or empty dump files before launching the client
    async fn check_dump_file(&self) -> Result<()> {
        let metadata = tokio::fs::metadata(&self.backup_path)
            .await
            .map_err(|e| Error::ProcessExecution {
                label: LABEL.to_string(),
                message: format!("cannot read dump file {}", self.backup_path.display()),
                output: e.to_string(),
            })?;

        if metadata.len() == 0 {
            return Err(Error::ProcessExecution {
                label: LABEL.to_string(),
                message: format!("dump file {} is empty", self.backup_path.display()),
                output: String::new(),
            });
        }

        debug!(
            "Dump file {} is {} bytes",
            self.backup_path.display(),
            metadata.len()
        );
        Ok(())
    }
}
