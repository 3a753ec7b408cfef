//! Backup job orchestration.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::command::dump_command;
use crate::config::{Config, ConnectionParams};
use crate::driver::{check_connectivity, DatabaseDriver};
use crate::error::Operation;
use crate::process::{CommandRunner, CommandSpec, TokioCommandRunner};
use crate::Result;

const LABEL: &str = "mysqldump";

/// Dumps one database to a local file.
///
/// Built for a single backup; holds no state between calls.
pub struct Backuper {
    driver: Arc<dyn DatabaseDriver>,
    runner: Arc<dyn CommandRunner>,
    params: ConnectionParams,
    backup_path: PathBuf,
    program: PathBuf,
}

impl Backuper {
    /// Create a backuper writing to `backup_path` with `mysqldump` from PATH
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
            program: PathBuf::from("mysqldump"),
        }
    }

    /// Create a backuper from a loaded configuration
    pub fn from_config(driver: Arc<dyn DatabaseDriver>, config: &Config) -> Self {
        Self::new(driver, config.database.clone(), config.backup_path.clone())
            .with_program(config.tools.mysqldump.clone())
    }

    /// Use a different command runner
    pub fn with_runner(mut self, runner: Arc<dyn CommandRunner>) -> Self {
        self.runner = runner;
        self
    }

    /// Use a different dump utility binary
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    pub fn backup_path(&self) -> &Path {
        &self.backup_path
    }

    /// The dump command this backuper would run
    pub fn command(&self, secure: bool) -> CommandSpec {
        dump_command(&self.program, &self.params, &self.backup_path, secure)
    }

    /// Ping the database, then dump it to the backup path.
    ///
    /// The file at the backup path is only valid when this returns `Ok`.
    pub async fn backup(&self, cancel: &CancellationToken, secure: bool) -> Result<()> {
        info!(
            "Starting backup of database {} on {}:{}",
            self.params.database, self.params.host, self.params.port
        );

        check_connectivity(
            self.driver.as_ref(),
            &self.params,
            cancel,
            Operation::Backup,
        )
        .await?;

        let spec = self.command(secure);
        self.runner
            .run(&spec, cancel)
            .await
            .map_err(|e| e.into_error(LABEL, Operation::Backup))?
            .into_result(LABEL)?;

        info!("Backup written to {}", self.backup_path.display());
        Ok(())
    }
}
