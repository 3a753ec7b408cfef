//! MySQL Backup Core Library
//!
//! This crate provides the backup and restore agents for a MySQL database.
//! Each agent verifies connectivity with a direct ping, then drives the
//! external `mysqldump` or `mysql` client against a local dump file.

pub mod backup;
pub mod config;
pub mod driver;
pub mod error;
pub mod process;
pub mod restore;

pub use backup::{Backuper, SslMode};
pub use config::{Config, ConnectionParams, ToolsConfig};
pub use driver::{check_connectivity, DatabaseDriver, MySqlDriver, PingError};
pub use error::{Error, Operation, Result};
pub use process::{CommandOutput, CommandRunner, CommandSpec, ExecError, TokioCommandRunner};
pub use restore::Restorer;
pub use tokio_util::sync::CancellationToken;
