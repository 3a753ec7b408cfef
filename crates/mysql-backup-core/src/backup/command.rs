//! `mysqldump` invocation.

use std::fmt;
use std::path::Path;

use crate::config::ConnectionParams;
use crate::process::{CommandSpec, PASSWORD_ENV};

/// Transport security requested from the dump utility
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SslMode {
    Required,
    Disabled,
}

impl SslMode {
    pub fn from_secure(secure: bool) -> Self {
        if secure {
            SslMode::Required
        } else {
            SslMode::Disabled
        }
    }
}

impl fmt::Display for SslMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SslMode::Required => write!(f, "REQUIRED"),
            SslMode::Disabled => write!(f, "DISABLED"),
        }
    }
}

/// Build the dump command writing `params.database` to `backup_path`.
///
/// The password travels in the child's environment, never in argv.
pub fn dump_command(
    program: &Path,
    params: &ConnectionParams,
    backup_path: &Path,
    secure: bool,
) -> CommandSpec {
    CommandSpec::new(program)
        .arg("-h")
        .arg(&params.host)
        .arg("-P")
        .arg(params.port.to_string())
        .arg("-u")
        .arg(&params.user)
        .arg(&params.database)
        .arg("--result-file")
        .arg(backup_path.display().to_string())
        .arg(format!("--ssl-mode={}", SslMode::from_secure(secure)))
        .env(PASSWORD_ENV, &params.password)
}
