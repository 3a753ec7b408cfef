//! `mysql` client invocation for replaying a dump.

use std::path::Path;

use crate::config::ConnectionParams;
use crate::process::{CommandSpec, PASSWORD_ENV};

/// Build the restore command loading `backup_path` into `params.database`.
///
/// The client is spawned directly with the dump as its standard input.
pub fn restore_command(
    program: &Path,
    params: &ConnectionParams,
    backup_path: &Path,
) -> CommandSpec {
    CommandSpec::new(program)
        .arg("-h")
        .arg(&params.host)
        .arg("-P")
        .arg(params.port.to_string())
        .arg("-u")
        .arg(&params.user)
        .arg(&params.database)
        .env(PASSWORD_ENV, &params.password)
        .stdin_file(backup_path)
}
