//! Backuper unit tests.
//!
//! Tests for the backup job including:
//! - Pre-check ordering (no dump when the ping fails)
//! - Transport security flag
//! - Error shapes for failed dumps
//! - Cancellation

use std::path::PathBuf;
use tempfile::TempDir;

use mysql_backup_core::process::PASSWORD_ENV;
use mysql_backup_core::{Backuper, CancellationToken, Error, Operation};

use super::helpers::{test_params, MockDriver, RecordingRunner, DB_PASS};

#[tokio::test]
async fn test_backup_pings_then_dumps() {
    let driver = MockDriver::reachable();
    let runner = RecordingRunner::succeeding();
    let backuper = Backuper::new(driver.clone(), test_params(), "/backups/backup.sql")
        .with_runner(runner.clone());

    backuper
        .backup(&CancellationToken::new(), false)
        .await
        .unwrap();

    assert_eq!(driver.pings(), 1);
    let calls = runner.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].program, PathBuf::from("mysqldump"));
    assert_eq!(
        calls[0].args,
        vec![
            "-h",
            "127.0.0.1",
            "-P",
            "3306",
            "-u",
            "testuser",
            "testdb",
            "--result-file",
            "/backups/backup.sql",
            "--ssl-mode=DISABLED",
        ]
    );
    assert_eq!(calls[0].env_value(PASSWORD_ENV), Some(DB_PASS));
}

#[tokio::test]
async fn test_secure_backup_requires_tls() {
    let runner = RecordingRunner::succeeding();
    let backuper = Backuper::new(MockDriver::reachable(), test_params(), "backup.sql")
        .with_runner(runner.clone());

    backuper
        .backup(&CancellationToken::new(), true)
        .await
        .unwrap();

    let calls = runner.calls();
    assert!(calls[0].args.contains(&"--ssl-mode=REQUIRED".to_string()));
    assert!(!calls[0].args.contains(&"--ssl-mode=DISABLED".to_string()));
}

#[tokio::test]
async fn test_unreachable_host_skips_dump() {
    let runner = RecordingRunner::succeeding();
    let backuper = Backuper::new(
        MockDriver::unreachable("dial tcp: lookup wrong: no such host"),
        test_params(),
        "backup.sql",
    )
    .with_runner(runner.clone());

    let err = backuper
        .backup(&CancellationToken::new(), false)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("failed to connect to database"));
    assert!(err.to_string().contains("no such host"));
    assert!(matches!(
        err,
        Error::Connectivity {
            operation: Operation::Backup,
            ..
        }
    ));
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn test_failed_dump_carries_output() {
    let runner = RecordingRunner::failing(
        "exit status: 2",
        "mysqldump: Got error: 1049: Unknown database 'testdb'",
    );
    let backuper = Backuper::new(MockDriver::reachable(), test_params(), "backup.sql")
        .with_runner(runner);

    let err = backuper
        .backup(&CancellationToken::new(), false)
        .await
        .unwrap_err();

    let message = err.to_string();
    assert!(message.starts_with("failed executing mysqldump: exit status: 2"));
    assert!(message.contains("Unknown database 'testdb'"));
    assert_eq!(
        err.process_output(),
        Some("mysqldump: Got error: 1049: Unknown database 'testdb'")
    );
}

#[tokio::test]
async fn test_cancelled_before_ping() {
    let runner = RecordingRunner::succeeding();
    let backuper = Backuper::new(MockDriver::reachable(), test_params(), "backup.sql")
        .with_runner(runner.clone());

    let cancel = CancellationToken::new();
    cancel.cancel();
    let err = backuper.backup(&cancel, false).await.unwrap_err();

    assert!(matches!(err, Error::Cancelled(Operation::Backup)));
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn test_missing_binary_is_execution_error() {
    let temp_dir = TempDir::new().unwrap();
    let backuper = Backuper::new(
        MockDriver::reachable(),
        test_params(),
        temp_dir.path().join("backup.sql"),
    )
    .with_program(temp_dir.path().join("no-such-mysqldump"));

    let err = backuper
        .backup(&CancellationToken::new(), false)
        .await
        .unwrap_err();

    assert!(err
        .to_string()
        .starts_with("failed executing mysqldump: failed to launch"));
}

#[cfg(unix)]
#[tokio::test]
async fn test_backup_with_fake_mysqldump_writes_file() {
    use super::helpers::fake_mysqldump;

    let temp_dir = TempDir::new().unwrap();
    let backup_file = temp_dir.path().join("backup.dump");
    let backuper = Backuper::new(MockDriver::reachable(), test_params(), &backup_file)
        .with_program(fake_mysqldump(temp_dir.path()));

    backuper
        .backup(&CancellationToken::new(), false)
        .await
        .unwrap();

    let metadata = std::fs::metadata(&backup_file).unwrap();
    assert!(metadata.len() > 0);
    let content = std::fs::read_to_string(&backup_file).unwrap();
    assert!(content.contains("password=testpassword"));
}

#[cfg(unix)]
#[tokio::test]
async fn test_failing_mysqldump_stderr_is_captured() {
    use super::helpers::write_script;

    let temp_dir = TempDir::new().unwrap();
    let program = write_script(
        temp_dir.path(),
        "mysqldump",
        "echo \"mysqldump: Got error: 2002: Can't connect\" >&2\nexit 2",
    );
    let backuper = Backuper::new(
        MockDriver::reachable(),
        test_params(),
        temp_dir.path().join("backup.sql"),
    )
    .with_program(program);

    let err = backuper
        .backup(&CancellationToken::new(), true)
        .await
        .unwrap_err();

    assert!(err.to_string().starts_with("failed executing mysqldump:"));
    assert!(err
        .process_output()
        .unwrap()
        .contains("Got error: 2002: Can't connect"));
}
