use anyhow::Result;
use mysql_backup_core::{Backuper, CancellationToken, Config, MySqlDriver, SslMode};
use std::sync::Arc;
use tracing::info;

pub async fn run(config_path: &str, force_secure: bool, cancel: &CancellationToken) -> Result<()> {
    info!("Loading configuration from: {}", config_path);

    let config = Config::load(config_path).await?;
    let secure = config.secure || force_secure;

    info!(
        "Starting backup of {} to {} (ssl-mode: {})",
        config.database.database,
        config.backup_path.display(),
        SslMode::from_secure(secure)
    );

    let driver = Arc::new(MySqlDriver::new(config.connect_timeout()));
    Backuper::from_config(driver, &config)
        .backup(cancel, secure)
        .await?;

    info!("Backup completed successfully");
    Ok(())
}
