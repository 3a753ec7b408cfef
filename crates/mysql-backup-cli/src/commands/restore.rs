use anyhow::Result;
use mysql_backup_core::{CancellationToken, Config, MySqlDriver, Restorer};
use std::sync::Arc;
use tracing::info;

pub async fn run(config_path: &str, cancel: &CancellationToken) -> Result<()> {
    info!("Loading configuration from: {}", config_path);

    let config = Config::load(config_path).await?;

    info!(
        "Starting restore of {} from {}",
        config.database.database,
        config.backup_path.display()
    );

    let driver = Arc::new(MySqlDriver::new(config.connect_timeout()));
    Restorer::from_config(driver, &config).restore(cancel).await?;

    info!("Restore completed successfully");
    Ok(())
}
