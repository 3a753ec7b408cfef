use anyhow::Result;
use mysql_backup_core::{check_connectivity, CancellationToken, Config, MySqlDriver, Operation};
use tracing::info;

/// Run only the connectivity pre-check shared by backup and restore
pub async fn run(config_path: &str, cancel: &CancellationToken) -> Result<()> {
    let config = Config::load(config_path).await?;
    let params = &config.database;

    let driver = MySqlDriver::new(config.connect_timeout());
    check_connectivity(&driver, params, cancel, Operation::Check).await?;

    info!(
        "Database {} on {}:{} is reachable",
        params.database, params.host, params.port
    );
    println!("OK: {}@{}:{}/{}", params.user, params.host, params.port, params.database);
    Ok(())
}
