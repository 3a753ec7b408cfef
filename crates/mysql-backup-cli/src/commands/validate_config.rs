use anyhow::Result;
use mysql_backup_core::Config;
use tracing::info;

pub async fn run(config_path: &str, format: &str) -> Result<()> {
    info!("Validating configuration from: {}", config_path);

    let mut config = Config::load(config_path).await?;
    config.database.password = "<redacted>".to_string();

    match format.to_lowercase().as_str() {
        "yaml" => {
            print!("{}", serde_yaml::to_string(&config)?);
        }
        _ => print_summary(&config),
    }

    Ok(())
}

fn print_summary(config: &Config) {
    let db = &config.database;
    println!("Configuration is valid");
    println!("  Host:            {}:{}", db.host, db.port);
    println!("  User:            {}", db.user);
    println!("  Password:        {}", db.password);
    println!("  Database:        {}", db.database);
    println!("  Backup path:     {}", config.backup_path.display());
    println!("  Secure:          {}", config.secure);
    println!("  Connect timeout: {}s", config.connect_timeout_secs);
    println!("  mysqldump:       {}", config.tools.mysqldump.display());
    println!("  mysql:           {}", config.tools.mysql.display());
}
