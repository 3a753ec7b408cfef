use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "mysql-backup")]
#[command(about = "MySQL backup and restore agent", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (-v for debug, -vv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Dump the database to the configured backup path
    Backup {
        /// Path to the configuration file
        #[arg(short, long)]
        config: String,

        /// Require TLS for the dump regardless of the config file
        #[arg(long)]
        secure: bool,
    },

    /// Load the configured backup file into the database
    Restore {
        /// Path to the configuration file
        #[arg(short, long)]
        config: String,
    },

    /// Check that the database is reachable with the configured credentials
    Check {
        /// Path to the configuration file
        #[arg(short, long)]
        config: String,
    },

    /// Parse and validate a configuration file
    ValidateConfig {
        /// Path to the configuration file
        #[arg(short, long)]
        config: String,

        /// Output format (text, yaml)
        #[arg(short, long, default_value = "text")]
        format: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        match cli.verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::Backup { config, secure } => {
            let cancel = commands::cancel_on_interrupt();
            commands::backup::run(&config, secure, &cancel).await?;
        }
        Commands::Restore { config } => {
            let cancel = commands::cancel_on_interrupt();
            commands::restore::run(&config, &cancel).await?;
        }
        Commands::Check { config } => {
            let cancel = commands::cancel_on_interrupt();
            commands::check::run(&config, &cancel).await?;
        }
        Commands::ValidateConfig { config, format } => {
            commands::validate_config::run(&config, &format).await?;
        }
    }

    Ok(())
}
