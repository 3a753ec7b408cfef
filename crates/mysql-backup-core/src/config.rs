//! Configuration structures for MySQL backup and restore operations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Database connection parameters
    pub database: ConnectionParams,

    /// Local file the dump is written to (backup) or read from (restore)
    pub backup_path: PathBuf,

    /// Require TLS for mysqldump (backup only)
    #[serde(default)]
    pub secure: bool,

    /// Timeout for the connectivity check in seconds (default: 10)
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// External client binaries
    #[serde(default)]
    pub tools: ToolsConfig,
}

fn default_connect_timeout_secs() -> u64 {
    10
}

/// How to reach the target database.
///
/// `Debug` never prints the password.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionParams {
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    pub user: String,

    pub password: String,

    /// Database (schema) name
    #[serde(rename = "name")]
    pub database: String,
}

fn default_port() -> u16 {
    3306
}

impl ConnectionParams {
    pub fn new(
        host: impl Into<String>,
        port: u16,
        user: impl Into<String>,
        password: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            user: user.into(),
            password: password.into(),
            database: database.into(),
        }
    }

    /// Check that every field is set
    pub fn validate(&self) -> crate::Result<()> {
        let required = [
            ("host", &self.host),
            ("user", &self.user),
            ("password", &self.password),
            ("name", &self.database),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(crate::Error::Config(format!(
                    "database.{} must not be empty",
                    field
                )));
            }
        }

        if self.port == 0 {
            return Err(crate::Error::Config(
                "database.port must be > 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl fmt::Debug for ConnectionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionParams")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .finish()
    }
}

/// Paths of the external MySQL client binaries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Dump utility (default: `mysqldump` from PATH)
    #[serde(default = "default_mysqldump")]
    pub mysqldump: PathBuf,

    /// Restore client (default: `mysql` from PATH)
    #[serde(default = "default_mysql")]
    pub mysql: PathBuf,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            mysqldump: default_mysqldump(),
            mysql: default_mysql(),
        }
    }
}

fn default_mysqldump() -> PathBuf {
    PathBuf::from("mysqldump")
}

fn default_mysql() -> PathBuf {
    PathBuf::from("mysql")
}

impl Config {
    /// Parse a YAML document into a validated config
    pub fn from_yaml(content: &str) -> crate::Result<Self> {
        let config: Config = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a YAML config file
    pub async fn load(path: impl AsRef<Path>) -> crate::Result<Self> {
        let content = tokio::fs::read_to_string(path.as_ref()).await?;
        Self::from_yaml(&content)
    }

    /// Validate the configuration
    pub fn validate(&self) -> crate::Result<()> {
        self.database.validate()?;

        if self.backup_path.as_os_str().is_empty() {
            return Err(crate::Error::Config(
                "backup_path must not be empty".to_string(),
            ));
        }

        if self.connect_timeout_secs == 0 {
            return Err(crate::Error::Config(
                "connect_timeout_secs must be > 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}
