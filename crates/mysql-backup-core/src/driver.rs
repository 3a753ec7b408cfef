//! Database connectivity check.
//!
//! Both agents ping the database before launching an external client. The
//! driver is passed into each job explicitly so tests can substitute it.

use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::Connection;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::config::ConnectionParams;
use crate::error::{Error, Operation};
use crate::Result;

/// Failure of a single connectivity check
#[derive(Error, Debug)]
pub enum PingError {
    /// Options were rejected before any connection attempt
    #[error("{0}")]
    InvalidOptions(String),

    /// Connect or ping round-trip failed
    #[error("{0}")]
    Unreachable(String),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("cancelled")]
    Cancelled,
}

/// Trait for database drivers capable of a liveness check
#[async_trait]
pub trait DatabaseDriver: Send + Sync {
    /// Open a connection, ping it once and release it.
    async fn ping(
        &self,
        params: &ConnectionParams,
        cancel: &CancellationToken,
    ) -> std::result::Result<(), PingError>;
}

/// MySQL driver backed by a single sqlx connection
#[derive(Debug, Clone)]
pub struct MySqlDriver {
    connect_timeout: Duration,
}

impl Default for MySqlDriver {
    fn default() -> Self {
        Self::new(Duration::from_secs(10))
    }
}

impl MySqlDriver {
    /// Create a driver whose connect+ping is bounded by `connect_timeout`
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }

    fn connect_options(params: &ConnectionParams) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&params.host)
            .port(params.port)
            .username(&params.user)
            .password(&params.password)
            .database(&params.database)
    }

    async fn connect_and_ping(
        params: &ConnectionParams,
    ) -> std::result::Result<(), PingError> {
        let options = Self::connect_options(params);
        let mut conn = MySqlConnection::connect_with(&options)
            .await
            .map_err(classify)?;

        if let Err(e) = conn.ping().await {
            // Broken connection: COM_QUIT cannot be delivered, drop the socket.
            drop(conn);
            return Err(classify(e));
        }

        release(conn).await;
        Ok(())
    }
}

#[async_trait]
impl DatabaseDriver for MySqlDriver {
    async fn ping(
        &self,
        params: &ConnectionParams,
        cancel: &CancellationToken,
    ) -> std::result::Result<(), PingError> {
        debug!(
            "Pinging MySQL at {}:{} (database: {})",
            params.host, params.port, params.database
        );

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(PingError::Cancelled),
            result = tokio::time::timeout(self.connect_timeout, Self::connect_and_ping(params)) => {
                result.unwrap_or(Err(PingError::Timeout(self.connect_timeout)))
            }
        }
    }
}

/// Close a healthy connection. A failed close leaves the process in an
/// unknown state and is not recoverable.
async fn release(conn: MySqlConnection) {
    if let Err(e) = conn.close().await {
        error!("Failed to release database connection: {}", e);
        panic!("failed to release database connection: {}", e);
    }
}

fn classify(err: sqlx::Error) -> PingError {
    match err {
        sqlx::Error::Configuration(e) => PingError::InvalidOptions(e.to_string()),
        other => PingError::Unreachable(other.to_string()),
    }
}

/// Run the pre-check for `operation`, mapping failures into the library error.
pub async fn check_connectivity(
    driver: &dyn DatabaseDriver,
    params: &ConnectionParams,
    cancel: &CancellationToken,
    operation: Operation,
) -> Result<()> {
    driver
        .ping(params, cancel)
        .await
        .map_err(|e| match e {
            PingError::InvalidOptions(message) => Error::DriverOpen(message),
            PingError::Cancelled => Error::Cancelled(operation),
            other => Error::Connectivity {
                operation,
                message: other.to_string(),
            },
        })?;

    debug!("Database reachable, continuing with {}", operation);
    Ok(())
}
