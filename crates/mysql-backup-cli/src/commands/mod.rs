pub mod backup;
pub mod check;
pub mod restore;
pub mod validate_config;

use mysql_backup_core::CancellationToken;
use tracing::warn;

/// Token cancelled on Ctrl-C, so in-flight clients get killed
pub fn cancel_on_interrupt() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling");
            trigger.cancel();
        }
    });
    token
}
