//! Backup of a MySQL database into a local dump file.

pub mod command;
pub mod engine;

pub use command::{dump_command, SslMode};
pub use engine::Backuper;
