//! Restore of a MySQL database from a local dump file.

pub mod command;
pub mod engine;

pub use command::restore_command;
pub use engine::Restorer;
