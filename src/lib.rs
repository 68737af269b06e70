//! # foldercopy - Single-shot folder copy with an audit trail
//!
//! Copies a source folder into a target folder, overwriting what is already
//! there, and appends the outcome to a log file named after the current date.

// Module declarations
pub mod audit;
pub mod commands;
pub mod config;
pub mod executor;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use audit::{AuditLog, LogEntry, LogLevel};
pub use config::Config;
pub use executor::{copy_folder, copy_tree};
pub use types::{ConfigError, CopyError, CopyOutcome, CopyStats, LogError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
