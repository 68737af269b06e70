//! Core type definitions for foldercopy

mod error;
mod outcome;

pub use error::{ConfigError, CopyError, LogError};
pub use outcome::{CopyOutcome, CopyStage, CopyStats};
