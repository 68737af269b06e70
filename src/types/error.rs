//! Error types for foldercopy
//!
//! Each failure domain gets its own enum so callers can tell what must be
//! absorbed from what must abort the run:
//! - [`ConfigError`]: recovered by falling back to defaults, except
//!   [`ConfigError::NoBaseDirectory`]
//! - [`LogError`]: never recovered
//! - [`CopyError`]: always converted into a failed copy outcome

use std::io::{Error as IoError, ErrorKind};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while resolving the configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// None of the profile environment variables is set
    #[error("Configuration error: no base directory available (set PUBLIC, USERPROFILE or HOME)")]
    NoBaseDirectory,

    /// The program location could not be resolved
    #[error("Configuration error: cannot locate program directory: {0}")]
    ProgramDir(#[source] IoError),

    /// Config file exists but could not be read
    #[error("Configuration error: failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: IoError,
    },

    /// Config file is not valid JSON for a configuration
    #[error("Configuration error: failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Parsed values break an invariant
    #[error("Configuration error: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// Check if this error must stop the program
    ///
    /// Everything except a missing base directory is recovered by defaults.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ConfigError::NoBaseDirectory)
    }
}

/// Errors raised while appending to the audit log
#[derive(Debug, Error)]
pub enum LogError {
    /// Program location could not be resolved
    #[error("Log error: cannot locate program directory: {0}")]
    ProgramDir(#[source] IoError),

    /// Log directory could not be created
    #[error("Log error: failed to create log directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: IoError,
    },

    /// Line could not be appended
    #[error("Log error: failed to append to {path}: {source}")]
    Append {
        path: PathBuf,
        #[source]
        source: IoError,
    },
}

/// Errors raised by the recursive copy
#[derive(Debug, Error)]
pub enum CopyError {
    /// IO error without a more specific classification
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: IoError,
    },

    /// Permission denied for specific path
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Disk full while writing a path
    #[error("Disk full while writing: {path}")]
    DiskFull { path: PathBuf },

    /// Source folder is missing
    #[error("source folder does not exist: {path}")]
    SourceMissing { path: PathBuf },

    /// Source exists but is not a directory
    #[error("source is not a directory: {path}")]
    SourceNotDirectory { path: PathBuf },

    /// Destination entry has a different kind than the source entry
    #[error("Cannot overwrite {existing} with {incoming}: {path}")]
    TypeConflict {
        path: PathBuf,
        existing: &'static str,
        incoming: &'static str,
    },

    /// Target is the source or lies inside it
    #[error("Cannot copy {source_path} into itself: {target_path}")]
    SelfCopy {
        source_path: PathBuf,
        target_path: PathBuf,
    },
}

impl CopyError {
    /// Classify an IO error for the path it happened on
    pub fn from_io(path: &Path, error: IoError) -> Self {
        if matches!(error.kind(), ErrorKind::PermissionDenied) {
            CopyError::PermissionDenied {
                path: path.to_path_buf(),
            }
        } else if matches!(error.kind(), ErrorKind::StorageFull)
            || matches!(error.raw_os_error(), Some(28 | 112 | 122))
        {
            CopyError::DiskFull {
                path: path.to_path_buf(),
            }
        } else {
            CopyError::Io {
                path: path.to_path_buf(),
                source: error,
            }
        }
    }

    /// Path the error is about
    pub fn path(&self) -> &Path {
        match self {
            CopyError::Io { path, .. }
            | CopyError::PermissionDenied { path }
            | CopyError::DiskFull { path }
            | CopyError::SourceMissing { path }
            | CopyError::SourceNotDirectory { path }
            | CopyError::TypeConflict { path, .. } => path,
            CopyError::SelfCopy { target_path, .. } => target_path,
        }
    }

    /// Check if this error is related to permissions
    pub fn is_permission_error(&self) -> bool {
        matches!(self, CopyError::PermissionDenied { .. })
    }

    /// Check if this error is related to disk space
    pub fn is_disk_space_error(&self) -> bool {
        matches!(self, CopyError::DiskFull { .. })
    }
}
