//! Append-only audit log
//!
//! One file per local calendar day, `logs/YYYY-MM-DD.log`, one line per event:
//!
//! ```text
//! [2024-05-01 09:30:12] SUCCESS: copied /src to /dst (2 files, ...)
//! ```

use crate::config::program_dir;
use crate::types::LogError;
use chrono::{Local, NaiveDateTime};
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Directory name of the audit log, relative to the executable
pub const LOG_DIR_NAME: &str = "logs";

/// Timestamp format of a log line
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Date format of a log file name
pub const FILE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Severity of an audit entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Success,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Success => "SUCCESS",
            LogLevel::Error => "ERROR",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single audit event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: NaiveDateTime,
    pub level: LogLevel,
    pub message: String,
}

impl LogEntry {
    /// Entry stamped with the current local time
    pub fn now(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now().naive_local(),
            level,
            message: message.into(),
        }
    }

    /// File name of the log this entry belongs to
    pub fn file_name(&self) -> String {
        format!("{}.log", self.timestamp.format(FILE_DATE_FORMAT))
    }

    /// Render the entry as one line, trailing newline included
    ///
    /// Line breaks inside the message are escaped to keep one event per line.
    pub fn render(&self) -> String {
        format!(
            "[{}] {}: {}\n",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.level,
            escape_line_breaks(&self.message)
        )
    }
}

/// Writer for the dated audit log files
#[derive(Debug, Clone)]
pub struct AuditLog {
    dir: PathBuf,
}

impl AuditLog {
    /// Audit log stored in `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Audit log in the `logs` directory beside the executable
    pub fn beside_program() -> Result<Self, LogError> {
        let dir = program_dir().map_err(LogError::ProgramDir)?;
        Ok(Self::new(dir.join(LOG_DIR_NAME)))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of today's log file
    pub fn current_file(&self) -> PathBuf {
        self.dir
            .join(format!("{}.log", Local::now().format(FILE_DATE_FORMAT)))
    }

    /// Append a `SUCCESS` line
    pub fn success(&self, message: impl Into<String>) -> Result<PathBuf, LogError> {
        self.log(LogLevel::Success, message)
    }

    /// Append an `ERROR` line
    pub fn error(&self, message: impl Into<String>) -> Result<PathBuf, LogError> {
        self.log(LogLevel::Error, message)
    }

    /// Append a line stamped with the current local time
    ///
    /// Returns the file the line was written to.
    pub fn log(&self, level: LogLevel, message: impl Into<String>) -> Result<PathBuf, LogError> {
        self.append(&LogEntry::now(level, message))
    }

    /// Append `entry` to the file of its date
    ///
    /// The log directory is (re)created on every call.
    pub fn append(&self, entry: &LogEntry) -> Result<PathBuf, LogError> {
        fs::create_dir_all(&self.dir).map_err(|e| LogError::CreateDir {
            path: self.dir.clone(),
            source: e,
        })?;

        let path = self.dir.join(entry.file_name());
        let append_err = |e| LogError::Append {
            path: path.clone(),
            source: e,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(append_err)?;
        file.write_all(entry.render().as_bytes())
            .map_err(append_err)?;

        tracing::trace!(path = %path.display(), level = %entry.level, "audit entry appended");
        Ok(path)
    }
}

fn escape_line_breaks(message: &str) -> String {
    message.replace('\r', "\\r").replace('\n', "\\n")
}
