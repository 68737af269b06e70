//! Configuration management
//!
//! The configuration is read from `config.json` next to the executable. A
//! missing or unusable file falls back to folders on the desktop of the
//! public (or current user's) profile.

use crate::types::ConfigError;
use serde::Deserialize;
use std::ffi::OsString;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up beside the executable
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Environment variables probed for the base directory, in order
pub const BASE_DIR_VARS: [&str; 3] = ["PUBLIC", "USERPROFILE", "HOME"];

/// Source and target folders for one run
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Folder whose contents are copied
    pub source_folder: PathBuf,

    /// Folder receiving the copy
    pub target_folder: PathBuf,
}

/// Where the resolved configuration came from
#[derive(Debug)]
pub enum ConfigOrigin {
    /// Parsed from the given file
    File(PathBuf),
    /// No config file was present
    Defaults,
    /// A config file was present but unusable
    Fallback(ConfigError),
}

/// Resolved configuration together with its origin
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: Config,
    pub origin: ConfigOrigin,
}

impl Config {
    /// Validate configuration
    ///
    /// Only emptiness is checked; whether the source exists is decided by the
    /// copy itself.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source_folder.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(
                "source_folder must not be empty".to_string(),
            ));
        }
        if self.target_folder.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(
                "target_folder must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Load the configuration for this process
    ///
    /// Reads `config.json` beside the executable and the process environment.
    /// Only a missing base directory is returned as an error.
    pub fn load() -> Result<Config, ConfigError> {
        let path = match Self::default_path() {
            Ok(path) => Some(path),
            Err(e) => {
                eprintln!(
                    "Warning: {}. Falling back to default folders.",
                    ConfigError::ProgramDir(e)
                );
                None
            }
        };

        match path {
            Some(path) => Ok(Self::load_from(&path, process_env)?.config),
            None => Self::defaults(process_env),
        }
    }

    /// Load the configuration from `path`, computing defaults from `lookup`
    ///
    /// Read and parse failures are reported on stderr and replaced by the
    /// defaults; the returned origin tells which path was taken.
    pub fn load_from<F>(path: &Path, lookup: F) -> Result<LoadedConfig, ConfigError>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        match Self::read_file(path) {
            Ok(Some(config)) => {
                tracing::debug!(path = %path.display(), "loaded configuration file");
                Ok(LoadedConfig {
                    config,
                    origin: ConfigOrigin::File(path.to_path_buf()),
                })
            }
            Ok(None) => Ok(LoadedConfig {
                config: Self::defaults(lookup)?,
                origin: ConfigOrigin::Defaults,
            }),
            Err(e) => {
                eprintln!("Warning: {}. Falling back to default folders.", e);
                Ok(LoadedConfig {
                    config: Self::defaults(lookup)?,
                    origin: ConfigOrigin::Fallback(e),
                })
            }
        }
    }

    /// Compute the default folders from the environment given by `lookup`
    ///
    /// The base directory is the first non-empty value of [`BASE_DIR_VARS`].
    pub fn defaults<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let base = BASE_DIR_VARS
            .iter()
            .filter_map(|name| lookup(name))
            .find(|value| !value.is_empty())
            .map(PathBuf::from)
            .ok_or(ConfigError::NoBaseDirectory)?;

        let desktop = base.join("Desktop");
        Ok(Config {
            source_folder: desktop.join("source_folder"),
            target_folder: desktop.join("target_folder"),
        })
    }

    /// Path of `config.json` beside the executable
    pub fn default_path() -> io::Result<PathBuf> {
        Ok(program_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Read and validate a config file; `Ok(None)` when it does not exist
    fn read_file(path: &Path) -> Result<Option<Config>, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
        };

        let config: Config = serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
        config.validate()?;
        Ok(Some(config))
    }
}

/// Directory holding the running executable
pub fn program_dir() -> io::Result<PathBuf> {
    let exe = std::env::current_exe()?;
    exe.parent().map(Path::to_path_buf).ok_or_else(|| {
        io::Error::new(
            ErrorKind::NotFound,
            format!("executable has no parent directory: {}", exe.display()),
        )
    })
}

fn process_env(name: &str) -> Option<OsString> {
    std::env::var_os(name)
}
