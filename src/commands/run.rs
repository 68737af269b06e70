//! Main copy command

use crate::audit::AuditLog;
use crate::executor::copy_folder;
use crate::types::{CopyOutcome, LogError};
use crate::Config;
use std::path::Path;

/// Run one folder copy and print its summary
///
/// A failed copy is a normal outcome and is returned as such; only an audit
/// log failure is an error.
pub fn run(config: &Config, audit: &AuditLog) -> Result<CopyOutcome, LogError> {
    let outcome = copy_folder(&config.source_folder, &config.target_folder, audit)?;
    println!("{}", format_summary(config, &outcome, &audit.current_file()));
    Ok(outcome)
}

fn format_summary(config: &Config, outcome: &CopyOutcome, log_file: &Path) -> String {
    if outcome.is_success() {
        format!(
            "Folder copied successfully!\n  Source folder: {}\n  Target folder: {}",
            config.source_folder.display(),
            config.target_folder.display()
        )
    } else {
        format!(
            "Folder copy failed, see the log for details: {}",
            log_file.display()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CopyError, CopyStage, CopyStats};
    use std::path::PathBuf;

    fn config() -> Config {
        Config {
            source_folder: PathBuf::from("/data/in"),
            target_folder: PathBuf::from("/data/out"),
        }
    }

    #[test]
    fn test_success_summary_names_both_paths() {
        let outcome = CopyOutcome::Succeeded {
            stats: CopyStats::default(),
        };
        let summary = format_summary(&config(), &outcome, Path::new("logs/x.log"));

        let lines: Vec<&str> = summary.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("/data/in"));
        assert!(lines[2].contains("/data/out"));
        assert!(!summary.contains("x.log"));
    }

    #[test]
    fn test_failure_summary_points_to_log() {
        let outcome = CopyOutcome::Failed {
            stage: CopyStage::CheckingSource,
            error: CopyError::SourceMissing {
                path: PathBuf::from("/data/in"),
            },
        };
        let summary = format_summary(&config(), &outcome, Path::new("logs/2024-01-01.log"));

        assert_eq!(summary.lines().count(), 1);
        assert!(summary.contains("failed"));
        assert!(summary.contains("logs/2024-01-01.log"));
    }
}
