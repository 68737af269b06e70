//! Executor module for folder copies

pub mod copy;
pub mod tree;

use crate::audit::AuditLog;
use crate::types::{CopyError, CopyOutcome, CopyStage, LogError};
use std::path::Path;

pub use copy::copy_file_atomic;
pub use tree::{copy_tree, ensure_target_dir};

/// Copy `source` into `target` and record the result in the audit log
///
/// Stages run in order: ensuring the target, checking the source, copying.
/// Copy failures never escape: they are logged as `ERROR` and returned as
/// [`CopyOutcome::Failed`]. Only a failure to write the audit log itself is
/// returned as an error.
pub fn copy_folder(
    source: &Path,
    target: &Path,
    audit: &AuditLog,
) -> Result<CopyOutcome, LogError> {
    tracing::debug!(target_dir = %target.display(), "ensuring target");
    if let Err(error) = ensure_target_dir(target) {
        return record_failure(audit, CopyStage::EnsuringTarget, error);
    }

    tracing::debug!(source_dir = %source.display(), "checking source");
    if !source.exists() {
        let error = CopyError::SourceMissing {
            path: source.to_path_buf(),
        };
        audit.error(error.to_string())?;
        return Ok(CopyOutcome::Failed {
            stage: CopyStage::CheckingSource,
            error,
        });
    }

    match copy_tree(source, target) {
        Ok(stats) => {
            audit.success(format!(
                "copied {} to {} ({})",
                source.display(),
                target.display(),
                stats
            ))?;
            Ok(CopyOutcome::Succeeded { stats })
        }
        Err(error) => record_failure(audit, CopyStage::Copying, error),
    }
}

fn record_failure(
    audit: &AuditLog,
    stage: CopyStage,
    error: CopyError,
) -> Result<CopyOutcome, LogError> {
    tracing::debug!(stage = stage.name(), %error, "copy failed");
    audit.error(format!("error during copy: {}", error))?;
    Ok(CopyOutcome::Failed { stage, error })
}
