//! Copy outcome and statistics

use super::CopyError;
use std::fmt;

/// Counters collected while copying a tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyStats {
    /// Regular files written to the target
    pub files_copied: usize,
    /// Directories created or reused in the target (root excluded)
    pub dirs_created: usize,
    /// Symbolic links recreated in the target
    pub symlinks_copied: usize,
    /// Special files (sockets, FIFOs, devices) left out
    pub skipped: usize,
    /// Total bytes written for regular files
    pub bytes_copied: u64,
}

impl fmt::Display for CopyStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} files, {} directories, {} symlinks, {} bytes",
            self.files_copied, self.dirs_created, self.symlinks_copied, self.bytes_copied
        )?;
        if self.skipped > 0 {
            write!(f, ", {} skipped", self.skipped)?;
        }
        Ok(())
    }
}

/// Stage of `copy_folder` in which a failure happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyStage {
    EnsuringTarget,
    CheckingSource,
    Copying,
}

impl CopyStage {
    pub fn name(&self) -> &'static str {
        match self {
            CopyStage::EnsuringTarget => "ensuring target",
            CopyStage::CheckingSource => "checking source",
            CopyStage::Copying => "copying",
        }
    }
}

/// Terminal state of a folder copy
#[derive(Debug)]
pub enum CopyOutcome {
    /// Every entry was transferred
    Succeeded { stats: CopyStats },
    /// A step failed; already copied files stay in place
    Failed { stage: CopyStage, error: CopyError },
}

impl CopyOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CopyOutcome::Succeeded { .. })
    }

    pub fn stats(&self) -> Option<&CopyStats> {
        match self {
            CopyOutcome::Succeeded { stats } => Some(stats),
            CopyOutcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&CopyError> {
        match self {
            CopyOutcome::Succeeded { .. } => None,
            CopyOutcome::Failed { error, .. } => Some(error),
        }
    }
}
