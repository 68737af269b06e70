//! Recursive directory copy
//!
//! Walks the source depth-first in file-name order. Directories are created or
//! reused, regular files replace their destination, symbolic links are
//! recreated as links. The first failure aborts the walk; entries already
//! copied stay in place.

use super::copy::copy_file_atomic;
use crate::types::{CopyError, CopyStats};
use std::fs::{self, DirEntry};
use std::io::{Error, ErrorKind};
use std::path::Path;

/// Copy the contents of `source` into `target`
///
/// Has no audit-log side effects, see [`super::copy_folder`] for the logged
/// operation.
///
/// # Errors
/// * [`CopyError::SourceMissing`] / [`CopyError::SourceNotDirectory`]
/// * [`CopyError::SelfCopy`] when `target` is `source` or inside it
/// * [`CopyError::TypeConflict`] when a destination entry has another kind
/// * IO errors of any entry, classified per path
///
/// # Example
/// ```no_run
/// use foldercopy::executor::copy_tree;
/// use std::path::Path;
///
/// let stats = copy_tree(Path::new("/data/in"), Path::new("/data/out"))?;
/// println!("{}", stats);
/// # Ok::<(), foldercopy::types::CopyError>(())
/// ```
pub fn copy_tree(source: &Path, target: &Path) -> Result<CopyStats, CopyError> {
    let metadata = fs::metadata(source).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            CopyError::SourceMissing {
                path: source.to_path_buf(),
            }
        } else {
            CopyError::from_io(source, e)
        }
    })?;
    if !metadata.is_dir() {
        return Err(CopyError::SourceNotDirectory {
            path: source.to_path_buf(),
        });
    }

    ensure_target_dir(target)?;
    guard_self_copy(source, target)?;

    let mut stats = CopyStats::default();
    copy_dir_contents(source, target, &mut stats)?;

    tracing::debug!(
        source_dir = %source.display(),
        target_dir = %target.display(),
        %stats,
        "tree copied"
    );
    Ok(stats)
}

/// Make sure `target` is a directory, creating missing parents
///
/// An existing non-directory at `target` is a [`CopyError::TypeConflict`].
pub fn ensure_target_dir(target: &Path) -> Result<(), CopyError> {
    match fs::metadata(target) {
        Ok(m) if m.is_dir() => Ok(()),
        Ok(_) => Err(CopyError::TypeConflict {
            path: target.to_path_buf(),
            existing: "file",
            incoming: "directory",
        }),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            if fs::symlink_metadata(target).is_ok() {
                // Dangling symlink in the way.
                return Err(CopyError::TypeConflict {
                    path: target.to_path_buf(),
                    existing: "symlink",
                    incoming: "directory",
                });
            }
            fs::create_dir_all(target).map_err(|e| CopyError::from_io(target, e))
        }
        Err(e) => Err(CopyError::from_io(target, e)),
    }
}

/// Make sure a directory inside the walk can receive entries
///
/// Unlike [`ensure_target_dir`], a symlink at `dest` is never followed.
fn ensure_entry_dir(dest: &Path) -> Result<(), CopyError> {
    match fs::symlink_metadata(dest) {
        Ok(m) if m.file_type().is_symlink() => Err(CopyError::TypeConflict {
            path: dest.to_path_buf(),
            existing: "symlink",
            incoming: "directory",
        }),
        Ok(m) if m.is_dir() => Ok(()),
        Ok(_) => Err(CopyError::TypeConflict {
            path: dest.to_path_buf(),
            existing: "file",
            incoming: "directory",
        }),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            fs::create_dir(dest).map_err(|e| CopyError::from_io(dest, e))
        }
        Err(e) => Err(CopyError::from_io(dest, e)),
    }
}

fn guard_self_copy(source: &Path, target: &Path) -> Result<(), CopyError> {
    let source_real = fs::canonicalize(source).map_err(|e| CopyError::from_io(source, e))?;
    let target_real = fs::canonicalize(target).map_err(|e| CopyError::from_io(target, e))?;

    if target_real.starts_with(&source_real) {
        return Err(CopyError::SelfCopy {
            source_path: source.to_path_buf(),
            target_path: target.to_path_buf(),
        });
    }
    Ok(())
}

fn copy_dir_contents(src_dir: &Path, dest_dir: &Path, stats: &mut CopyStats) -> Result<(), CopyError> {
    let mut entries = fs::read_dir(src_dir)
        .and_then(|iter| iter.collect::<Result<Vec<DirEntry>, Error>>())
        .map_err(|e| CopyError::from_io(src_dir, e))?;
    entries.sort_by_key(DirEntry::file_name);

    for entry in entries {
        let from = entry.path();
        let to = dest_dir.join(entry.file_name());

        // DirEntry::file_type does not follow symlinks
        let file_type = entry.file_type().map_err(|e| CopyError::from_io(&from, e))?;

        if file_type.is_symlink() {
            copy_symlink(&from, &to)?;
            stats.symlinks_copied += 1;
        } else if file_type.is_dir() {
            ensure_entry_dir(&to)?;
            stats.dirs_created += 1;
            copy_dir_contents(&from, &to, stats)?;
        } else if file_type.is_file() {
            let bytes = copy_file_atomic(&from, &to)?;
            stats.files_copied += 1;
            stats.bytes_copied += bytes;
        } else {
            tracing::warn!(path = %from.display(), "skipping special file");
            stats.skipped += 1;
        }
    }

    Ok(())
}

fn copy_symlink(from: &Path, to: &Path) -> Result<(), CopyError> {
    let link_target = fs::read_link(from).map_err(|e| CopyError::from_io(from, e))?;

    match fs::symlink_metadata(to) {
        Ok(existing) if existing.is_dir() => {
            return Err(CopyError::TypeConflict {
                path: to.to_path_buf(),
                existing: "directory",
                incoming: "symlink",
            });
        }
        Ok(_) => remove_link_or_file(to).map_err(|e| CopyError::from_io(to, e))?,
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(CopyError::from_io(to, e)),
    }

    create_symlink(&link_target, to).map_err(|e| CopyError::from_io(to, e))?;
    tracing::trace!(link = %to.display(), points_to = %link_target.display(), "symlink recreated");
    Ok(())
}

#[cfg(unix)]
fn remove_link_or_file(path: &Path) -> Result<(), Error> {
    fs::remove_file(path)
}

#[cfg(windows)]
fn remove_link_or_file(path: &Path) -> Result<(), Error> {
    // Directory symlinks need remove_dir on Windows.
    fs::remove_file(path).or_else(|_| fs::remove_dir(path))
}

#[cfg(unix)]
fn create_symlink(target: &Path, link_path: &Path) -> Result<(), Error> {
    std::os::unix::fs::symlink(target, link_path)
}

#[cfg(windows)]
fn create_symlink(target: &Path, link_path: &Path) -> Result<(), Error> {
    use std::os::windows::fs::{symlink_dir, symlink_file};
    match symlink_file(target, link_path) {
        Ok(()) => Ok(()),
        Err(file_err) => match symlink_dir(target, link_path) {
            Ok(()) => Ok(()),
            Err(_) => Err(file_err),
        },
    }
}
