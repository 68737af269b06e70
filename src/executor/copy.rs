//! Replace-by-rename file copy

use crate::types::CopyError;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;
use tempfile::Builder;

/// Copy buffer size
const BUFFER_SIZE: usize = 128 * 1024;

/// Copy a file over `dest`, replacing whatever file is there
///
/// 1. Stream into a hidden temporary file beside `dest`
/// 2. Flush and sync to disk
/// 3. Preserve metadata (mtime, then permissions)
/// 4. Rename over the final destination
///
/// A failure before step 4 leaves an existing `dest` untouched and removes the
/// temporary file.
///
/// # Arguments
/// * `src` - Source file path
/// * `dest` - Destination file path
///
/// # Returns
/// * `Ok(u64)` - Number of bytes copied
/// * `Err(CopyError)` - IO error, or `dest` is an existing directory
///
/// # Example
/// ```no_run
/// use foldercopy::executor::copy_file_atomic;
/// use std::path::Path;
///
/// let bytes = copy_file_atomic(Path::new("source.txt"), Path::new("dest.txt"))?;
/// # Ok::<(), foldercopy::types::CopyError>(())
/// ```
pub fn copy_file_atomic(src: &Path, dest: &Path) -> Result<u64, CopyError> {
    // Prepare
    if fs::symlink_metadata(dest).is_ok_and(|m| m.is_dir()) {
        return Err(CopyError::TypeConflict {
            path: dest.to_path_buf(),
            existing: "directory",
            incoming: "file",
        });
    }

    let parent = match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e| CopyError::from_io(parent, e))?;

    // Copy
    let mut src_file = File::open(src).map_err(|e| CopyError::from_io(src, e))?;
    let src_metadata = src_file
        .metadata()
        .map_err(|e| CopyError::from_io(src, e))?;

    let mut part = Builder::new()
        .prefix(".foldercopy-")
        .suffix(".part")
        .tempfile_in(parent)
        .map_err(|e| CopyError::from_io(parent, e))?;

    let mut buffer = vec![0u8; BUFFER_SIZE];
    let mut total_bytes = 0u64;

    loop {
        let bytes_read = src_file
            .read(&mut buffer)
            .map_err(|e| CopyError::from_io(src, e))?;

        if bytes_read == 0 {
            break;
        }

        part.write_all(&buffer[..bytes_read])
            .map_err(|e| CopyError::from_io(dest, e))?;
        total_bytes += bytes_read as u64;
    }

    // Flush
    part.as_file()
        .sync_all()
        .map_err(|e| CopyError::from_io(dest, e))?;

    // Metadata: mtime goes through the open handle before the file can
    // become read-only.
    let mtime = src_metadata
        .modified()
        .map_err(|e| CopyError::from_io(src, e))?;
    filetime::set_file_handle_times(
        part.as_file(),
        None,
        Some(filetime::FileTime::from_system_time(mtime)),
    )
    .map_err(|e| CopyError::from_io(dest, e))?;

    fs::set_permissions(part.path(), src_metadata.permissions())
        .map_err(|e| CopyError::from_io(dest, e))?;

    // Commit
    part.persist(dest)
        .map_err(|e| CopyError::from_io(dest, e.error))?;

    tracing::trace!(src = %src.display(), dest = %dest.display(), bytes = total_bytes, "file copied");
    Ok(total_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    #[test]
    fn test_copy_basic_content() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path();

        let src_path = root.join("source.txt");
        let content = b"Hello! This is a test file.";
        fs::write(&src_path, content).unwrap();

        let dest_path = root.join("dest.txt");
        let bytes_copied =
            copy_file_atomic(&src_path, &dest_path).expect("copy_file_atomic should succeed");

        assert_eq!(bytes_copied, content.len() as u64);
        assert_eq!(fs::read(&dest_path).unwrap(), content);
    }

    #[test]
    fn test_copy_replaces_existing_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path();

        let src_path = root.join("source.txt");
        let dest_path = root.join("dest.txt");
        fs::write(&src_path, b"new").unwrap();
        fs::write(&dest_path, b"a much longer old content").unwrap();

        copy_file_atomic(&src_path, &dest_path).expect("overwrite should succeed");

        assert_eq!(fs::read(&dest_path).unwrap(), b"new");
    }

    #[test]
    fn test_copy_creates_directories() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path();

        let src_path = root.join("source.txt");
        fs::write(&src_path, b"test content").unwrap();

        let dest_path = root.join("a/b/c/dest.txt");
        copy_file_atomic(&src_path, &dest_path)
            .expect("copy_file_atomic should create parent directories");

        assert_eq!(fs::read(&dest_path).unwrap(), b"test content");
    }

    #[test]
    fn test_copy_leaves_no_part_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path();

        let src_path = root.join("source.txt");
        fs::write(&src_path, b"test content").unwrap();
        let out = root.join("out");
        fs::create_dir(&out).unwrap();

        copy_file_atomic(&src_path, &out.join("dest.txt")).unwrap();

        let names: Vec<_> = fs::read_dir(&out)
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("dest.txt")]);
    }

    #[test]
    fn test_copy_preserves_mtime() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path();

        let src_path = root.join("source.txt");
        fs::write(&src_path, b"test content").unwrap();
        let mtime = SystemTime::now() - Duration::from_secs(3600);
        filetime::set_file_mtime(&src_path, filetime::FileTime::from_system_time(mtime)).unwrap();

        let dest_path = root.join("dest.txt");
        copy_file_atomic(&src_path, &dest_path).unwrap();

        let src_mtime = fs::metadata(&src_path).unwrap().modified().unwrap();
        let dest_mtime = fs::metadata(&dest_path).unwrap().modified().unwrap();
        let diff = match src_mtime.duration_since(dest_mtime) {
            Ok(d) => d,
            Err(e) => e.duration(),
        };
        assert!(diff < Duration::from_secs(2), "mtime should be preserved (diff: {:?})", diff);
    }

    #[test]
    fn test_copy_read_only_source_keeps_mtime() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path();

        let src_path = root.join("locked.txt");
        fs::write(&src_path, b"read only").unwrap();
        let mtime = SystemTime::now() - Duration::from_secs(7200);
        filetime::set_file_mtime(&src_path, filetime::FileTime::from_system_time(mtime)).unwrap();
        let mut perms = fs::metadata(&src_path).unwrap().permissions();
        perms.set_readonly(true);
        fs::set_permissions(&src_path, perms).unwrap();

        let dest_path = root.join("copy.txt");
        copy_file_atomic(&src_path, &dest_path).expect("read-only source should copy");

        let dest_metadata = fs::metadata(&dest_path).unwrap();
        assert!(dest_metadata.permissions().readonly());
        assert_eq!(fs::read(&dest_path).unwrap(), b"read only");
        let dest_mtime = dest_metadata.modified().unwrap();
        let diff = match mtime.duration_since(dest_mtime) {
            Ok(d) => d,
            Err(e) => e.duration(),
        };
        assert!(diff < Duration::from_secs(2), "mtime should be preserved (diff: {:?})", diff);

        // Let TempDir clean up on every platform.
        for path in [&src_path, &dest_path] {
            let mut perms = fs::metadata(path).unwrap().permissions();
            #[allow(clippy::permissions_set_readonly_false)]
            perms.set_readonly(false);
            fs::set_permissions(path, perms).unwrap();
        }
    }

    #[test]
    fn test_copy_onto_directory_is_conflict() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path();

        let src_path = root.join("source.txt");
        fs::write(&src_path, b"x").unwrap();
        let dest_path = root.join("taken");
        fs::create_dir(&dest_path).unwrap();

        let err = copy_file_atomic(&src_path, &dest_path).unwrap_err();
        assert!(matches!(err, CopyError::TypeConflict { .. }));
        assert!(dest_path.is_dir());
    }

    #[test]
    fn test_copy_missing_source_keeps_destination() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path();

        let dest_path = root.join("dest.txt");
        fs::write(&dest_path, b"keep me").unwrap();

        let err = copy_file_atomic(&root.join("missing.txt"), &dest_path).unwrap_err();
        assert_eq!(err.path(), root.join("missing.txt"));
        assert_eq!(fs::read(&dest_path).unwrap(), b"keep me");
    }
}
