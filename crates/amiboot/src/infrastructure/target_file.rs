//! Reading and writing the target file (service unit or launcher script).
//!
//! The file is read once into a [`TextLines`] and written back once, whole.
//! There is no locking: an edit made by another process between the read and
//! the write is silently overwritten.
//!
//! # Write modes
//!
//! | Mode     | Behaviour                                                    |
//! |----------|--------------------------------------------------------------|
//! | `direct` | Truncate the file and write the new content in place.  A     |
//! |          | failure part-way through can leave the file truncated.       |
//! | `atomic` | Write a temporary file next to the target, copy the target's |
//! |          | permissions onto it, then rename it over the target.  A      |
//! |          | symlinked target is resolved first, so the link survives.    |

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use amiboot_core::TextLines;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

/// Error type for target file access.
#[derive(Debug, Error)]
pub enum TargetFileError {
    /// The file does not exist (or vanished before it could be written).
    #[error("file '{}' does not exist", path.display())]
    Missing { path: PathBuf },

    /// The file exists but could not be read as UTF-8 text.
    #[error("file '{}' cannot be read: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The new content could not be written.
    #[error("file '{}' cannot be written: {source}", path.display())]
    Unwritable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl TargetFileError {
    /// The path the error refers to.
    pub fn path(&self) -> &Path {
        match self {
            TargetFileError::Missing { path }
            | TargetFileError::Unreadable { path, .. }
            | TargetFileError::Unwritable { path, .. } => path,
        }
    }
}

/// How [`write_target`] replaces the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    /// Overwrite in place.
    #[default]
    Direct,
    /// Write a temporary sibling and rename it over the target.
    Atomic,
}

/// Reads the whole target file.
///
/// # Errors
///
/// Returns [`TargetFileError::Missing`] if the file does not exist and
/// [`TargetFileError::Unreadable`] for any other failure, including content
/// that is not valid UTF-8.
pub fn read_target(path: &Path) -> Result<TextLines, TargetFileError> {
    match fs::read_to_string(path) {
        Ok(content) => {
            let lines = TextLines::parse(&content);
            debug!(path = %path.display(), lines = lines.len(), "read target file");
            Ok(lines)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(TargetFileError::Missing {
            path: path.to_path_buf(),
        }),
        Err(source) => Err(TargetFileError::Unreadable {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Replaces the content of the target file with `lines`.
///
/// # Errors
///
/// Returns [`TargetFileError::Missing`] if the file no longer exists, and
/// [`TargetFileError::Unwritable`] for any other failure.
pub fn write_target(
    path: &Path,
    lines: &TextLines,
    mode: WriteMode,
) -> Result<(), TargetFileError> {
    let content = lines.to_text();
    let unwritable = |source| TargetFileError::Unwritable {
        path: path.to_path_buf(),
        source,
    };

    match path.try_exists() {
        Ok(true) => {}
        Ok(false) => {
            return Err(TargetFileError::Missing {
                path: path.to_path_buf(),
            })
        }
        Err(source) => return Err(unwritable(source)),
    }

    match mode {
        WriteMode::Direct => write_in_place(path, &content).map_err(unwritable)?,
        WriteMode::Atomic => write_via_rename(path, &content).map_err(unwritable)?,
    }

    debug!(path = %path.display(), ?mode, bytes = content.len(), "wrote target file");
    Ok(())
}

fn write_in_place(path: &Path, content: &str) -> io::Result<()> {
    // No `create`: a file deleted since the existence check stays deleted.
    let mut file = OpenOptions::new().write(true).truncate(true).open(path)?;
    file.write_all(content.as_bytes())?;
    file.flush()
}

fn write_via_rename(path: &Path, content: &str) -> io::Result<()> {
    // Rename over the link's destination, not the link itself.
    let path = fs::canonicalize(path)?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let permissions = fs::metadata(&path)?.permissions();

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.as_file().set_permissions(permissions)?;
    tmp.persist(&path).map_err(|e| e.error)?;
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const UNIT: &str = "[Service]\r\nExecStart=/opt/app/amiberry\nRestart=always";

    #[test]
    fn test_read_target_returns_lines() {
        // Arrange
        let dir = tempdir().unwrap();
        let path = dir.path().join("amiberry.service");
        fs::write(&path, UNIT).unwrap();

        // Act
        let lines = read_target(&path).expect("read");

        // Assert
        assert_eq!(lines.len(), 3);
        assert_eq!(lines.to_text(), UNIT);
    }

    #[test]
    fn test_read_missing_file_is_missing() {
        let dir = tempdir().unwrap();
        let result = read_target(&dir.path().join("absent.service"));
        assert!(matches!(result, Err(TargetFileError::Missing { .. })));
    }

    #[test]
    fn test_read_directory_is_unreadable() {
        let dir = tempdir().unwrap();
        let result = read_target(dir.path());
        assert!(matches!(result, Err(TargetFileError::Unreadable { .. })));
    }

    #[test]
    fn test_read_non_utf8_is_unreadable() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("binary.sh");
        fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();
        assert!(matches!(read_target(&path), Err(TargetFileError::Unreadable { .. })));
    }

    #[test]
    fn test_direct_write_replaces_content() {
        // Arrange
        let dir = tempdir().unwrap();
        let path = dir.path().join("amiberry.service");
        fs::write(&path, "a much longer original content than the replacement\n").unwrap();

        // Act
        write_target(&path, &TextLines::parse(UNIT), WriteMode::Direct).expect("write");

        // Assert
        assert_eq!(fs::read_to_string(&path).unwrap(), UNIT);
    }

    #[test]
    fn test_atomic_write_replaces_content_and_leaves_no_temp_file() {
        // Arrange
        let dir = tempdir().unwrap();
        let path = dir.path().join("amiberry.sh");
        fs::write(&path, "old\n").unwrap();

        // Act
        write_target(&path, &TextLines::parse(UNIT), WriteMode::Atomic).expect("write");

        // Assert
        assert_eq!(fs::read_to_string(&path).unwrap(), UNIT);
        let entries = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1, "temporary file must be renamed away");
    }

    #[cfg(unix)]
    #[test]
    fn test_atomic_write_keeps_permissions() {
        use std::os::unix::fs::PermissionsExt;

        // Arrange
        let dir = tempdir().unwrap();
        let path = dir.path().join("amiberry.sh");
        fs::write(&path, "old\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();

        // Act
        write_target(&path, &TextLines::parse("new\n"), WriteMode::Atomic).expect("write");

        // Assert
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o755);
    }

    #[cfg(unix)]
    #[test]
    fn test_atomic_write_through_symlink_keeps_the_link() {
        // Arrange
        let dir = tempdir().unwrap();
        let real = dir.path().join("amiberry.service.real");
        let link = dir.path().join("amiberry.service");
        fs::write(&real, "old\n").unwrap();
        std::os::unix::fs::symlink(&real, &link).unwrap();

        // Act
        write_target(&link, &TextLines::parse(UNIT), WriteMode::Atomic).expect("write");

        // Assert
        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_to_string(&real).unwrap(), UNIT);
    }

    #[test]
    fn test_write_to_vanished_file_is_missing_and_not_recreated() {
        // Arrange
        let dir = tempdir().unwrap();
        let path = dir.path().join("gone.service");

        for mode in [WriteMode::Direct, WriteMode::Atomic] {
            // Act
            let result = write_target(&path, &TextLines::parse(UNIT), mode);

            // Assert
            assert!(matches!(result, Err(TargetFileError::Missing { .. })), "{mode:?}");
            assert!(!path.exists());
        }
    }

    #[test]
    fn test_write_over_directory_is_unwritable() {
        let dir = tempdir().unwrap();
        for mode in [WriteMode::Direct, WriteMode::Atomic] {
            let result = write_target(dir.path(), &TextLines::parse(UNIT), mode);
            assert!(matches!(result, Err(TargetFileError::Unwritable { .. })), "{mode:?}");
        }
    }

    #[test]
    fn test_error_reports_its_path() {
        let err = TargetFileError::Missing {
            path: PathBuf::from("/etc/x.service"),
        };
        assert_eq!(err.path(), Path::new("/etc/x.service"));
        assert_eq!(err.to_string(), "file '/etc/x.service' does not exist");
    }
}
