//! File-system operations that move or remove whole files.
//!
//! Promotion of a staged file and reclaiming of abandoned files go through the
//! [`FileOps`] trait instead of calling `std::fs` directly.  Reading and
//! writing file *contents* does not; those use ordinary scoped file handles.
//!
//! # Testability
//!
//! The seam exists so tests can make a rename fail on a real directory.
//! [`mock::FaultyFileOps`] delegates to [`OsFileOps`] but can be told to fail
//! selected operations; unit tests also use the `mockall`-generated
//! `MockFileOps` for expectation-style checks.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::domain::location::append_to_file_name;

pub mod mock;

/// Suffix of the scratch sibling that [`OsFileOps::replace`] fills before
/// moving it into place.
pub const PARTIAL_SUFFIX: &str = ".partial";

/// Whole-file move and delete operations.
#[cfg_attr(test, mockall::automock)]
pub trait FileOps {
    /// Replaces `to` with `from` in a single filesystem operation.
    ///
    /// After success `from` no longer exists and `to` holds its content with
    /// no intermediate state observable at `to`.
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Gives `to` the content of `from`, then removes `from`.
    ///
    /// Only used after [`FileOps::rename`] has been rejected.  Implementations
    /// must never write into an existing `to`: when this returns an error,
    /// `to` is either untouched or already holds the complete content.
    fn replace(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Deletes the file at `path`.
    fn remove(&self, path: &Path) -> io::Result<()>;
}

/// [`FileOps`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileOps;

impl FileOps for OsFileOps {
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        std::fs::rename(from, to)
    }

    /// Copies `from` into a fresh `<to>.partial`, syncs it, and renames that
    /// over `to`.  A failed copy removes the partial file.
    fn replace(&self, from: &Path, to: &Path) -> io::Result<()> {
        let source = File::open(from)?;
        install_from(source, to)?;
        std::fs::remove_file(from)
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }
}

/// Moves everything `reader` yields to `to` through a synced scratch sibling.
/// On error the sibling is removed and `to` is left as it was.
fn install_from<R: Read>(reader: R, to: &Path) -> io::Result<()> {
    let partial = append_to_file_name(to, PARTIAL_SUFFIX);
    let result = fill_and_swap(reader, &partial, to);
    if result.is_err() && entry_exists(&partial) {
        let _ = std::fs::remove_file(&partial);
    }
    result
}

fn fill_and_swap<R: Read>(mut reader: R, partial: &Path, to: &Path) -> io::Result<()> {
    {
        let mut file = File::create(partial)?;
        io::copy(&mut reader, &mut file)?;
        file.sync_all()?;
    }
    std::fs::rename(partial, to)
}

/// `true` when something (file, directory or dangling symlink) is at `path`.
pub(crate) fn entry_exists(path: &Path) -> bool {
    std::fs::symlink_metadata(path).is_ok()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Yields a few bytes, then fails like a device running out of space.
    struct FailingReader {
        served: bool,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.served {
                return Err(io::Error::new(io::ErrorKind::Other, "no space left"));
            }
            self.served = true;
            let n = buf.len().min(4);
            buf[..n].copy_from_slice(&b"half"[..n]);
            Ok(n)
        }
    }

    fn names(dir: &TempDir) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_os_rename_overwrites_existing_destination() {
        // Arrange
        let dir = TempDir::new().unwrap();
        let from = dir.path().join("a.temp");
        let to = dir.path().join("a");
        std::fs::write(&from, b"new").unwrap();
        std::fs::write(&to, b"old").unwrap();

        // Act
        OsFileOps.rename(&from, &to).unwrap();

        // Assert
        assert_eq!(std::fs::read(&to).unwrap(), b"new");
        assert!(!entry_exists(&from));
    }

    #[test]
    fn test_os_replace_copies_then_removes_source() {
        let dir = TempDir::new().unwrap();
        let from = dir.path().join("b.temp");
        let to = dir.path().join("b");
        std::fs::write(&from, b"replacement").unwrap();
        std::fs::write(&to, b"original content that is longer").unwrap();

        OsFileOps.replace(&from, &to).unwrap();

        assert_eq!(std::fs::read(&to).unwrap(), b"replacement");
        assert!(!entry_exists(&from));
    }

    #[test]
    fn test_interrupted_copy_leaves_destination_bytes_unchanged() {
        // Arrange
        let dir = TempDir::new().unwrap();
        let to = dir.path().join("c");
        std::fs::write(&to, b"[\"old\"]").unwrap();

        // Act
        let err = install_from(FailingReader { served: false }, &to).unwrap_err();

        // Assert
        assert_eq!(err.kind(), io::ErrorKind::Other);
        assert_eq!(std::fs::read(&to).unwrap(), b"[\"old\"]");
        assert_eq!(names(&dir), vec!["c"], "no partial file survives");
    }

    #[test]
    fn test_interrupted_copy_to_new_destination_creates_nothing() {
        let dir = TempDir::new().unwrap();
        let to = dir.path().join("c-5-backup");

        assert!(install_from(FailingReader { served: false }, &to).is_err());

        assert!(names(&dir).is_empty());
    }

    #[test]
    fn test_os_replace_with_unreadable_source_keeps_destination_and_source() {
        // Arrange: a directory opens fine but every read of it fails
        let dir = TempDir::new().unwrap();
        let from = dir.path().join("d.temp");
        std::fs::create_dir(&from).unwrap();
        let to = dir.path().join("d");
        std::fs::write(&to, b"good").unwrap();

        // Act
        let result = OsFileOps.replace(&from, &to);

        // Assert
        assert!(result.is_err());
        assert_eq!(std::fs::read(&to).unwrap(), b"good");
        assert!(from.is_dir());
        assert_eq!(names(&dir), vec!["d", "d.temp"]);
    }

    #[test]
    fn test_os_remove_of_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = OsFileOps.remove(&dir.path().join("missing")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
