//! Fault-injecting [`FileOps`] for tests.
//!
//! Allows tests to make renames, replaces or removals fail on an otherwise
//! real directory, to drive the store down its fallback and backup paths.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::{FileOps, OsFileOps};

/// One recorded call on a [`FaultyFileOps`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsCall {
    Rename { from: PathBuf, to: PathBuf },
    Replace { from: PathBuf, to: PathBuf },
    Remove { path: PathBuf },
}

/// Delegates to [`OsFileOps`] unless an operation has been set to fail.
///
/// Clones share the same call log, so a test can keep one handle and give
/// another to the store.
#[derive(Debug, Clone, Default)]
pub struct FaultyFileOps {
    rename_error: Option<io::ErrorKind>,
    replace_error: Option<io::ErrorKind>,
    remove_error: Option<io::ErrorKind>,
    calls: Arc<Mutex<Vec<FsCall>>>,
}

impl FaultyFileOps {
    /// A pass-through instance that fails nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every [`FileOps::rename`] fails with `kind`.
    pub fn failing_rename(mut self, kind: io::ErrorKind) -> Self {
        self.rename_error = Some(kind);
        self
    }

    /// Every [`FileOps::replace`] fails with `kind`.
    pub fn failing_replace(mut self, kind: io::ErrorKind) -> Self {
        self.replace_error = Some(kind);
        self
    }

    /// Every [`FileOps::remove`] fails with `kind`.
    pub fn failing_remove(mut self, kind: io::ErrorKind) -> Self {
        self.remove_error = Some(kind);
        self
    }

    /// Calls made so far, in order.
    pub fn calls(&self) -> Vec<FsCall> {
        self.calls.lock().expect("lock poisoned").clone()
    }

    fn record(&self, call: FsCall) {
        self.calls.lock().expect("lock poisoned").push(call);
    }
}

fn injected(kind: io::ErrorKind, op: &str) -> io::Error {
    io::Error::new(kind, format!("injected {op} failure"))
}

impl FileOps for FaultyFileOps {
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        self.record(FsCall::Rename {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
        });
        match self.rename_error {
            Some(kind) => Err(injected(kind, "rename")),
            None => OsFileOps.rename(from, to),
        }
    }

    fn replace(&self, from: &Path, to: &Path) -> io::Result<()> {
        self.record(FsCall::Replace {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
        });
        match self.replace_error {
            Some(kind) => Err(injected(kind, "replace")),
            None => OsFileOps.replace(from, to),
        }
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        self.record(FsCall::Remove {
            path: path.to_path_buf(),
        });
        match self.remove_error {
            Some(kind) => Err(injected(kind, "remove")),
            None => OsFileOps.remove(path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_faulty_ops_pass_through_by_default() {
        // Arrange
        let dir = TempDir::new().unwrap();
        let from = dir.path().join("x");
        let to = dir.path().join("y");
        std::fs::write(&from, b"1").unwrap();
        let ops = FaultyFileOps::new();

        // Act
        ops.rename(&from, &to).unwrap();

        // Assert
        assert!(to.exists());
        assert_eq!(ops.calls(), vec![FsCall::Rename { from, to }]);
    }

    #[test]
    fn test_injected_failure_leaves_files_untouched() {
        let dir = TempDir::new().unwrap();
        let from = dir.path().join("x");
        std::fs::write(&from, b"1").unwrap();
        let ops = FaultyFileOps::new().failing_rename(io::ErrorKind::PermissionDenied);

        let err = ops.rename(&from, &dir.path().join("y")).unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
        assert!(from.exists());
    }

    #[test]
    fn test_clones_share_the_call_log() {
        let dir = TempDir::new().unwrap();
        let ops = FaultyFileOps::new().failing_remove(io::ErrorKind::Other);
        let handle = ops.clone();

        let _ = ops.remove(&dir.path().join("gone"));

        assert_eq!(handle.calls().len(), 1);
    }
}
