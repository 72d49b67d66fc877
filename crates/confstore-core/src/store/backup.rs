//! Best-effort preservation of files that are about to be abandoned.
//!
//! When a load finds an unreadable target, or a save cannot finish, the file
//! involved is moved aside under a timestamped name instead of being deleted,
//! so it can be inspected later.  This runs inside other failure paths, so it
//! never returns an error and never panics.
//!
//! # Reclaim chain
//!
//! ```text
//! AttemptAtomic ──fail──►  AttemptOverwrite ──fail──►  AttemptDelete ──fail──►  GaveUp
//!      │ ok                       │ ok                       │ ok
//!      ▼                          ▼                          ▼
//!  Moved{atomic}             Moved{!atomic}               Deleted
//! ```
//!
//! The first step that succeeds ends the chain.  Reaching `GaveUp` is logged
//! as `BackupFailed` and goes no further.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, info, warn};

use crate::domain::{backup_path, BackupEntry, BackupTag, StorageLocation};
use crate::fs::{entry_exists, FileOps};
use crate::store::error::StoreError;

/// One state of the reclaim chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReclaimStep {
    AttemptAtomic,
    AttemptOverwrite,
    AttemptDelete,
    GaveUp,
}

impl ReclaimStep {
    /// The step to try after this one failed.
    pub fn next(self) -> ReclaimStep {
        match self {
            ReclaimStep::AttemptAtomic => ReclaimStep::AttemptOverwrite,
            ReclaimStep::AttemptOverwrite => ReclaimStep::AttemptDelete,
            ReclaimStep::AttemptDelete | ReclaimStep::GaveUp => ReclaimStep::GaveUp,
        }
    }
}

/// What [`backup_and_discard`] ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReclaimOutcome {
    /// The file now lives at `backup`.
    Moved { backup: PathBuf, atomic: bool },
    /// The file could not be moved and was deleted instead.
    Deleted,
    /// Nothing was at the source path.
    Missing,
    /// The file is still at its original path.
    GaveUp,
}

impl ReclaimOutcome {
    /// `true` unless the source is still in place.
    pub fn cleared_source(&self) -> bool {
        !matches!(self, ReclaimOutcome::GaveUp)
    }
}

/// Moves `source` to `<source>-<now_millis>-<tag>`, or deletes it if it cannot
/// be moved.
pub fn backup_and_discard<F: FileOps + ?Sized>(
    fs: &F,
    source: &Path,
    tag: BackupTag,
) -> ReclaimOutcome {
    backup_and_discard_at(fs, source, tag, unix_millis_now())
}

/// [`backup_and_discard`] with an explicit timestamp.
pub fn backup_and_discard_at<F: FileOps + ?Sized>(
    fs: &F,
    source: &Path,
    tag: BackupTag,
    unix_millis: u64,
) -> ReclaimOutcome {
    if !entry_exists(source) {
        return ReclaimOutcome::Missing;
    }

    let backup = backup_path(source, tag, unix_millis);
    info!("trying to make backup: {}", backup.display());

    let mut step = ReclaimStep::AttemptAtomic;
    loop {
        let attempt = match step {
            ReclaimStep::AttemptAtomic => fs.rename(source, &backup).map(|()| {
                ReclaimOutcome::Moved {
                    backup: backup.clone(),
                    atomic: true,
                }
            }),
            ReclaimStep::AttemptOverwrite => fs.replace(source, &backup).map(|()| {
                ReclaimOutcome::Moved {
                    backup: backup.clone(),
                    atomic: false,
                }
            }),
            ReclaimStep::AttemptDelete => fs.remove(source).map(|()| ReclaimOutcome::Deleted),
            ReclaimStep::GaveUp => {
                let err = StoreError::BackupFailed {
                    path: source.to_path_buf(),
                };
                warn!("{err}");
                return ReclaimOutcome::GaveUp;
            }
        };

        match attempt {
            Ok(outcome) => {
                if matches!(outcome, ReclaimOutcome::Deleted) {
                    warn!(
                        "could not keep a copy of {}; the file was deleted",
                        source.display()
                    );
                }
                return outcome;
            }
            Err(e) => {
                debug!("{step:?} failed for {}: {e}", source.display());
                step = step.next();
            }
        }
    }
}

/// Backups of `location` (and of its staging file) present on disk, oldest
/// first.  Unreadable directories yield an empty list.
pub fn list_backups(location: &StorageLocation) -> Vec<BackupEntry> {
    let path = location.path();
    let Some(target_name) = path.file_name().and_then(|n| n.to_str()) else {
        return Vec::new();
    };
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let Ok(entries) = std::fs::read_dir(&dir) else {
        return Vec::new();
    };

    let mut backups: Vec<BackupEntry> = entries
        .filter_map(Result::ok)
        .filter_map(|entry| {
            let name = entry.file_name();
            BackupEntry::parse(target_name, &dir, name.to_str()?)
        })
        .collect();
    backups.sort_by(|a, b| {
        a.unix_millis
            .cmp(&b.unix_millis)
            .then_with(|| a.path.cmp(&b.path))
    });
    backups
}

fn unix_millis_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

// ── Tests ─────────────────────────────────────────────────────────────────────
