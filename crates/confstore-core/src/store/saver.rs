//! Writing values to disk through a verified staging file.
//!
//! # Save sequence
//!
//! ```text
//! encode ─► write <path>.temp ─► probe <path>.temp ─► rename over <path>
//!   │             │                     │                 │ rejected
//!   │             │                     │                 ▼
//!   │             │                     │       copy via <path>.partial
//!   ▼             ▼                     ▼                 ▼ failed
//!  Encode    StagingWrite      VerificationFailed   PromotionFailed
//!   └─────────────┴──────────┬──────────┴─────────────────┘
//!                            ▼
//!        staging kept as <path>.temp-<millis>-backup
//!        (deleted instead when the target is unimportant)
//! ```
//!
//! On every path the target is either replaced by bytes that have already
//! decoded successfully, or left exactly as it was.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, warn};

use super::backup::backup_and_discard;
use super::error::StoreError;
use super::loader::LoadOutcome;
use super::ConfigStore;
use crate::codec::Codec;
use crate::domain::{BackupTag, StorageLocation};
use crate::fs::{entry_exists, FileOps};

impl<C: Codec, F: FileOps> ConfigStore<C, F> {
    /// Saves `value` to `location`.
    ///
    /// The staging file `<path>.temp` is written, decoded back as `T`, and only
    /// then moved over the target.  When the atomic rename is rejected the
    /// staging file is copied into a fresh synced sibling which is renamed over
    /// the target instead; the target itself is never written in place.
    ///
    /// Whatever happens, no staging file is left behind: it is promoted,
    /// preserved as `<path>.temp-<millis>-backup`, or (for unimportant
    /// targets) deleted.
    ///
    /// # Errors
    ///
    /// Every error has already been logged when it is returned; callers that
    /// treat saving as best-effort may ignore it.  The previous target file is
    /// intact whenever an error is returned.
    pub fn save<T>(&self, value: &T, location: &StorageLocation) -> Result<(), StoreError>
    where
        T: Serialize + DeserializeOwned,
    {
        let staging = location.staging();

        let result = self.stage_and_promote(value, location, &staging);
        if let Err(err) = &result {
            error!(codec = self.codec.name(), "failed to save {}: {err}", location);
            self.discard_staging(location, &staging);
        }
        result
    }

    fn stage_and_promote<T>(
        &self,
        value: &T,
        location: &StorageLocation,
        staging: &StorageLocation,
    ) -> Result<(), StoreError>
    where
        T: Serialize + DeserializeOwned,
    {
        let bytes = self
            .codec
            .encode(value)
            .map_err(|source| StoreError::Encode {
                path: location.path().to_path_buf(),
                source,
            })?;

        write_staging(staging, &bytes).map_err(|source| StoreError::StagingWrite {
            path: staging.path().to_path_buf(),
            source,
        })?;
        debug!("staged {} bytes at {}", bytes.len(), staging);

        match self.probe::<T>(staging) {
            LoadOutcome::Value(_) => {}
            LoadOutcome::Absent | LoadOutcome::Corrupted(_) => {
                warn!(
                    "Config verification failed for {}, could not save config properly.",
                    staging.path().display()
                );
                return Err(StoreError::VerificationFailed {
                    path: staging.path().to_path_buf(),
                });
            }
        }

        self.promote(staging.path(), location.path())
    }

    /// Moves the verified staging file over the target.
    fn promote(&self, staging: &Path, target: &Path) -> Result<(), StoreError> {
        let promotion_failed = |source| StoreError::PromotionFailed {
            from: staging.to_path_buf(),
            to: target.to_path_buf(),
            source,
        };

        match self.fs.rename(staging, target) {
            Ok(()) => {
                debug!("promoted {} atomically", target.display());
                Ok(())
            }
            // The staging file vanished; there is nothing to fall back with.
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(promotion_failed(e)),
            Err(e) => {
                // Either atomic rename is unsupported here or it refuses to
                // overwrite an existing target.
                warn!(
                    "atomic replace of {} rejected ({e}); copying through a sibling instead",
                    target.display()
                );
                self.fs
                    .replace(staging, target)
                    .map_err(promotion_failed)?;
                debug!("promoted {} by copy", target.display());
                Ok(())
            }
        }
    }

    /// Clears the staging file after a failed save.
    fn discard_staging(&self, location: &StorageLocation, staging: &StorageLocation) {
        if !entry_exists(staging.path()) {
            return;
        }

        if self.is_unimportant(location) {
            debug!("dropping staged data for unimportant {}", location);
            if let Err(e) = self.fs.remove(staging.path()) {
                warn!("could not remove {}: {e}", staging.path().display());
            }
            return;
        }

        backup_and_discard(&self.fs, staging.path(), BackupTag::Backup);
    }
}

/// Creates (or truncates) the staging file and writes `bytes` through the
/// location's compression.  The handle is synced and closed on return.
fn write_staging(staging: &StorageLocation, bytes: &[u8]) -> io::Result<()> {
    if let Some(dir) = staging.path().parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)?;
        }
    }

    let file = File::create(staging.path())?;
    let mut writer = staging.compression().wrap_writer(BufWriter::new(file));
    writer.write_all(bytes)?;
    let file = writer
        .finish()?
        .into_inner()
        .map_err(|e| e.into_error())?;
    file.sync_all()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
