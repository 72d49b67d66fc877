//! The load / verify / atomic-replace / backup protocol.
//!
//! [`ConfigStore`] owns a [`Codec`], a [`FileOps`] implementation and the set
//! of "unimportant" logical names.  Its behaviour is split across:
//!
//! - **`loader`** – [`ConfigStore::load`] and [`ConfigStore::probe`].  Reads a
//!   file (through gzip if requested), decodes it, and reports
//!   [`LoadOutcome::Absent`], [`LoadOutcome::Value`] or
//!   [`LoadOutcome::Corrupted`].
//!
//! - **`saver`** – [`ConfigStore::save`].  Encodes, writes `<path>.temp`,
//!   probes it, and promotes it over the target.  Nothing reaches the target
//!   before it has been decoded successfully.
//!
//! - **`backup`** – moves abandoned files aside under timestamped names.
//!
//! - **`async_store`** – [`AsyncConfigStore`], which runs the same protocol
//!   on tokio's blocking pool.
//!
//! # Concurrency
//!
//! There is no locking.  Two saves of the same target racing each other
//! may clobber each other's staging file; the last promotion wins.

pub mod async_store;
pub mod backup;
pub mod error;
mod loader;
mod saver;

pub use async_store::AsyncConfigStore;
pub use backup::{
    backup_and_discard, backup_and_discard_at, list_backups, ReclaimOutcome, ReclaimStep,
};
pub use error::{LoadFailure, StoreError};
pub use loader::LoadOutcome;

use std::collections::BTreeSet;

use crate::codec::{Codec, JsonCodec};
use crate::domain::StorageLocation;
use crate::fs::{FileOps, OsFileOps};

/// Loads and saves configuration values without ever exposing a half-written
/// or unverified target file.
#[derive(Debug, Clone)]
pub struct ConfigStore<C = JsonCodec, F = OsFileOps> {
    codec: C,
    fs: F,
    unimportant: BTreeSet<String>,
}

impl ConfigStore<JsonCodec, OsFileOps> {
    /// A store using pretty-printed JSON on the real file system.
    pub fn json() -> Self {
        Self::new(JsonCodec::pretty())
    }
}

impl Default for ConfigStore<JsonCodec, OsFileOps> {
    fn default() -> Self {
        Self::json()
    }
}

impl<C: Codec> ConfigStore<C, OsFileOps> {
    pub fn new(codec: C) -> Self {
        Self::with_file_ops(codec, OsFileOps)
    }
}

impl<C: Codec, F: FileOps> ConfigStore<C, F> {
    /// A store that moves and deletes files through `fs`.
    pub fn with_file_ops(codec: C, fs: F) -> Self {
        Self {
            codec,
            fs,
            unimportant: BTreeSet::new(),
        }
    }

    /// Marks logical names whose staged data may be dropped, rather than
    /// backed up, when a save fails.
    pub fn with_unimportant<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.unimportant.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    pub fn file_ops(&self) -> &F {
        &self.fs
    }

    pub fn unimportant(&self) -> &BTreeSet<String> {
        &self.unimportant
    }

    /// `true` when any logical name of `location` is on the allow-list.
    pub fn is_unimportant(&self, location: &StorageLocation) -> bool {
        location
            .logical_names()
            .any(|name| self.unimportant.contains(name))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
