//! Reading configuration files back into values.

use std::fs::File;
use std::io::{self, BufReader, Read};

use serde::de::DeserializeOwned;
use tracing::{debug, error};

use super::backup::backup_and_discard;
use super::error::{LoadFailure, StoreError};
use super::ConfigStore;
use crate::codec::Codec;
use crate::domain::{BackupTag, StorageLocation};
use crate::fs::FileOps;

/// Result of reading a configuration file.
#[derive(Debug)]
pub enum LoadOutcome<T> {
    /// No file at the location, or the file holds no bytes.  Callers use
    /// their defaults.
    Absent,
    /// The file decoded completely.
    Value(T),
    /// The file exists but could not be read or decoded.
    Corrupted(LoadFailure),
}

impl<T> LoadOutcome<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, LoadOutcome::Absent)
    }

    pub fn is_corrupted(&self) -> bool {
        matches!(self, LoadOutcome::Corrupted(_))
    }

    /// The decoded value, if there is one.
    pub fn value(self) -> Option<T> {
        match self {
            LoadOutcome::Value(v) => Some(v),
            LoadOutcome::Absent | LoadOutcome::Corrupted(_) => None,
        }
    }

    /// Converts to a `Result`, turning corruption into
    /// [`StoreError::CorruptConfig`] for `location`.
    pub fn into_result(self, location: &StorageLocation) -> Result<Option<T>, StoreError> {
        match self {
            LoadOutcome::Absent => Ok(None),
            LoadOutcome::Value(v) => Ok(Some(v)),
            LoadOutcome::Corrupted(source) => Err(StoreError::CorruptConfig {
                path: location.path().to_path_buf(),
                source,
            }),
        }
    }
}

impl<T: Default> LoadOutcome<T> {
    /// The decoded value, or `T::default()` when absent or corrupted.
    pub fn or_default(self) -> T {
        self.value().unwrap_or_default()
    }
}

impl<C: Codec, F: FileOps> ConfigStore<C, F> {
    /// Loads the value stored at `location`.
    ///
    /// A file that cannot be read or decoded is logged as an invalid config,
    /// moved aside as `<path>-<millis>-corrupted`, and reported as
    /// [`LoadOutcome::Corrupted`].  The caller is expected to fall back to
    /// defaults; the next save writes a fresh file.
    pub fn load<T: DeserializeOwned>(&self, location: &StorageLocation) -> LoadOutcome<T> {
        self.load_with(location, true)
    }

    /// Loads the value stored at `location` without any side effects.
    ///
    /// Failures are returned silently: nothing is logged about them and no
    /// file is moved.  This is the check a save runs against its staging file.
    pub fn probe<T: DeserializeOwned>(&self, location: &StorageLocation) -> LoadOutcome<T> {
        self.load_with(location, false)
    }

    /// [`ConfigStore::load`], falling back to `T::default()`.
    pub fn load_or_default<T: DeserializeOwned + Default>(&self, location: &StorageLocation) -> T {
        self.load(location).or_default()
    }

    fn load_with<T: DeserializeOwned>(
        &self,
        location: &StorageLocation,
        report_errors: bool,
    ) -> LoadOutcome<T> {
        // The handle is closed when `read_location` returns, before any
        // backup below touches the file.
        let failure = match read_location(location) {
            Ok(None) => return LoadOutcome::Absent,
            Ok(Some(bytes)) if bytes.is_empty() => {
                debug!("{} is empty; treating as absent", location);
                return LoadOutcome::Absent;
            }
            Ok(Some(bytes)) => match self.codec.decode(&bytes) {
                Ok(value) => return LoadOutcome::Value(value),
                Err(e) => LoadFailure::Decode(e),
            },
            Err(e) => LoadFailure::Io(e),
        };

        if !report_errors {
            return LoadOutcome::Corrupted(failure);
        }

        error!(
            codec = self.codec.name(),
            "invalid config file '{}': {failure}. This will reset the config to default",
            location.path().display()
        );
        backup_and_discard(&self.fs, location.path(), BackupTag::Corrupted);
        LoadOutcome::Corrupted(failure)
    }
}

/// Reads the whole (decompressed) content of `location`.  `Ok(None)` means
/// there is no file.
fn read_location(location: &StorageLocation) -> io::Result<Option<Vec<u8>>> {
    let file = match File::open(location.path()) {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };

    let mut reader = location.compression().wrap_reader(BufReader::new(file));
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    Ok(Some(bytes))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
