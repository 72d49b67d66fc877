//! TOML settings for embedding applications.
//!
//! Applications describe how their configuration files are stored in a small
//! TOML document instead of hard-coding it:
//!
//! ```toml
//! [store]
//! codec = "json"          # json | toml | bincode
//! pretty = true           # JSON only
//! compression = "none"    # none | gzip
//! unimportant = ["petCache", "auctionable_items"]
//! ```
//!
//! Every field has a default, so an empty file (or no file at all) is valid.
//!
//! # Serde default values
//!
//! Fields annotated with `#[serde(default = "some_fn")]` use the return value
//! of `some_fn()` when the field is absent from the TOML file.  This keeps
//! older settings files loading after new fields are added.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::codec::{AnyCodec, CodecKind, Compression};
use crate::domain::StorageLocation;
use crate::fs::OsFileOps;
use crate::store::ConfigStore;

/// Error type for reading settings files.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing settings at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse settings TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

// ── Settings schema ───────────────────────────────────────────────────────────

/// Top-level settings document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StoreSettings {
    #[serde(default)]
    pub store: StoreSection,
}

/// The `[store]` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreSection {
    /// Data format of stored files.
    #[serde(default)]
    pub codec: CodecKind,
    /// Indent JSON output.  Ignored by other codecs.
    #[serde(default = "default_true")]
    pub pretty: bool,
    /// Compression applied to stored files.
    #[serde(default)]
    pub compression: Compression,
    /// Logical file names whose staged data is dropped instead of backed up
    /// when a save fails.  Matched against a target's file name and stem.
    #[serde(default)]
    pub unimportant: BTreeSet<String>,
}

fn default_true() -> bool {
    true
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            codec: CodecKind::default(),
            pretty: default_true(),
            compression: Compression::default(),
            unimportant: BTreeSet::new(),
        }
    }
}

impl StoreSettings {
    /// Parses a settings document.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Parse`] if the TOML is malformed or a field
    /// has an unknown value.
    pub fn from_toml_str(s: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(s)?)
    }

    /// Reads settings from `path`, returning `StoreSettings::default()` if the
    /// file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Io`] for file-system errors other than "not
    /// found", and [`SettingsError::Parse`] if the TOML is malformed.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_toml_str(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(SettingsError::Io {
                path: path.to_path_buf(),
                source: e,
            }),
        }
    }

    /// The configured codec.
    pub fn codec(&self) -> AnyCodec {
        self.store.codec.build(self.store.pretty)
    }

    /// A location for `path` using the configured compression.
    pub fn location(&self, path: impl Into<PathBuf>) -> StorageLocation {
        StorageLocation::new(path).with_compression(self.store.compression)
    }

    /// A store with the configured codec and allow-list.
    pub fn build_store(&self) -> ConfigStore<AnyCodec, OsFileOps> {
        ConfigStore::new(self.codec()).with_unimportant(self.store.unimportant.iter().cloned())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
