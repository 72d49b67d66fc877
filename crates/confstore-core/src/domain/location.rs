//! Where a configuration file lives and the sibling paths derived from it.
//!
//! For a target `settings.json` in some directory the store uses:
//!
//! ```text
//! settings.json                         target (durable, externally visible)
//! settings.json.temp                    staging file written by every save
//! settings.json-1718000000000-corrupted undecodable target moved aside by a load
//! settings.json.temp-1718000000000-backup  staged bytes kept after a failed save
//! ```
//!
//! All derived paths are siblings of the target, so a rename between them never
//! crosses a filesystem boundary.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::codec::Compression;

/// Suffix appended to the target's file name to form the staging path.
pub const STAGING_SUFFIX: &str = ".temp";

/// A configuration file path plus the compression applied to its bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageLocation {
    path: PathBuf,
    compression: Compression,
}

impl StorageLocation {
    /// An uncompressed location.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            compression: Compression::None,
        }
    }

    /// A gzip-compressed location.
    pub fn gzip(path: impl Into<PathBuf>) -> Self {
        Self::new(path).with_compression(Compression::Gzip)
    }

    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// The staging sibling `<path>.temp`, with the same compression.
    pub fn staging(&self) -> StorageLocation {
        StorageLocation {
            path: append_to_file_name(&self.path, STAGING_SUFFIX),
            compression: self.compression,
        }
    }

    /// Names under which this location may appear on an allow-list: the full
    /// file name (`petCache.json`) and the file stem (`petCache`).
    pub fn logical_names(&self) -> impl Iterator<Item = &str> + '_ {
        let name = self.path.file_name().and_then(|n| n.to_str());
        let stem = self.path.file_stem().and_then(|n| n.to_str());
        name.into_iter().chain(stem.filter(move |s| Some(*s) != name))
    }
}

impl fmt::Display for StorageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())?;
        if self.compression.is_compressed() {
            f.write_str(" (gzip)")?;
        }
        Ok(())
    }
}

/// Why a file was moved aside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackupTag {
    /// A target that failed to load.
    Corrupted,
    /// Staged bytes from a save that could not be completed.
    Backup,
}

impl BackupTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackupTag::Corrupted => "corrupted",
            BackupTag::Backup => "backup",
        }
    }
}

impl fmt::Display for BackupTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackupTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "corrupted" => Ok(BackupTag::Corrupted),
            "backup" => Ok(BackupTag::Backup),
            other => Err(format!("unknown backup tag '{other}'")),
        }
    }
}

/// `<source>-<unix_millis>-<tag>` next to `source`.
pub fn backup_path(source: &Path, tag: BackupTag, unix_millis: u64) -> PathBuf {
    append_to_file_name(source, &format!("-{unix_millis}-{tag}"))
}

/// A backup file found next to a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupEntry {
    pub path: PathBuf,
    pub tag: BackupTag,
    pub unix_millis: u64,
    /// `true` when the backup holds staged bytes (`<name>.temp-...`) rather
    /// than a former target.
    pub from_staging: bool,
}

impl BackupEntry {
    /// Recognises `file_name` as a backup of the target named `target_name`.
    pub fn parse(target_name: &str, dir: &Path, file_name: &str) -> Option<BackupEntry> {
        let staging_name = format!("{target_name}{STAGING_SUFFIX}");
        let (rest, from_staging) = match strip_dash_prefix(file_name, &staging_name) {
            Some(rest) => (rest, true),
            None => (strip_dash_prefix(file_name, target_name)?, false),
        };

        let (millis, tag) = rest.split_once('-')?;
        if millis.is_empty() || !millis.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(BackupEntry {
            path: dir.join(file_name),
            tag: tag.parse().ok()?,
            unix_millis: millis.parse().ok()?,
            from_staging,
        })
    }
}

fn strip_dash_prefix<'a>(file_name: &'a str, prefix: &str) -> Option<&'a str> {
    file_name.strip_prefix(prefix)?.strip_prefix('-')
}

pub(crate) fn append_to_file_name(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(suffix);
    path.with_file_name(name)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
