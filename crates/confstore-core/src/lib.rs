//! # confstore-core
//!
//! Crash-safe persistence for configuration files on local disk.
//!
//! Loading turns a file into a value, or reports that there was no file, or
//! that the file was unreadable (in which case the bad file is moved aside
//! and the caller falls back to defaults).  Saving never overwrites a good
//! file with bytes that have not first been read back successfully.
//!
//! # Architecture overview
//!
//! - **`codec`** – How values become bytes.  The [`Codec`] trait plus JSON,
//!   TOML and bincode implementations, and the optional gzip
//!   [`Compression`] layer.
//!
//! - **`domain`** – [`StorageLocation`]: a path, its compression, and the
//!   staging (`<path>.temp`) and backup (`<path>-<millis>-<tag>`) siblings
//!   derived from it.
//!
//! - **`fs`** – The [`FileOps`] seam for renames, overwrites and deletes, so
//!   tests can make them fail.
//!
//! - **`store`** – [`ConfigStore`]: the load / verify / atomic-replace /
//!   backup protocol, plus the tokio adapter [`AsyncConfigStore`].
//!
//! - **`settings`** – [`StoreSettings`], a TOML description of codec,
//!   compression and the "unimportant" allow-list.
//!
//! # Example
//!
//! ```rust
//! use confstore_core::{ConfigStore, StorageLocation};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
//! struct Settings {
//!     volume: u8,
//! }
//!
//! let dir = tempfile::tempdir().unwrap();
//! let location = StorageLocation::new(dir.path().join("settings.json"));
//! let store = ConfigStore::json();
//!
//! // First run: nothing on disk yet.
//! let settings: Settings = store.load_or_default(&location);
//! assert_eq!(settings, Settings::default());
//!
//! store.save(&Settings { volume: 80 }, &location).unwrap();
//! assert_eq!(store.load_or_default::<Settings>(&location).volume, 80);
//! ```

pub mod codec;
pub mod domain;
pub mod fs;
pub mod settings;
pub mod store;

pub use codec::{
    AnyCodec, BincodeCodec, Codec, CodecError, CodecKind, Compression, JsonCodec, TomlCodec,
};
pub use domain::{BackupEntry, BackupTag, StorageLocation};
pub use fs::{FileOps, OsFileOps};
pub use settings::{SettingsError, StoreSettings};
pub use store::{
    backup_and_discard, list_backups, AsyncConfigStore, ConfigStore, LoadFailure, LoadOutcome,
    ReclaimOutcome, StoreError,
};
