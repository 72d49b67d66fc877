//! Domain types with no file-system side effects.
//!
//! - **`location`** – [`StorageLocation`] and the staging / backup paths
//!   derived from it, plus [`BackupEntry`] for recognising existing backups.

pub mod location;

pub use location::{backup_path, BackupEntry, BackupTag, StorageLocation, STAGING_SUFFIX};
