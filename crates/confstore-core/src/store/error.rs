//! Error types for load and save operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::codec::CodecError;

/// Why a file could not be turned into a value.
#[derive(Debug, Error)]
pub enum LoadFailure {
    /// Opening, reading or decompressing the file failed.
    #[error("read failed: {0}")]
    Io(#[from] io::Error),

    /// The bytes were read but did not decode into the requested type.
    #[error("decode failed: {0}")]
    Decode(#[from] CodecError),
}

/// Error type for store operations.
///
/// A missing file is not an error; it is
/// [`LoadOutcome::Absent`](crate::LoadOutcome::Absent).
#[derive(Debug, Error)]
pub enum StoreError {
    /// A user-facing load found a file it could not read or decode.
    #[error("invalid config file '{}': {source}", .path.display())]
    CorruptConfig {
        path: PathBuf,
        #[source]
        source: LoadFailure,
    },

    /// The value could not be encoded by the codec.
    #[error("could not encode config for '{}': {source}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: CodecError,
    },

    /// Creating or writing the staging file failed.
    #[error("could not write staging file '{}': {source}", .path.display())]
    StagingWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The freshly staged bytes did not decode back into a value.
    #[error("config verification failed for '{}'; target left untouched", .path.display())]
    VerificationFailed { path: PathBuf },

    /// Neither the atomic rename nor the overwrite fallback could promote the
    /// staging file over the target.
    #[error("could not promote '{}' over '{}': {source}", .from.display(), .to.display())]
    PromotionFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A file could be neither moved aside nor deleted.  Only ever logged.
    #[error("could not back up or remove '{}'", .path.display())]
    BackupFailed { path: PathBuf },

    /// A blocking task running a store operation panicked or was cancelled.
    #[error("store task did not complete: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}
