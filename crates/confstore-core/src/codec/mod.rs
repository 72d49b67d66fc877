//! Byte-level encoding of configuration values.
//!
//! The store never looks inside a configuration value.  It hands the value to
//! a [`Codec`], gets bytes back, and later asks the same codec to turn those
//! bytes into a value again.  Decoding is all-or-nothing: a codec either
//! returns a complete value or a [`CodecError`], never a partial object.
//!
//! # Provided codecs
//!
//! | Codec            | Crate        | Notes                                     |
//! |------------------|--------------|-------------------------------------------|
//! | [`JsonCodec`]    | `serde_json` | Default.  Optional pretty printing.       |
//! | [`TomlCodec`]    | `toml`       | Top-level value must be a table (struct). |
//! | [`BincodeCodec`] | `bincode`    | Compact; not self-describing.             |
//!
//! [`AnyCodec`] selects one of these at runtime, which is what
//! [`crate::StoreSettings`] and the `confstore` CLI use.
//!
//! Transparent compression lives in [`compression`]; it wraps the byte stream
//! and is independent of the codec.

pub mod compression;
mod formats;

pub use compression::Compression;
pub use formats::{AnyCodec, BincodeCodec, CodecKind, JsonCodec, TomlCodec};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Errors produced while encoding or decoding a configuration value.
#[derive(Debug, Error)]
pub enum CodecError {
    /// JSON encoding or decoding failed.
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    /// The TOML text could not be parsed into the requested type.
    #[error("toml decode: {0}")]
    TomlDe(#[from] toml::de::Error),

    /// The value could not be represented as TOML.
    #[error("toml encode: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// Bincode encoding or decoding failed.
    #[error("bincode: {0}")]
    Bincode(#[from] bincode::Error),

    /// A text format was handed bytes that are not valid UTF-8.
    #[error("content is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

/// Encodes values to bytes and decodes bytes back to values.
///
/// Implementations must be deterministic for a given value and must fail as a
/// unit when decoding.
pub trait Codec {
    /// Short lowercase name used in log lines (`"json"`, `"toml"`, ...).
    fn name(&self) -> &'static str;

    /// Encodes `value` into a fresh byte vector.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError`] if the value cannot be represented in this format.
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, CodecError>;

    /// Decodes a complete value of type `T` from `bytes`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError`] if `bytes` is not a valid encoding of `T`.
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CodecError>;
}
