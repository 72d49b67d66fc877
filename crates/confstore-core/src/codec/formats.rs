//! Concrete [`Codec`] implementations backed by serde data formats.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{Codec, CodecError};

// ── JSON ──────────────────────────────────────────────────────────────────────

/// JSON via `serde_json`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonCodec {
    pretty: bool,
}

impl JsonCodec {
    /// Compact single-line output.
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Indented, human-editable output.
    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    pub fn is_pretty(&self) -> bool {
        self.pretty
    }
}

impl Codec for JsonCodec {
    fn name(&self) -> &'static str {
        "json"
    }

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(value)?
        } else {
            serde_json::to_vec(value)?
        };
        Ok(bytes)
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CodecError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

// ── TOML ──────────────────────────────────────────────────────────────────────

/// TOML via the `toml` crate.  Always pretty-printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TomlCodec;

impl Codec for TomlCodec {
    fn name(&self) -> &'static str {
        "toml"
    }

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        Ok(toml::to_string_pretty(value)?.into_bytes())
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CodecError> {
        let text = std::str::from_utf8(bytes)?;
        Ok(toml::from_str(text)?)
    }
}

// ── Bincode ───────────────────────────────────────────────────────────────────

/// Compact binary encoding via `bincode`.
///
/// Bincode is not self-describing, so it cannot decode schema-less targets
/// such as `serde_json::Value`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BincodeCodec;

impl Codec for BincodeCodec {
    fn name(&self) -> &'static str {
        "bincode"
    }

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        Ok(bincode::serialize(value)?)
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CodecError> {
        Ok(bincode::deserialize(bytes)?)
    }
}

// ── Runtime selection ─────────────────────────────────────────────────────────

/// Codec identifier as it appears in settings files and on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodecKind {
    #[default]
    Json,
    Toml,
    Bincode,
}

impl CodecKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CodecKind::Json => "json",
            CodecKind::Toml => "toml",
            CodecKind::Bincode => "bincode",
        }
    }

    /// Builds the codec.  `pretty` only affects JSON.
    pub fn build(self, pretty: bool) -> AnyCodec {
        match self {
            CodecKind::Json if pretty => AnyCodec::Json(JsonCodec::pretty()),
            CodecKind::Json => AnyCodec::Json(JsonCodec::new()),
            CodecKind::Toml => AnyCodec::Toml(TomlCodec),
            CodecKind::Bincode => AnyCodec::Bincode(BincodeCodec),
        }
    }
}

impl fmt::Display for CodecKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CodecKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(CodecKind::Json),
            "toml" => Ok(CodecKind::Toml),
            "bincode" | "bin" => Ok(CodecKind::Bincode),
            other => Err(format!("unknown codec '{other}' (expected json, toml or bincode)")),
        }
    }
}

/// One of the built-in codecs, chosen at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnyCodec {
    Json(JsonCodec),
    Toml(TomlCodec),
    Bincode(BincodeCodec),
}

impl AnyCodec {
    pub fn kind(&self) -> CodecKind {
        match self {
            AnyCodec::Json(_) => CodecKind::Json,
            AnyCodec::Toml(_) => CodecKind::Toml,
            AnyCodec::Bincode(_) => CodecKind::Bincode,
        }
    }
}

impl Default for AnyCodec {
    fn default() -> Self {
        AnyCodec::Json(JsonCodec::default())
    }
}

impl Codec for AnyCodec {
    fn name(&self) -> &'static str {
        match self {
            AnyCodec::Json(c) => c.name(),
            AnyCodec::Toml(c) => c.name(),
            AnyCodec::Bincode(c) => c.name(),
        }
    }

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        match self {
            AnyCodec::Json(c) => c.encode(value),
            AnyCodec::Toml(c) => c.encode(value),
            AnyCodec::Bincode(c) => c.encode(value),
        }
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CodecError> {
        match self {
            AnyCodec::Json(c) => c.decode(bytes),
            AnyCodec::Toml(c) => c.decode(bytes),
            AnyCodec::Bincode(c) => c.decode(bytes),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
