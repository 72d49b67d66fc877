//! Shared fixtures for confstore-core integration tests.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use confstore_core::{Codec, CodecError, JsonCodec};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A representative application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub theme: String,
    pub font_size: u16,
    pub recent_files: Vec<String>,
    pub keybinds: BTreeMap<String, String>,
    pub window: Window,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Window {
    pub width: u32,
    pub height: u32,
    pub maximized: bool,
}

pub fn sample_config(font_size: u16) -> AppConfig {
    let mut keybinds = BTreeMap::new();
    keybinds.insert("save".to_string(), "Ctrl+S".to_string());
    keybinds.insert("quit".to_string(), "Ctrl+Q".to_string());
    AppConfig {
        theme: "dark".to_string(),
        font_size,
        recent_files: vec!["/tmp/a.txt".to_string(), "/tmp/b.txt".to_string()],
        keybinds,
        window: Window {
            width: 1280,
            height: 720,
            maximized: false,
        },
    }
}

/// Encodes like [`JsonCodec`] but chops the output in half, simulating a
/// serializer bug or a short write.  Decoding is plain JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct TruncatingCodec;

impl Codec for TruncatingCodec {
    fn name(&self) -> &'static str {
        "truncating"
    }

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        let mut bytes = JsonCodec::new().encode(value)?;
        bytes.truncate(bytes.len() / 2);
        Ok(bytes)
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CodecError> {
        JsonCodec::new().decode(bytes)
    }
}

/// Sorted file names in `dir`.
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("read_dir")
        .map(|e| e.expect("dir entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Paths in `dir` whose name ends with `-<tag>`.
pub fn files_tagged(dir: &Path, tag: &str) -> Vec<PathBuf> {
    let suffix = format!("-{tag}");
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .expect("read_dir")
        .map(|e| e.expect("dir entry").path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(&suffix))
        })
        .collect();
    paths.sort();
    paths
}
