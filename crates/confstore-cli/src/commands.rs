//! Subcommand implementations.
//!
//! Each command takes the resolved [`StoreSettings`] and writes its report to
//! `out`, so tests can capture it.  Values travel as [`serde_json::Value`];
//! the tool never needs to know the schema of the file it handles.

use std::io::{Read, Write};
use std::path::Path;

use anyhow::{bail, Context};
use serde_json::Value;
use tracing::info;

use confstore_core::{
    list_backups, AnyCodec, CodecKind, ConfigStore, LoadOutcome, OsFileOps, StorageLocation,
    StoreSettings,
};

/// Builds the store and location for `path`.
///
/// Bincode is refused: it does not describe its own structure, so it cannot
/// be decoded into a schema-less [`Value`].
fn open(
    settings: &StoreSettings,
    path: &Path,
) -> anyhow::Result<(ConfigStore<AnyCodec, OsFileOps>, StorageLocation)> {
    if settings.store.codec == CodecKind::Bincode {
        bail!("bincode files have no self-describing structure; use a typed loader instead");
    }
    Ok((settings.build_store(), settings.location(path)))
}

/// `show`: reporting load.  A corrupt file is quarantined and the command
/// fails.
pub fn show(settings: &StoreSettings, path: &Path, out: &mut impl Write) -> anyhow::Result<()> {
    let (store, location) = open(settings, path)?;

    match store.load::<Value>(&location).into_result(&location)? {
        Some(value) => {
            serde_json::to_writer_pretty(&mut *out, &value)?;
            writeln!(out)?;
        }
        None => writeln!(out, "no config file at {location}")?,
    }
    Ok(())
}

/// `check`: verification-only probe.  Never touches the file.
pub fn check(settings: &StoreSettings, path: &Path, out: &mut impl Write) -> anyhow::Result<()> {
    let (store, location) = open(settings, path)?;

    match store.probe::<Value>(&location) {
        LoadOutcome::Value(_) => writeln!(out, "ok: {location}")?,
        LoadOutcome::Absent => writeln!(out, "absent: {location}")?,
        LoadOutcome::Corrupted(failure) => {
            bail!("{location} does not decode as {}: {failure}", settings.store.codec)
        }
    }
    Ok(())
}

/// `write`: reads a JSON document from `input` (`-` for stdin) and saves it.
pub fn write(
    settings: &StoreSettings,
    path: &Path,
    input: &Path,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let (store, location) = open(settings, path)?;

    let text = read_input(input)?;
    let value: Value = serde_json::from_str(&text)
        .with_context(|| format!("input {} is not valid JSON", input.display()))?;

    store
        .save(&value, &location)
        .with_context(|| format!("saving {location}"))?;
    info!("saved {location}");
    writeln!(out, "saved: {location}")?;
    Ok(())
}

/// `backups`: one line per backup, oldest first.
pub fn backups(settings: &StoreSettings, path: &Path, out: &mut impl Write) -> anyhow::Result<()> {
    let location = settings.location(path);
    let entries = list_backups(&location);

    if entries.is_empty() {
        writeln!(out, "no backups for {location}")?;
        return Ok(());
    }
    for entry in entries {
        let origin = if entry.from_staging { "staging" } else { "target" };
        writeln!(
            out,
            "{}\t{}\t{}\t{}",
            entry.unix_millis,
            entry.tag,
            origin,
            entry.path.display()
        )?;
    }
    Ok(())
}

fn read_input(input: &Path) -> anyhow::Result<String> {
    if input == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("reading standard input")?;
        return Ok(text);
    }
    std::fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn run<F>(f: F) -> (anyhow::Result<()>, String)
    where
        F: FnOnce(&mut Vec<u8>) -> anyhow::Result<()>,
    {
        let mut out = Vec::new();
        let result = f(&mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_write_then_show_round_trips_json() {
        // Arrange
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("app.json");
        let input = dir.path().join("input.json");
        std::fs::write(&input, r#"{"theme":"dark","font_size":14}"#).unwrap();
        let settings = StoreSettings::default();

        // Act
        let (written, _) = run(|out| write(&settings, &target, &input, out));
        let (shown, text) = run(|out| show(&settings, &target, out));

        // Assert
        written.unwrap();
        shown.unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["theme"], "dark");
        assert_eq!(value["font_size"], 14);
    }

    #[test]
    fn test_write_in_toml_produces_toml_file() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("app.toml");
        let input = dir.path().join("input.json");
        std::fs::write(&input, r#"{"theme":"light"}"#).unwrap();
        let mut settings = StoreSettings::default();
        settings.store.codec = CodecKind::Toml;

        let (result, _) = run(|out| write(&settings, &target, &input, out));

        result.unwrap();
        let text = std::fs::read_to_string(&target).unwrap();
        assert!(text.contains("theme = \"light\""));
    }

    #[test]
    fn test_write_rejects_invalid_json_input_and_keeps_target() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("app.json");
        std::fs::write(&target, "{\"a\": 1}").unwrap();
        let input = dir.path().join("input.json");
        std::fs::write(&input, "{not json").unwrap();

        let (result, _) = run(|out| write(&StoreSettings::default(), &target, &input, out));

        assert!(result.is_err());
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn test_show_reports_missing_file() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("app.json");

        let (result, text) = run(|out| show(&StoreSettings::default(), &target, out));

        result.unwrap();
        assert!(text.starts_with("no config file at"));
    }

    #[test]
    fn test_show_quarantines_corrupt_file_and_fails() {
        // Arrange
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("app.json");
        std::fs::write(&target, "{\"theme\": ").unwrap();

        // Act
        let (result, _) = run(|out| show(&StoreSettings::default(), &target, out));

        // Assert
        assert!(result.is_err());
        assert!(!target.exists());
        let entries = list_backups(&StorageLocation::new(&target));
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_check_fails_on_corrupt_file_without_moving_it() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("app.json");
        std::fs::write(&target, "{\"theme\": ").unwrap();

        let (result, _) = run(|out| check(&StoreSettings::default(), &target, out));

        assert!(result.is_err());
        assert!(target.exists());
    }

    #[test]
    fn test_check_reports_ok_for_valid_file() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("app.json");
        std::fs::write(&target, "{\"theme\": \"dark\"}").unwrap();

        let (result, text) = run(|out| check(&StoreSettings::default(), &target, out));

        result.unwrap();
        assert!(text.starts_with("ok:"));
    }

    #[test]
    fn test_bincode_is_refused() {
        let dir = TempDir::new().unwrap();
        let mut settings = StoreSettings::default();
        settings.store.codec = CodecKind::Bincode;

        let (result, _) = run(|out| check(&settings, &dir.path().join("app.bin"), out));

        assert!(result.is_err());
    }

    #[test]
    fn test_backups_lists_quarantined_file() {
        // Arrange
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("app.json");
        std::fs::write(&target, "garbage").unwrap();
        let settings = StoreSettings::default();
        let _ = run(|out| show(&settings, &target, out));

        // Act
        let (result, text) = run(|out| backups(&settings, &target, out));

        // Assert
        result.unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("\tcorrupted\ttarget\t"));
    }

    #[test]
    fn test_backups_reports_none() {
        let dir = TempDir::new().unwrap();

        let (result, text) =
            run(|out| backups(&StoreSettings::default(), &dir.path().join("app.json"), out));

        result.unwrap();
        assert!(text.starts_with("no backups for"));
    }
}
