//! confstore: inspect, verify and rewrite configuration files.
//!
//! Every command goes through the same protocol an embedding application
//! uses, so a file written here is verified before it replaces the target,
//! and a corrupt file found by `show` is moved aside exactly as the
//! application would move it.
//!
//! # Usage
//!
//! ```text
//! confstore [OPTIONS] <COMMAND>
//!
//! Commands:
//!   show     <PATH>                 Load and print as JSON (quarantines corrupt files)
//!   check    <PATH>                 Verify that a file decodes; never modifies anything
//!   write    <PATH> --input <FILE>  Save a JSON document through the full protocol
//!   backups  <PATH>                 List corrupted/backup copies of a file
//!
//! Options:
//!   --settings <FILE>   Settings TOML [env: CONFSTORE_SETTINGS]
//!   --codec <CODEC>     json | toml   [env: CONFSTORE_CODEC]
//!   --gzip              Treat files as gzip-compressed
//!   --compact           Write JSON without indentation
//! ```
//!
//! Command-line flags take precedence over the settings file.

mod commands;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use confstore_core::{CodecKind, Compression, StoreSettings};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Crash-safe configuration file tool.
#[derive(Debug, Parser)]
#[command(
    name = "confstore",
    about = "Inspect, verify and rewrite configuration files without risking the last good copy",
    version
)]
struct Cli {
    /// Settings TOML describing codec, compression and unimportant names.
    ///
    /// A missing file means defaults (pretty JSON, no compression).
    #[arg(long, global = true, env = "CONFSTORE_SETTINGS")]
    settings: Option<PathBuf>,

    /// Data format of the file.  Overrides the settings file.
    #[arg(long, global = true, env = "CONFSTORE_CODEC")]
    codec: Option<CodecKind>,

    /// Read and write gzip-compressed files.  Overrides the settings file.
    #[arg(long, global = true)]
    gzip: bool,

    /// Write JSON on a single line.
    #[arg(long, global = true)]
    compact: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load a file and print it as JSON.
    ///
    /// A file that cannot be decoded is moved aside as
    /// `<path>-<millis>-corrupted` and the command fails.
    Show { path: PathBuf },

    /// Check that a file decodes, without changing anything on disk.
    Check { path: PathBuf },

    /// Save a JSON document to a file through the verified save path.
    Write {
        path: PathBuf,

        /// JSON document to store; `-` reads standard input.
        #[arg(long, short)]
        input: PathBuf,
    },

    /// List backups of a file, oldest first.
    Backups { path: PathBuf },
}

impl Cli {
    /// Loads the settings file (if any) and applies command-line overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings file exists but cannot be read or
    /// parsed.
    fn resolve_settings(&self) -> anyhow::Result<StoreSettings> {
        let mut settings = match &self.settings {
            Some(path) => StoreSettings::load_from(path)
                .with_context(|| format!("loading settings from {}", path.display()))?,
            None => StoreSettings::default(),
        };

        if let Some(codec) = self.codec {
            settings.store.codec = codec;
        }
        if self.gzip {
            settings.store.compression = Compression::Gzip;
        }
        if self.compact {
            settings.store.pretty = false;
        }
        Ok(settings)
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    // `RUST_LOG` controls verbosity; `info` shows backups being made.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = cli.resolve_settings()?;
    debug!(
        "codec={} compression={:?} unimportant={}",
        settings.store.codec,
        settings.store.compression,
        settings.store.unimportant.len()
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Command::Show { path } => commands::show(&settings, &path, &mut out),
        Command::Check { path } => commands::check(&settings, &path, &mut out),
        Command::Write { path, input } => commands::write(&settings, &path, &input, &mut out),
        Command::Backups { path } => commands::backups(&settings, &path, &mut out),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_show_with_defaults() {
        // Arrange / Act
        let cli = Cli::parse_from(["confstore", "show", "/cfg/app.json"]);

        // Assert
        assert!(cli.codec.is_none());
        assert!(!cli.gzip);
        assert!(matches!(
            cli.command,
            Command::Show { ref path } if path == &PathBuf::from("/cfg/app.json")
        ));
    }

    #[test]
    fn test_cli_accepts_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["confstore", "check", "a.toml", "--codec", "toml", "--gzip"]);
        assert_eq!(cli.codec, Some(CodecKind::Toml));
        assert!(cli.gzip);
    }

    #[test]
    fn test_cli_write_requires_input() {
        let result = Cli::try_parse_from(["confstore", "write", "a.json"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_rejects_unknown_codec() {
        let result = Cli::try_parse_from(["confstore", "--codec", "yaml", "show", "a"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_resolve_settings_defaults_without_file() {
        let cli = Cli::parse_from(["confstore", "show", "a.json"]);

        let settings = cli.resolve_settings().unwrap();

        assert_eq!(settings, StoreSettings::default());
    }

    #[test]
    fn test_flags_override_settings_file() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let settings_path = dir.path().join("confstore.toml");
        std::fs::write(
            &settings_path,
            "[store]\ncodec = \"json\"\npretty = true\nunimportant = [\"petCache\"]\n",
        )
        .unwrap();
        let cli = Cli::parse_from([
            "confstore",
            "--settings",
            settings_path.to_str().unwrap(),
            "--codec",
            "toml",
            "--gzip",
            "--compact",
            "backups",
            "a",
        ]);

        // Act
        let settings = cli.resolve_settings().unwrap();

        // Assert
        assert_eq!(settings.store.codec, CodecKind::Toml);
        assert_eq!(settings.store.compression, Compression::Gzip);
        assert!(!settings.store.pretty);
        assert!(settings.store.unimportant.contains("petCache"));
    }

    #[test]
    fn test_malformed_settings_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let settings_path = dir.path().join("confstore.toml");
        std::fs::write(&settings_path, "[store\n").unwrap();
        let cli = Cli::parse_from([
            "confstore",
            "--settings",
            settings_path.to_str().unwrap(),
            "show",
            "a",
        ]);

        assert!(cli.resolve_settings().is_err());
    }
}
