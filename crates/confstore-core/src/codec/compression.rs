//! Optional transparent gzip layer for stored files.
//!
//! Compression sits between the codec and the file handle.  The codec never
//! sees compressed bytes; the file never sees uncompressed ones.  The layer is
//! only inserted when a [`StorageLocation`](crate::StorageLocation) asks for it.

use std::io::{self, Read, Write};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use serde::{Deserialize, Serialize};

/// Byte-stream transform applied to a stored file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    /// Bytes are written exactly as the codec produced them.
    #[default]
    None,
    /// Bytes are wrapped in a gzip stream (RFC 1952).
    Gzip,
}

impl Compression {
    pub fn is_compressed(&self) -> bool {
        matches!(self, Compression::Gzip)
    }

    /// Wraps `inner` so that everything written to the result lands in
    /// `inner` in this compression format.
    ///
    /// Call [`CompressedWriter::finish`] to write the gzip trailer; dropping
    /// the writer without finishing leaves a truncated stream.
    pub fn wrap_writer<W: Write>(self, inner: W) -> CompressedWriter<W> {
        match self {
            Compression::None => CompressedWriter::Plain(inner),
            Compression::Gzip => {
                CompressedWriter::Gzip(GzEncoder::new(inner, flate2::Compression::default()))
            }
        }
    }

    /// Wraps `inner` so that reads return the decompressed bytes.
    pub fn wrap_reader<R: Read>(self, inner: R) -> CompressedReader<R> {
        match self {
            Compression::None => CompressedReader::Plain(inner),
            Compression::Gzip => CompressedReader::Gzip(GzDecoder::new(inner)),
        }
    }
}

/// Writer returned by [`Compression::wrap_writer`].
pub enum CompressedWriter<W: Write> {
    Plain(W),
    Gzip(GzEncoder<W>),
}

impl<W: Write> CompressedWriter<W> {
    /// Flushes any pending compressed data and returns the underlying writer.
    pub fn finish(self) -> io::Result<W> {
        match self {
            CompressedWriter::Plain(mut w) => {
                w.flush()?;
                Ok(w)
            }
            CompressedWriter::Gzip(encoder) => {
                let mut w = encoder.finish()?;
                w.flush()?;
                Ok(w)
            }
        }
    }
}

impl<W: Write> Write for CompressedWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            CompressedWriter::Plain(w) => w.write(buf),
            CompressedWriter::Gzip(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            CompressedWriter::Plain(w) => w.flush(),
            CompressedWriter::Gzip(w) => w.flush(),
        }
    }
}

/// Reader returned by [`Compression::wrap_reader`].
pub enum CompressedReader<R: Read> {
    Plain(R),
    Gzip(GzDecoder<R>),
}

impl<R: Read> Read for CompressedReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            CompressedReader::Plain(r) => r.read(buf),
            CompressedReader::Gzip(r) => r.read(buf),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
