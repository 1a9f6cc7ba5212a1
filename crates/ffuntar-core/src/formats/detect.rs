//! Compression detection from magic bytes.
//!
//! Input may come from a pipe, so the codec is sniffed from the first bytes
//! of the stream rather than from a file extension. The sniffed bytes are
//! chained back in front of the reader.

use std::io::Cursor;
use std::io::Read;

use bzip2::read::BzDecoder;
use flate2::read::GzDecoder;
use xz2::read::XzDecoder;

use crate::ExtractionError;
use crate::Result;
use crate::copy::fill_chunk;

const GZIP_MAGIC: &[u8] = &[0x1F, 0x8B];
const BZIP2_MAGIC: &[u8] = b"BZh";
const XZ_MAGIC: &[u8] = &[0xFD, 0x37, 0x7A, 0x58, 0x5A, 0x00];
const ZSTD_MAGIC: &[u8] = &[0x28, 0xB5, 0x2F, 0xFD];

/// Longest magic sequence we look for.
const MAGIC_LEN: usize = 6;

/// Compression wrapping a tar stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    /// Plain tar.
    None,
    /// Gzip (`.tar.gz`).
    Gzip,
    /// Bzip2 (`.tar.bz2`).
    Bzip2,
    /// XZ (`.tar.xz`).
    Xz,
    /// Zstandard (`.tar.zst`).
    Zstd,
}

impl Compression {
    /// Identifies the codec from the leading bytes of a stream.
    ///
    /// Anything unrecognised is treated as plain tar; the tar reader reports
    /// garbage as an invalid archive.
    ///
    /// # Examples
    ///
    /// ```
    /// use ffuntar_core::formats::Compression;
    ///
    /// assert_eq!(Compression::detect(&[0x1f, 0x8b, 0x08]), Compression::Gzip);
    /// assert_eq!(Compression::detect(b"BZh91AY"), Compression::Bzip2);
    /// assert_eq!(Compression::detect(b"ustar"), Compression::None);
    /// ```
    #[must_use]
    pub fn detect(magic: &[u8]) -> Self {
        if magic.starts_with(GZIP_MAGIC) {
            Self::Gzip
        } else if magic.starts_with(BZIP2_MAGIC) {
            Self::Bzip2
        } else if magic.starts_with(XZ_MAGIC) {
            Self::Xz
        } else if magic.starts_with(ZSTD_MAGIC) {
            Self::Zstd
        } else {
            Self::None
        }
    }

    /// Returns the codec name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Gzip => "gzip",
            Self::Bzip2 => "bzip2",
            Self::Xz => "xz",
            Self::Zstd => "zstd",
        }
    }
}

/// Sniffs the codec of `reader` and returns a reader of the decoded tar
/// stream.
///
/// # Errors
///
/// Returns `Io` if the leading bytes cannot be read and
/// `UnsupportedFormat` if the zstd decoder rejects the stream.
pub fn open_decoder<'a, R: Read + 'a>(mut reader: R) -> Result<(Compression, Box<dyn Read + 'a>)> {
    let mut magic = [0u8; MAGIC_LEN];
    let n = fill_chunk(&mut reader, &mut magic)?;
    let compression = Compression::detect(&magic[..n]);
    let chained = Cursor::new(magic[..n].to_vec()).chain(reader);

    let decoder: Box<dyn Read + 'a> = match compression {
        Compression::None => Box::new(chained),
        Compression::Gzip => Box::new(GzDecoder::new(chained)),
        Compression::Bzip2 => Box::new(BzDecoder::new(chained)),
        Compression::Xz => Box::new(XzDecoder::new(chained)),
        Compression::Zstd => Box::new(
            zstd::stream::read::Decoder::new(chained)
                .map_err(|_| ExtractionError::UnsupportedFormat)?,
        ),
    };
    tracing::debug!(compression = compression.name(), "input codec detected");
    Ok((compression, decoder))
}
