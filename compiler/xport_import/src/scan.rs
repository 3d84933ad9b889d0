//! Locating export data inside an artifact.
//!
//! An artifact is either a bare object file or an `ar` archive whose first
//! member, `__.PKGDEF`, holds the object header. Either way the object header
//! is a run of human-readable lines (toolchain version, build flags, ...)
//! ended by the first line starting with `$`. That line is the sentinel.
//!
//! ```text
//! !<arch>\n                       optional archive magic
//! __.PKGDEF  ...  <size>  `\n     60-byte member header
//! go object linux amd64 ...\n     object header, skipped
//! ...\n
//! $$B\n                           sentinel
//! u<payload>\n$$\n                export data
//! ```
//!
//! For archives the member size is known, so the scanner also reports how
//! many bytes of the member remain after the sentinel.

use std::io::BufRead;

use crate::error::ScanError;

pub const ARCHIVE_MAGIC: &[u8] = b"!<arch>\n";
pub const PACKAGE_DEF_MEMBER: &str = "__.PKGDEF";
pub const OBJECT_HEADER_PREFIX: &[u8] = b"go object ";

const ARCHIVE_HEADER_LEN: usize = 60;
const ARCHIVE_NAME: std::ops::Range<usize> = 0..16;
const ARCHIVE_SIZE: std::ops::Range<usize> = 48..58;

/// The sentinel line and how much export data follows it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExportHeader {
    /// The sentinel line, including its trailing newline.
    pub line: String,
    /// Bytes remaining in the archive member after the sentinel, or `None`
    /// when the artifact does not declare a length.
    pub size: Option<u64>,
}

/// Skip the object header and return the sentinel.
///
/// On success `reader` is positioned just past the sentinel line.
pub fn find_export_data<R: BufRead + ?Sized>(reader: &mut R) -> Result<ExportHeader, ScanError> {
    let mut line = Vec::new();
    read_line(reader, &mut line)?;

    let mut remaining: Option<i64> = None;
    if line == ARCHIVE_MAGIC {
        let (name, size) = read_archive_header(reader)?;
        if name != PACKAGE_DEF_MEMBER {
            return Err(ScanError::MissingPackageDef);
        }
        let consumed = read_line(reader, &mut line)?;
        remaining = Some(size - consumed);
    }

    if !line.starts_with(OBJECT_HEADER_PREFIX) {
        return Err(ScanError::NotObjectFile);
    }

    while line.first() != Some(&b'$') {
        let consumed = read_line(reader, &mut line)?;
        if let Some(remaining) = remaining.as_mut() {
            *remaining -= consumed;
        }
    }

    let header = ExportHeader {
        line: String::from_utf8_lossy(&line).into_owned(),
        size: remaining.and_then(|n| u64::try_from(n).ok()),
    };
    tracing::trace!(line = ?header.line, size = ?header.size, "found export data");
    Ok(header)
}

/// Read one newline-terminated line into `buf`, returning its length.
///
/// A final line without a newline counts as running out of input.
fn read_line<R: BufRead + ?Sized>(reader: &mut R, buf: &mut Vec<u8>) -> Result<i64, ScanError> {
    buf.clear();
    let n = reader.read_until(b'\n', buf)?;
    if n == 0 || buf.last() != Some(&b'\n') {
        return Err(ScanError::UnexpectedEof);
    }
    Ok(i64::try_from(n).unwrap_or(i64::MAX))
}

/// Read a 60-byte `ar` member header, returning the member name and size.
fn read_archive_header<R: BufRead + ?Sized>(reader: &mut R) -> Result<(String, i64), ScanError> {
    let mut header = [0u8; ARCHIVE_HEADER_LEN];
    reader.read_exact(&mut header).map_err(|err| {
        if err.kind() == std::io::ErrorKind::UnexpectedEof {
            ScanError::UnexpectedEof
        } else {
            ScanError::Io(err)
        }
    })?;

    let name = std::str::from_utf8(&header[ARCHIVE_NAME])
        .map_err(|_| ScanError::BadArchiveHeader)?
        .trim();
    let size = std::str::from_utf8(&header[ARCHIVE_SIZE])
        .map_err(|_| ScanError::BadArchiveHeader)?
        .trim()
        .parse::<i64>()
        .map_err(|_| ScanError::BadArchiveHeader)?;

    Ok((name.to_owned(), size))
}
