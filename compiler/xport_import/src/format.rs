//! Export data format detection and dispatch.
//!
//! Export data encodings have changed several times. The sentinel line and,
//! for binary data, the byte right after it say which one an artifact uses:
//!
//! | Sentinel | Tag | Encoding | Action |
//! |---|---|---|---|
//! | `$$\n` | | textual | rejected, recompile |
//! | `$$B\n` | `c` `d` `v` | old binary | rejected, recompile |
//! | `$$B\n` | `i` | indexed | stream to [`ExportDecoder::decode_indexed`] |
//! | `$$B\n` | `u` | unified | buffer to [`ExportDecoder::decode_unified`] |
//! | other | | | unknown header |
//!
//! Supporting a new encoding means a new [`FormatMarker`] variant and arm.

use std::io::{BufRead, Read};

use xport_graph::{FileSet, PackageId, PackageRegistry};

use crate::decoder::{DecodeContext, ExportDecoder};
use crate::error::{ImportError, RetiredFormat};
use crate::importer::Session;
use crate::scan::{find_export_data, ExportHeader};

pub const TEXT_SENTINEL: &str = "$$\n";
pub const BINARY_SENTINEL: &str = "$$B\n";

/// Terminates unified export data. Not part of the payload.
pub const END_MARKER: &[u8] = b"\n$$\n";

/// Export data encoding, as announced by sentinel and tag byte.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FormatMarker {
    LegacyText,
    /// Pre-indexed binary encoding, with its version tag.
    LegacyBinary(u8),
    Indexed,
    Unified,
}

impl FormatMarker {
    /// Classify the tag byte following a binary sentinel.
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            b'c' | b'd' | b'v' => Some(FormatMarker::LegacyBinary(tag)),
            b'i' => Some(FormatMarker::Indexed),
            b'u' => Some(FormatMarker::Unified),
            _ => None,
        }
    }
}

/// Find the export data in an opened artifact and decode it.
///
/// `path` is the import path as requested, used in messages; `id` is the
/// canonical identity the package is registered under.
pub fn read_export_data<R: BufRead>(
    reader: &mut R,
    path: &str,
    id: &str,
    packages: &mut PackageRegistry,
    decoder: &mut dyn ExportDecoder,
) -> Result<PackageId, ImportError> {
    read_export_data_in(reader, path, id, packages, decoder, None)
}

/// [`read_export_data`] inside an import session, so the decoder can import
/// dependencies through [`DecodeContext::import`].
pub(crate) fn read_export_data_in<R: BufRead>(
    reader: &mut R,
    path: &str,
    id: &str,
    packages: &mut PackageRegistry,
    decoder: &mut dyn ExportDecoder,
    session: Option<Session<'_>>,
) -> Result<PackageId, ImportError> {
    let header = find_export_data(reader)?;
    let mut files = FileSet::new();
    let cx = DecodeContext {
        files: &mut files,
        packages,
        id,
        session,
    };
    dispatch(&header, reader, path, cx, decoder)
}

/// Route the data after `header` to the decoder for its encoding.
///
/// Decoder errors are returned unchanged.
#[tracing::instrument(level = "trace", skip(reader, cx, decoder), fields(id = cx.id))]
pub fn dispatch<R: BufRead>(
    header: &ExportHeader,
    reader: &mut R,
    path: &str,
    cx: DecodeContext<'_>,
    decoder: &mut dyn ExportDecoder,
) -> Result<PackageId, ImportError> {
    let marker = match header.line.as_str() {
        TEXT_SENTINEL => FormatMarker::LegacyText,
        BINARY_SENTINEL => {
            let mut tag = [0u8; 1];
            reader.read_exact(&mut tag)?;
            FormatMarker::from_tag(tag[0]).ok_or_else(|| ImportError::UnknownFormat {
                header: format!("{}{}", header.line, char::from(tag[0])),
            })?
        }
        other => {
            return Err(ImportError::UnknownFormat {
                header: other.to_owned(),
            })
        }
    };
    tracing::trace!(?marker, "dispatching export data");

    match marker {
        FormatMarker::LegacyText => Err(ImportError::ObsoleteFormat {
            path: path.to_owned(),
            format: RetiredFormat::Text,
        }),
        FormatMarker::LegacyBinary(_) => Err(ImportError::ObsoleteFormat {
            path: path.to_owned(),
            format: RetiredFormat::Binary,
        }),
        FormatMarker::Indexed => Ok(decoder.decode_indexed(cx, reader)?),
        FormatMarker::Unified => {
            // The tag byte came out of the declared length.
            let limit = header.size.map(|size| size.saturating_sub(1));
            let data = read_unified(reader, limit)?;
            Ok(decoder.decode_unified(cx, &data)?)
        }
    }
}

/// Read unified export data, at most `limit` bytes, minus the end marker.
fn read_unified<R: BufRead>(reader: &mut R, limit: Option<u64>) -> std::io::Result<Vec<u8>> {
    let mut data = Vec::new();
    match limit {
        Some(limit) => reader.by_ref().take(limit).read_to_end(&mut data)?,
        None => reader.read_to_end(&mut data)?,
    };

    match data
        .windows(END_MARKER.len())
        .rposition(|window| window == END_MARKER)
    {
        Some(end) => data.truncate(end),
        None => tracing::debug!(len = data.len(), "unified export data has no end marker"),
    }
    Ok(data)
}
