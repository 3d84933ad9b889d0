//! Import error taxonomy.
//!
//! Every failure the importer can produce is an [`ImportError`]. Errors raised
//! while reading an artifact are wrapped in [`ImportError::InFile`] (filesystem)
//! or [`ImportError::InSource`] (source provider) so the message always names
//! where the data came from; [`ImportError::kind`] looks through both wrappers
//! for programmatic matching.
//!
//! Passing an unsupported import mode is not represented here: it is a caller
//! bug and panics.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Retired export data encodings that are recognised only to reject them.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RetiredFormat {
    /// `$$` textual export data.
    Text,
    /// `$$B` binary export data with a `c`, `d` or `v` version tag.
    Binary,
}

impl fmt::Display for RetiredFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetiredFormat::Text => f.write_str("old export format"),
            RetiredFormat::Binary => f.write_str("old binary export format"),
        }
    }
}

/// Failure to locate the export data inside an artifact.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("reading export data: {0}")]
    Io(#[from] io::Error),
    #[error("unexpected end of file before export data")]
    UnexpectedEof,
    #[error("malformed archive member header")]
    BadArchiveHeader,
    #[error("archive is missing __.PKGDEF")]
    MissingPackageDef,
    #[error("not an object file")]
    NotObjectFile,
}

/// Failure reported by an export data decoder.
///
/// The importer never inspects these; they are passed through verbatim.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct DecodeError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl DecodeError {
    #[cold]
    pub fn new(message: impl Into<String>) -> Self {
        DecodeError {
            message: message.into(),
            source: None,
        }
    }

    #[cold]
    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        DecodeError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<io::Error> for DecodeError {
    fn from(err: io::Error) -> Self {
        DecodeError::with_source(err.to_string(), err)
    }
}

/// Structured category of an [`ImportError`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ImportErrorKind {
    NotFound,
    ObsoleteFormat,
    UnknownFormat,
    MissingExportData,
    Io,
    Decode,
}

/// An error encountered while importing a package.
#[derive(Debug, Error)]
pub enum ImportError {
    /// No artifact exists for the path. `id` is the identity the resolver got
    /// as far as computing, for the message.
    #[error("can't find import: {id:?}")]
    NotFound { id: String },

    #[error("import {path:?}: {format} no longer supported (recompile library)")]
    ObsoleteFormat { path: String, format: RetiredFormat },

    #[error("unknown export data header: {header:?}")]
    UnknownFormat { header: String },

    #[error(transparent)]
    MissingExportData(#[from] ScanError),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Any of the above, raised while reading `location`.
    #[error("{}: {}", .location.display(), .source)]
    InFile {
        location: PathBuf,
        source: Box<ImportError>,
    },

    /// Any of the above, raised while reading the stream a source provider
    /// returned for `id`.
    #[error("{id}: {source}")]
    InSource { id: String, source: Box<ImportError> },
}

impl ImportError {
    /// Prefix this error with the artifact it was raised for.
    #[cold]
    pub fn in_file(self, location: &Path) -> Self {
        ImportError::InFile {
            location: location.to_path_buf(),
            source: Box::new(self),
        }
    }

    /// Prefix this error with the provider identity it was raised for.
    #[cold]
    pub fn in_source(self, id: &str) -> Self {
        ImportError::InSource {
            id: id.to_owned(),
            source: Box::new(self),
        }
    }

    pub fn kind(&self) -> ImportErrorKind {
        match self {
            ImportError::NotFound { .. } => ImportErrorKind::NotFound,
            ImportError::ObsoleteFormat { .. } => ImportErrorKind::ObsoleteFormat,
            ImportError::UnknownFormat { .. } => ImportErrorKind::UnknownFormat,
            ImportError::MissingExportData(_) => ImportErrorKind::MissingExportData,
            ImportError::Io(_) => ImportErrorKind::Io,
            ImportError::Decode(_) => ImportErrorKind::Decode,
            ImportError::InFile { source, .. } | ImportError::InSource { source, .. } => {
                source.kind()
            }
        }
    }

    /// The filesystem artifact this error was annotated with, if any.
    ///
    /// Provider-backed imports have no file; see [`ImportError::source_id`].
    pub fn location(&self) -> Option<&Path> {
        match self {
            ImportError::InFile { location, .. } => Some(location),
            _ => None,
        }
    }

    /// The provider identity this error was annotated with, if any.
    pub fn source_id(&self) -> Option<&str> {
        match self {
            ImportError::InSource { id, .. } => Some(id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests;
