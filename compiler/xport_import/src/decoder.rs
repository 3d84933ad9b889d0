//! Contract for export data decoders.
//!
//! The importer only finds export data and works out which encoding it uses;
//! turning the bytes into a package graph is up to an [`ExportDecoder`].
//!
//! A decoder must:
//!
//! - register the package it decodes under `cx.id` with
//!   [`PackageRegistry::register`], along with every package it references;
//! - reuse whatever node `register` returns, complete or not, so cyclic
//!   imports resolve to the node already being built;
//! - call [`PackageRegistry::mark_complete`] on the decoded package only once
//!   all its exported declarations are in place.
//!
//! A decoder that wants a dependency fully imported, rather than just
//! registered, goes back through [`DecodeContext::import`].

use std::io::BufRead;

use xport_graph::{FileSet, PackageId, PackageRegistry};

use crate::error::{DecodeError, ImportError};
use crate::importer::Session;

/// Shared state handed to a decoder for one import.
pub struct DecodeContext<'a> {
    /// Position table for this import call.
    pub files: &'a mut FileSet,
    /// Session package registry.
    pub packages: &'a mut PackageRegistry,
    /// Canonical identity of the package being decoded.
    pub id: &'a str,
    pub(crate) session: Option<Session<'a>>,
}

impl DecodeContext<'_> {
    /// Import `path` through the same pipeline as the import being decoded:
    /// same alias map, same build context or source provider, same registry.
    ///
    /// A package whose decode is already on the stack comes back as its
    /// in-progress node, so cyclic imports terminate. Export data read with
    /// [`read_export_data`](crate::read_export_data) outside an importer has
    /// nothing to resolve against, and every path is reported as not found.
    pub fn import(
        &mut self,
        decoder: &mut dyn ExportDecoder,
        path: &str,
    ) -> Result<PackageId, ImportError> {
        match &mut self.session {
            Some(session) => session.import(self.packages, decoder, path),
            None => Err(ImportError::NotFound {
                id: path.to_owned(),
            }),
        }
    }
}

/// Decoders for the supported export data encodings.
pub trait ExportDecoder: Send {
    /// Decode indexed (`i`) export data, reading `input` incrementally.
    fn decode_indexed(
        &mut self,
        cx: DecodeContext<'_>,
        input: &mut dyn BufRead,
    ) -> Result<PackageId, DecodeError>;

    /// Decode unified (`u`) export data. `input` excludes the end marker.
    fn decode_unified(
        &mut self,
        cx: DecodeContext<'_>,
        input: &[u8],
    ) -> Result<PackageId, DecodeError>;
}
