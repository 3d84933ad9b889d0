//! Importer façade.
//!
//! ```text
//! import_from(path, src_dir, mode)
//!   ├── alias map                    path -> mapped
//!   ├── "unsafe"                     -> built-in package
//!   ├── filesystem: find_package     mapped -> (id, location)
//!   │   provider:   id = mapped
//!   ├── registry                     complete or decoding -> reuse, no I/O
//!   ├── open artifact / provider stream
//!   └── read_export_data             scan -> dispatch -> decoder
//! ```
//!
//! The registry is the importer's cache. At most one full decode happens per
//! canonical identity: complete packages are returned straight away, and a
//! nested import of a package whose decode is still on the stack gets the
//! in-progress node. Failures are not cached, so asking again retries.
//!
//! Nested imports made by a decoder through
//! [`DecodeContext::import`](crate::DecodeContext::import) run the same
//! [`Session`] as the outer import, whichever source variant it uses.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use xport_graph::{PackageId, PackageRegistry, UNSAFE_PATH};

use crate::alias::AliasMap;
use crate::context::BuildContext;
use crate::decoder::ExportDecoder;
use crate::error::ImportError;
use crate::format::read_export_data_in;
use crate::provider::SourceProvider;
use crate::resolve::{find_package, Resolution};

/// Import mode flags. Only [`ImportMode::DEFAULT`] is supported.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct ImportMode(pub u32);

impl ImportMode {
    pub const DEFAULT: Self = Self(0);
}

/// Where artifacts come from. Fixed when the importer is built.
enum PackageSource {
    FileSystem(Box<dyn BuildContext>),
    Provider(Box<dyn SourceProvider>),
}

/// An import session: one package registry, one artifact source.
pub struct Importer {
    source: PackageSource,
    packages: PackageRegistry,
    alias: Option<AliasMap>,
    decoder: Box<dyn ExportDecoder>,
}

impl Importer {
    /// An importer resolving paths through `context` on the filesystem.
    pub fn new(
        context: impl BuildContext + 'static,
        alias: Option<AliasMap>,
        decoder: impl ExportDecoder + 'static,
    ) -> Self {
        Importer {
            source: PackageSource::FileSystem(Box::new(context)),
            packages: PackageRegistry::new(),
            alias,
            decoder: Box::new(decoder),
        }
    }

    /// An importer that asks `provider` for artifacts instead of resolving
    /// paths on disk.
    pub fn with_provider(
        provider: impl SourceProvider + 'static,
        alias: Option<AliasMap>,
        decoder: impl ExportDecoder + 'static,
    ) -> Self {
        Importer {
            source: PackageSource::Provider(Box::new(provider)),
            packages: PackageRegistry::new(),
            alias,
            decoder: Box::new(decoder),
        }
    }

    /// Packages imported (or referenced) so far.
    pub fn packages(&self) -> &PackageRegistry {
        &self.packages
    }

    pub fn packages_mut(&mut self) -> &mut PackageRegistry {
        &mut self.packages
    }

    fn map_path<'a>(&'a self, path: &'a str) -> &'a str {
        match &self.alias {
            Some(alias) => alias.map(path),
            None => path,
        }
    }

    /// Import `path` with no source directory.
    pub fn import(&mut self, path: &str) -> Result<PackageId, ImportError> {
        let result = self.import_from(path, Path::new(""), ImportMode::DEFAULT);
        if let Err(err) = &result {
            tracing::warn!("import {path:?}: {err}");
        }
        result
    }

    /// Import `path` as seen from `src_dir`.
    ///
    /// # Panics
    ///
    /// If `mode` is not [`ImportMode::DEFAULT`]. Passing another mode is a
    /// bug in the caller, not a condition to recover from.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn import_from(
        &mut self,
        path: &str,
        src_dir: &Path,
        mode: ImportMode,
    ) -> Result<PackageId, ImportError> {
        assert!(mode == ImportMode::DEFAULT, "mode must be 0, got {}", mode.0);

        let mapped = self.map_path(path).to_owned();
        let mut session = Session {
            source: match &mut self.source {
                PackageSource::FileSystem(context) => SessionSource::FileSystem(&**context),
                PackageSource::Provider(provider) => SessionSource::Provider(&mut **provider),
            },
            alias: self.alias.as_ref(),
            src_dir,
        };
        let result = session.import(&mut self.packages, &mut *self.decoder, path);

        match &result {
            Ok(id) => tracing::debug!(
                %mapped,
                package = self.packages.get(*id).name(),
                "imported"
            ),
            Err(err) => tracing::warn!("import_from {path:?}({mapped:?}), {src_dir:?}: {err}"),
        }
        result
    }
}

/// Import `path` from the filesystem into a caller-owned registry.
///
/// This is the whole resolution pipeline without a session around it: no
/// alias map, and `context` stands in for the importer's build context.
/// Decoders importing dependencies should use
/// [`DecodeContext::import`](crate::DecodeContext::import) instead, which
/// keeps the session they were called from.
pub fn import_package(
    context: &dyn BuildContext,
    decoder: &mut dyn ExportDecoder,
    packages: &mut PackageRegistry,
    path: &str,
    src_dir: &Path,
) -> Result<PackageId, ImportError> {
    let mut session = Session {
        source: SessionSource::FileSystem(context),
        alias: None,
        src_dir,
    };
    session.import(packages, decoder, path)
}

/// Borrowed view of an import session: where artifacts come from, the alias
/// map and the source directory. Outer and nested imports share one.
pub(crate) struct Session<'s> {
    source: SessionSource<'s>,
    alias: Option<&'s AliasMap>,
    src_dir: &'s Path,
}

enum SessionSource<'s> {
    FileSystem(&'s dyn BuildContext),
    Provider(&'s mut (dyn SourceProvider + 'static)),
}

/// Where an opened artifact came from, for error messages.
enum Origin {
    File(PathBuf),
    Source(String),
}

impl Origin {
    fn annotate(&self, err: ImportError) -> ImportError {
        match self {
            Origin::File(location) => err.in_file(location),
            Origin::Source(id) => err.in_source(id),
        }
    }
}

impl Session<'_> {
    fn reborrow(&mut self) -> Session<'_> {
        Session {
            source: match &mut self.source {
                SessionSource::FileSystem(context) => SessionSource::FileSystem(*context),
                SessionSource::Provider(provider) => SessionSource::Provider(&mut **provider),
            },
            alias: self.alias,
            src_dir: self.src_dir,
        }
    }

    /// Map, resolve, reuse or decode `path`.
    pub(crate) fn import(
        &mut self,
        packages: &mut PackageRegistry,
        decoder: &mut dyn ExportDecoder,
        path: &str,
    ) -> Result<PackageId, ImportError> {
        let mapped = match self.alias {
            Some(alias) => alias.map(path),
            None => path,
        };
        if mapped == UNSAFE_PATH {
            return Ok(PackageId::UNSAFE);
        }

        let (id, origin, stream): (String, Origin, Box<dyn Read>) = match &mut self.source {
            SessionSource::FileSystem(context) => {
                let Resolution { id, location } = find_package(*context, mapped, self.src_dir);
                let Some(location) = location else {
                    return Err(ImportError::NotFound { id });
                };
                if let Some(pkg) = reuse(packages, &id) {
                    return Ok(pkg);
                }
                let file = File::open(&location)
                    .map_err(|err| ImportError::from(err).in_file(&location))?;
                (id, Origin::File(location), Box::new(file))
            }
            SessionSource::Provider(provider) => {
                if let Some(pkg) = reuse(packages, mapped) {
                    return Ok(pkg);
                }
                let stream = provider
                    .open(mapped)
                    .map_err(|err| ImportError::from(err).in_source(mapped))?;
                (mapped.to_owned(), Origin::Source(mapped.to_owned()), stream)
            }
        };

        let mut reader = BufReader::new(stream);
        let nested = self.reborrow();
        decode_tracked(packages, &id, |packages| {
            read_export_data_in(&mut reader, mapped, &id, packages, decoder, Some(nested))
        })
        .map_err(|err| origin.annotate(err))
    }
}

/// A registered package that must not be decoded again, if any.
fn reuse(packages: &PackageRegistry, id: &str) -> Option<PackageId> {
    let pkg = packages.lookup(id)?;
    if packages.is_complete(pkg) {
        tracing::trace!(id, "already imported");
        return Some(pkg);
    }
    if packages.is_decoding(pkg) {
        tracing::trace!(id, "import cycle, using in-progress package");
        return Some(pkg);
    }
    None
}

/// Clears the decoding marker of `pkg` however the decode ends, unwinding
/// included.
struct DecodeGuard<'r> {
    packages: &'r mut PackageRegistry,
    pkg: PackageId,
}

impl DecodeGuard<'_> {
    fn packages(&mut self) -> &mut PackageRegistry {
        self.packages
    }
}

impl Drop for DecodeGuard<'_> {
    fn drop(&mut self) {
        self.packages.end_decode(self.pkg);
    }
}

/// Run `decode` with the node for `id` marked as being decoded.
fn decode_tracked(
    packages: &mut PackageRegistry,
    id: &str,
    decode: impl FnOnce(&mut PackageRegistry) -> Result<PackageId, ImportError>,
) -> Result<PackageId, ImportError> {
    let pkg = packages.register(id, "");
    packages.begin_decode(pkg);
    let mut guard = DecodeGuard { packages, pkg };
    let result = decode(guard.packages());

    if let Ok(decoded) = &result {
        if !guard.packages().is_complete(*decoded) {
            tracing::warn!(id, "decoder returned a package that is not marked complete");
        }
    }
    result
}
