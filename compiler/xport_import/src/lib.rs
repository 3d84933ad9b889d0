//! Package importer for compiled export data.
//!
//! Resolves import paths to compiled artifacts, finds the export data inside
//! them, works out which of several incompatible encodings it uses, and hands
//! it to the matching decoder. Decoded packages land in a session-wide
//! [`PackageRegistry`] so each package is decoded at most once.
//!
//! # Architecture
//!
//! ```text
//! Importer::import_from(path, src_dir, mode)
//!   ├── AliasMap          path -> mapped path
//!   ├── find_package      BuildContext + extensions -> (id, artifact)
//!   │   or SourceProvider mapped path -> (id, stream)
//!   ├── PackageRegistry   complete / in-progress -> reuse
//!   ├── find_export_data  skip object header, find sentinel
//!   └── dispatch          sentinel + tag -> ExportDecoder
//! ```
//!
//! Decoders themselves live outside this crate; [`ExportDecoder`] is the
//! contract they implement.
//!
//! # Logging
//!
//! Import failures are logged at `warn`, successes at `debug`, cache hits and
//! format decisions at `trace`. Logging is for diagnostics only; every
//! failure is also returned as an [`ImportError`].

mod alias;
mod context;
mod decoder;
mod error;
mod format;
mod importer;
mod provider;
mod resolve;
mod scan;
mod shared;

pub use alias::AliasMap;
pub use context::{BuildContext, FoundObject, SearchPath, SEARCH_PATH_VAR};
pub use decoder::{DecodeContext, ExportDecoder};
pub use error::{DecodeError, ImportError, ImportErrorKind, RetiredFormat, ScanError};
pub use format::{
    dispatch, read_export_data, FormatMarker, BINARY_SENTINEL, END_MARKER, TEXT_SENTINEL,
};
pub use importer::{import_package, ImportMode, Importer};
pub use provider::SourceProvider;
pub use resolve::{find_package, is_local_import, Resolution, PACKAGE_EXTENSIONS};
pub use scan::{
    find_export_data, ExportHeader, ARCHIVE_MAGIC, OBJECT_HEADER_PREFIX, PACKAGE_DEF_MEMBER,
};
pub use shared::SharedImporter;

pub use xport_graph::{
    DeclKind, Declaration, FileSet, Package, PackageId, PackageRegistry, Position, UNSAFE_PATH,
};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install a `fmt` subscriber filtered by `RUST_LOG`, for tools and tests
/// built on this crate.
///
/// Does nothing when `RUST_LOG` is unset or unparsable, or when the process
/// already has a global subscriber. Repeated calls are no-ops.
/// Enable with `RUST_LOG=xport_import=debug` or `RUST_LOG=xport_import=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let Ok(filter) = EnvFilter::try_from_default_env() else {
            return;
        };
        if let Err(err) = tracing_subscriber::registry()
            .with(fmt::layer().with_target(true))
            .with(filter)
            .try_init()
        {
            tracing::debug!("keeping existing subscriber: {err}");
        }
    });
}
