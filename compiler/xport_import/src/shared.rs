//! Importer shared between threads.
//!
//! "Check the registry, decode, insert" is not atomic on its own. Two threads
//! running it for the same identity would both decode, or one would see the
//! other's half-built node. [`SharedImporter`] holds one lock for the whole
//! sequence, so imports from different threads are serialized.

use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use xport_graph::{PackageId, PackageRegistry};

use crate::error::ImportError;
use crate::importer::{ImportMode, Importer};

/// Cloneable, lock-guarded handle to an [`Importer`].
#[derive(Clone)]
pub struct SharedImporter {
    inner: Arc<Mutex<Importer>>,
}

impl SharedImporter {
    pub fn new(importer: Importer) -> Self {
        SharedImporter {
            inner: Arc::new(Mutex::new(importer)),
        }
    }

    pub fn import(&self, path: &str) -> Result<PackageId, ImportError> {
        self.inner.lock().import(path)
    }

    pub fn import_from(
        &self,
        path: &str,
        src_dir: &Path,
        mode: ImportMode,
    ) -> Result<PackageId, ImportError> {
        self.inner.lock().import_from(path, src_dir, mode)
    }

    /// Run `f` against the registry while holding the lock.
    pub fn with_packages<R>(&self, f: impl FnOnce(&PackageRegistry) -> R) -> R {
        f(self.inner.lock().packages())
    }
}

impl From<Importer> for SharedImporter {
    fn from(importer: Importer) -> Self {
        SharedImporter::new(importer)
    }
}
