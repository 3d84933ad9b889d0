//! Build contexts: where search-path imports live on disk.
//!
//! A [`BuildContext`] answers one question for the resolver: given a
//! search-path import like `net/http`, where would its compiled object be?
//! It does not need source files to exist, and it may report an object path
//! that does not exist yet; the resolver probes extensions afterwards.
//!
//! [`SearchPath`] is the default context. Tests and embedders can pass any
//! closure of the right shape instead.

use std::env;
use std::path::{Path, PathBuf};

use crate::resolve::{append_extension, PACKAGE_EXTENSIONS};

/// Environment variable holding the default search path, in the platform's
/// path-list syntax.
pub const SEARCH_PATH_VAR: &str = "XPORT_PATH";

/// A compiled object located by a [`BuildContext`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FoundObject {
    /// Canonical import path of the package.
    pub import_path: String,
    /// Object file path, conventionally ending in `.a`.
    pub object: PathBuf,
}

/// Maps search-path imports to compiled object locations.
pub trait BuildContext: Send {
    /// Locate the compiled object for `path`, imported from `src_dir`.
    ///
    /// Returns `None` when the context has no object for the path at all.
    fn find_object(&self, path: &str, src_dir: &Path) -> Option<FoundObject>;
}

impl<F> BuildContext for F
where
    F: Fn(&str, &Path) -> Option<FoundObject> + Send,
{
    fn find_object(&self, path: &str, src_dir: &Path) -> Option<FoundObject> {
        self(path, src_dir)
    }
}

/// Ordered list of package roots.
///
/// `x/y` maps to `<root>/x/y.a` in the first root holding any artifact for
/// it, falling back to the first root so the caller still gets a location
/// to report.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SearchPath {
    roots: Vec<PathBuf>,
}

impl SearchPath {
    pub fn new(roots: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        SearchPath {
            roots: roots.into_iter().map(Into::into).collect(),
        }
    }

    /// Read roots from [`SEARCH_PATH_VAR`]. Unset means no roots.
    pub fn from_env() -> Self {
        let roots = env::var_os(SEARCH_PATH_VAR)
            .map(|value| {
                env::split_paths(&value)
                    .filter(|root| !root.as_os_str().is_empty())
                    .collect()
            })
            .unwrap_or_default();
        tracing::debug!(?roots, "search path from {SEARCH_PATH_VAR}");
        SearchPath { roots }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    fn has_artifact(root: &Path, path: &str) -> bool {
        let stem = root.join(path);
        PACKAGE_EXTENSIONS
            .iter()
            .any(|ext| append_extension(&stem, ext).is_file())
    }
}

impl BuildContext for SearchPath {
    fn find_object(&self, path: &str, _src_dir: &Path) -> Option<FoundObject> {
        let root = self
            .roots
            .iter()
            .find(|root| Self::has_artifact(root, path))
            .or_else(|| self.roots.first())?;

        Some(FoundObject {
            import_path: path.to_owned(),
            object: append_extension(&root.join(path), "a"),
        })
    }
}
