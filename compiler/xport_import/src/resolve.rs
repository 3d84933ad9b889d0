//! Import path resolution.
//!
//! Turns an import path into a canonical identity and, when an artifact
//! exists, its location on disk.
//!
//! | Import path | Identity | Location stem |
//! |---|---|---|
//! | `""` | none | none |
//! | `./x`, `../x`, `.`, `..` | `src_dir/x`, cleaned | same as identity |
//! | `/abs/x` | `/abs/x` | `/abs/x` |
//! | `x/y` | build context's import path | build context's object, minus `.a` |
//!
//! Given a stem, [`PACKAGE_EXTENSIONS`] are tried in order and the first
//! regular file wins. Archives therefore shadow individual objects with the
//! same stem, stale or not.

use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

use crate::context::BuildContext;

/// Artifact extensions, in preference order.
pub const PACKAGE_EXTENSIONS: [&str; 2] = ["a", "o"];

/// Outcome of resolving one import path.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Resolution {
    /// Canonical identity. Empty only for an empty import path.
    pub id: String,
    /// Artifact to read, or `None` when nothing was found.
    pub location: Option<PathBuf>,
}

impl Resolution {
    fn not_found(id: impl Into<String>) -> Self {
        Resolution {
            id: id.into(),
            location: None,
        }
    }
}

/// Whether `path` is written relative to the importing directory.
pub fn is_local_import(path: &str) -> bool {
    path == "." || path == ".." || path.starts_with("./") || path.starts_with("../")
}

/// Resolve `path`, imported from `src_dir`, to an identity and artifact.
pub fn find_package(ctx: &dyn BuildContext, path: &str, src_dir: &Path) -> Resolution {
    if path.is_empty() {
        return Resolution::not_found(String::new());
    }

    let (stem, id) = if is_local_import(path) {
        let stem = clean_join(src_dir, path);
        let id = stem.to_string_lossy().into_owned();
        (stem, id)
    } else if Path::new(path).is_absolute() {
        (PathBuf::from(path), path.to_owned())
    } else {
        let src_dir = std::path::absolute(src_dir).unwrap_or_else(|_| src_dir.to_path_buf());
        let Some(found) = ctx.find_object(path, &src_dir) else {
            tracing::trace!(path, "build context has no object");
            return Resolution::not_found(path);
        };
        (strip_archive_extension(found.object), found.import_path)
    };

    for ext in PACKAGE_EXTENSIONS {
        let candidate = append_extension(&stem, ext);
        if candidate.is_file() {
            tracing::trace!(path, %id, location = %candidate.display(), "resolved");
            return Resolution {
                id,
                location: Some(candidate),
            };
        }
    }

    tracing::trace!(path, %id, stem = %stem.display(), "no artifact for stem");
    Resolution::not_found(id)
}

/// `stem` with `.ext` appended. Unlike `Path::with_extension`, an existing
/// dot in the file name is kept.
pub(crate) fn append_extension(stem: &Path, ext: &str) -> PathBuf {
    let mut name = OsString::from(stem.as_os_str());
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}

fn strip_archive_extension(object: PathBuf) -> PathBuf {
    if object.extension().is_some_and(|ext| ext == "a") {
        object.with_extension("")
    } else {
        object
    }
}

/// Join `path` onto `base` and resolve `.` and `..` lexically.
///
/// `..` past the start of a relative path is kept rather than dropped.
fn clean_join(base: &Path, path: &str) -> PathBuf {
    let joined = base.join(path);
    let mut parts: Vec<Component<'_>> = Vec::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            _ => parts.push(component),
        }
    }

    if parts.is_empty() {
        return PathBuf::from(".");
    }
    parts.iter().collect()
}

#[cfg(test)]
mod tests;
