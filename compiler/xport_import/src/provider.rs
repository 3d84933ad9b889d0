//! Caller-supplied artifact sources.
//!
//! An importer built with a [`SourceProvider`] never touches the filesystem
//! resolver: the import path (after aliasing) is the canonical identity, and
//! the provider hands back the artifact bytes for it. Useful for in-memory
//! bundles, archives of archives, or anything else that is not a directory
//! tree of `.a` files.

use std::io::{self, Read};

/// Opens the artifact for an import path.
pub trait SourceProvider: Send {
    fn open(&mut self, path: &str) -> io::Result<Box<dyn Read>>;
}

impl<F> SourceProvider for F
where
    F: FnMut(&str) -> io::Result<Box<dyn Read>> + Send,
{
    fn open(&mut self, path: &str) -> io::Result<Box<dyn Read>> {
        self(path)
    }
}
