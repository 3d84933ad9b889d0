//! Import path aliases.
//!
//! Lets callers redirect an import path to another one before resolution,
//! e.g. when a package moved to a new path but old export data still names
//! the old one.

use rustc_hash::FxHashMap;

/// Mapping from import path to substitute import path.
#[derive(Clone, Debug, Default)]
pub struct AliasMap {
    map: FxHashMap<String, String>,
}

impl AliasMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// The substitute for `path`, or `path` itself when none is registered.
    pub fn map<'a>(&'a self, path: &'a str) -> &'a str {
        self.map.get(path).map_or(path, String::as_str)
    }

    /// Register `from -> to`, replacing any earlier mapping for `from`.
    pub fn add(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.map.insert(from.into(), to.into());
    }
}
