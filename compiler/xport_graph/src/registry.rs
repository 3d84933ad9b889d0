//! Session-wide package registry.
//!
//! The registry is the cache the importer consults before decoding and the
//! shared table decoders register referenced packages into. Every canonical
//! identity maps to exactly one [`PackageId`] for the registry's lifetime.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::{DeclKind, Declaration, Package, PackageId};

/// Canonical identity of the built-in `unsafe` package.
pub const UNSAFE_PATH: &str = "unsafe";

/// Arena of package nodes indexed by canonical identity.
#[derive(Clone, Debug)]
pub struct PackageRegistry {
    packages: Vec<Package>,
    by_path: FxHashMap<String, PackageId>,
    /// Nodes whose decode call is still on the stack.
    decoding: FxHashSet<PackageId>,
}

impl PackageRegistry {
    /// Create a registry holding only the built-in `unsafe` package.
    pub fn new() -> Self {
        let mut registry = PackageRegistry {
            packages: Vec::new(),
            by_path: FxHashMap::default(),
            decoding: FxHashSet::default(),
        };
        let id = registry.register(UNSAFE_PATH, UNSAFE_PATH);
        debug_assert_eq!(id, PackageId::UNSAFE);
        let unsafe_pkg = registry.get_mut(id);
        unsafe_pkg.declare(Declaration::new("Alignof", DeclKind::Func));
        unsafe_pkg.declare(Declaration::new("Offsetof", DeclKind::Func));
        unsafe_pkg.declare(Declaration::new("Pointer", DeclKind::Type));
        unsafe_pkg.declare(Declaration::new("Sizeof", DeclKind::Func));
        registry.mark_complete(id);
        registry
    }

    /// Look up a package by canonical identity, complete or not.
    pub fn lookup(&self, path: &str) -> Option<PackageId> {
        self.by_path.get(path).copied()
    }

    /// Look up a package by canonical identity, only if it is fully decoded.
    pub fn lookup_complete(&self, path: &str) -> Option<PackageId> {
        self.lookup(path).filter(|&id| self.is_complete(id))
    }

    /// Get or create the node for `path`.
    ///
    /// An existing node is returned as-is, whether complete or still being
    /// decoded further up the stack. This is what lets mutually importing
    /// packages resolve each other without recursing. If the existing node
    /// has no name yet and `name` is non-empty, the name is filled in.
    pub fn register(&mut self, path: &str, name: &str) -> PackageId {
        if let Some(id) = self.lookup(path) {
            let pkg = self.get_mut(id);
            if pkg.name().is_empty() && !name.is_empty() {
                pkg.set_name(name);
            }
            return id;
        }

        let raw = u32::try_from(self.packages.len()).unwrap_or(u32::MAX);
        let id = PackageId::from_raw(raw);
        self.packages
            .push(Package::new(path.to_owned(), name.to_owned()));
        self.by_path.insert(path.to_owned(), id);
        id
    }

    #[inline]
    pub fn get(&self, id: PackageId) -> &Package {
        &self.packages[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: PackageId) -> &mut Package {
        &mut self.packages[id.index()]
    }

    pub fn is_complete(&self, id: PackageId) -> bool {
        self.get(id).is_complete()
    }

    /// Mark a node as fully decoded. Idempotent.
    pub fn mark_complete(&mut self, id: PackageId) {
        self.get_mut(id).set_complete();
    }

    /// Record that a decode of `id` has started. Returns false if one was
    /// already running.
    pub fn begin_decode(&mut self, id: PackageId) -> bool {
        self.decoding.insert(id)
    }

    pub fn end_decode(&mut self, id: PackageId) {
        self.decoding.remove(&id);
    }

    /// Whether a decode of `id` is in progress further up the stack.
    ///
    /// Such a node must be handed out as-is to a nested import of the same
    /// identity; decoding it again would recurse forever on cyclic imports.
    pub fn is_decoding(&self, id: PackageId) -> bool {
        self.decoding.contains(&id)
    }

    /// Imports of `id`, sorted by canonical identity.
    pub fn imports_by_path(&self, id: PackageId) -> Vec<PackageId> {
        let mut imports = self.get(id).imports().to_vec();
        imports.sort_by(|&a, &b| self.get(a).path().cmp(self.get(b).path()));
        imports
    }

    /// Number of registered nodes, including the built-in `unsafe` package.
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Always false: the built-in package is present from construction.
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// All nodes in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (PackageId, &Package)> {
        (0u32..)
            .map(PackageId::from_raw)
            .zip(self.packages.iter())
    }
}

impl Default for PackageRegistry {
    fn default() -> Self {
        Self::new()
    }
}
