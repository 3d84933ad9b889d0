//! Package nodes and their exported declarations.

use std::collections::BTreeMap;

use crate::PackageId;

/// What kind of object an exported declaration names.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum DeclKind {
    Const,
    Type,
    Var,
    Func,
}

/// One exported declaration of a package.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Declaration {
    pub name: String,
    pub kind: DeclKind,
    /// Package the declaration was re-exported from, if not declared locally.
    pub origin: Option<PackageId>,
}

impl Declaration {
    pub fn new(name: impl Into<String>, kind: DeclKind) -> Self {
        Declaration {
            name: name.into(),
            kind,
            origin: None,
        }
    }

    /// A declaration that refers to an object owned by another package.
    pub fn reexport(name: impl Into<String>, kind: DeclKind, origin: PackageId) -> Self {
        Declaration {
            name: name.into(),
            kind,
            origin: Some(origin),
        }
    }
}

/// A decoded (or in-progress) package node.
///
/// Only the decode call that registered a node mutates it. Once
/// [`Package::is_complete`] is true the node is final.
#[derive(Clone, Debug)]
pub struct Package {
    path: String,
    name: String,
    complete: bool,
    scope: BTreeMap<String, Declaration>,
    imports: Vec<PackageId>,
}

impl Package {
    pub(crate) fn new(path: String, name: String) -> Self {
        Package {
            path,
            name,
            complete: false,
            scope: BTreeMap::new(),
            imports: Vec::new(),
        }
    }

    /// Canonical identity this package was registered under.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Package name. Empty while a referenced package has not been decoded yet.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub(crate) fn set_complete(&mut self) {
        self.complete = true;
    }

    /// Add an exported declaration. A later declaration with the same name
    /// replaces the earlier one.
    pub fn declare(&mut self, decl: Declaration) {
        self.scope.insert(decl.name.clone(), decl);
    }

    pub fn lookup(&self, name: &str) -> Option<&Declaration> {
        self.scope.get(name)
    }

    /// Exported declarations in name order.
    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.scope.values()
    }

    /// Record `id` as imported by this package. Duplicates are ignored.
    pub fn add_import(&mut self, id: PackageId) {
        if !self.imports.contains(&id) {
            self.imports.push(id);
        }
    }

    /// Imported packages in the order they were recorded.
    pub fn imports(&self) -> &[PackageId] {
        &self.imports
    }
}
