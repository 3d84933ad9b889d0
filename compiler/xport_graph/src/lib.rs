//! Package graph for imported export data.
//!
//! Decoded packages reference each other freely, including in cycles
//! (two packages re-exporting each other's types). Nodes are therefore
//! never owned by one another: every package lives in a single
//! [`PackageRegistry`] arena keyed by its canonical identity, and edges
//! are [`PackageId`] handles into that arena.
//!
//! # Lifecycle
//!
//! ```text
//! register(path)      -> in-progress node, visible to nested decodes
//! get_mut(id)...      -> decoder fills in name, declarations, imports
//! mark_complete(id)   -> node is final; importers stop re-decoding it
//! ```
//!
//! Nodes are never removed. They live as long as the registry, which lives
//! as long as the importer session that owns it.

mod file_set;
mod id;
mod package;
mod registry;

pub use file_set::{FileSet, Position};
pub use id::PackageId;
pub use package::{DeclKind, Declaration, Package};
pub use registry::{PackageRegistry, UNSAFE_PATH};
