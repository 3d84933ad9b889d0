//! Package handle.

use std::fmt;

/// A 32-bit index into the package registry.
///
/// Two handles are equal exactly when they name the same package node, so
/// handle equality is package identity within one registry.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct PackageId(u32);

impl PackageId {
    /// The built-in `unsafe` package. Pre-registered in every registry.
    pub const UNSAFE: Self = Self(0);

    /// First index handed out for decoded packages.
    pub const FIRST_DYNAMIC: u32 = 1;

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_builtin(self) -> bool {
        self.0 < Self::FIRST_DYNAMIC
    }

    #[inline]
    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::UNSAFE {
            write!(f, "PackageId(unsafe)")
        } else {
            write!(f, "PackageId({})", self.0)
        }
    }
}
