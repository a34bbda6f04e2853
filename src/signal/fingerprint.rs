//! Fingerprint: opaque identity of the panel content.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Identity of the current panel content. `None` means the panel is empty.
pub type ContentIdentity = Option<Fingerprint>;

/// Opaque content fingerprint, only ever compared for equality.
///
/// `Opaque` stands for a fingerprint the source could not compute. It
/// compares unequal to everything, itself included, so an update carrying
/// one always counts as "content changed".
#[derive(Debug, Clone, Copy)]
pub enum Fingerprint {
    /// A hash of the content.
    Hash(u64),
    /// An uncomparable fingerprint.
    Opaque,
}

impl Fingerprint {
    /// Create a fingerprint from a precomputed hash.
    #[inline]
    pub const fn from_hash(hash: u64) -> Self {
        Self::Hash(hash)
    }

    /// Fingerprint any hashable content.
    pub fn of<T: Hash + ?Sized>(content: &T) -> Self {
        let mut hasher = DefaultHasher::new();
        content.hash(&mut hasher);
        Self::Hash(hasher.finish())
    }

    /// Whether two identities (either possibly absent) differ.
    pub fn changed(previous: &ContentIdentity, next: &ContentIdentity) -> bool {
        match (previous, next) {
            (None, None) => false,
            (Some(a), Some(b)) => a != b,
            _ => true,
        }
    }
}

impl PartialEq for Fingerprint {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Hash(a), Self::Hash(b)) => a == b,
            _ => false,
        }
    }
}
