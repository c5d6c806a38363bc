//! Mapping between a container's concatenated text and its text leaves.
//!
//! Two sources implement the same contract:
//! - [`StaticTreeSource`] for immutable render trees, with cached cumulative
//!   offsets and `O(log n)` lookups.
//! - [`LiveDomSource`] for a host-owned live document that may change between
//!   calls, so every query re-walks it.

pub mod live;
pub mod static_tree;

use std::fmt::Debug;

pub use live::{LiveDocument, LiveDomSource};
pub use static_tree::{LeafRef, StaticTreeSource};

/// A point inside one text leaf: the leaf plus a char offset within it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LeafPoint<L> {
    pub leaf: L,
    pub offset: usize,
}

impl<L> LeafPoint<L> {
    pub fn new(leaf: L, offset: usize) -> Self {
        Self { leaf, offset }
    }
}

pub trait TextOffsetIndex {
    type Leaf: Clone + PartialEq + Debug;

    /// Length of the concatenated text, in chars.
    fn total_len(&self) -> usize;

    /// Whether `leaf` belongs to the indexed tree.
    fn contains(&self, leaf: &Self::Leaf) -> bool;

    /// Sum of the lengths of all leaves before `leaf`, plus `intra`.
    ///
    /// `None` when `leaf` is not part of the tree or `intra` runs past its end.
    /// Callers are expected to only pass leaves they got from this container;
    /// anything else is a bug in the caller.
    fn offset_of(&self, leaf: &Self::Leaf, intra: usize) -> Option<usize>;

    /// The leaf whose range contains `offset`.
    ///
    /// `offset == total_len()` gives the last leaf at its own length. `None`
    /// for an offset past the end (a stale range) or a container with no text
    /// leaves.
    fn locate(&self, offset: usize) -> Option<LeafPoint<Self::Leaf>>;
}

/// Linear scan over `(leaf, len)` pairs, shared by sources that do not cache.
pub(crate) fn locate_linear<L: Clone>(
    leaves: impl IntoIterator<Item = (L, usize)>,
    offset: usize,
) -> Option<LeafPoint<L>> {
    let mut cursor = 0;
    let mut last = None;
    for (leaf, len) in leaves {
        if cursor + len > offset {
            return Some(LeafPoint::new(leaf, offset - cursor));
        }
        cursor += len;
        last = Some((leaf, len));
    }
    match last {
        Some((leaf, len)) if offset == cursor => Some(LeafPoint::new(leaf, len)),
        _ => None,
    }
}
