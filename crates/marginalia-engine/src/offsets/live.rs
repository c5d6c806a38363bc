use std::fmt::Debug;

use super::{LeafPoint, TextOffsetIndex, locate_linear};

/// A host-owned document whose text leaves can be enumerated on demand.
///
/// Implementations return leaves in document order. Leaf handles must stay
/// comparable for as long as the node is attached.
pub trait LiveDocument {
    type Node: Clone + PartialEq + Debug;

    fn text_leaves(&self, root: &Self::Node) -> Vec<Self::Node>;

    fn text_len(&self, leaf: &Self::Node) -> usize;
}

/// Offset index over a live document.
///
/// Nothing is cached: the document may have changed since the last query,
/// so each call walks the subtree under `root` again.
pub struct LiveDomSource<'d, D: LiveDocument> {
    doc: &'d D,
    root: D::Node,
}

impl<'d, D: LiveDocument> LiveDomSource<'d, D> {
    pub fn new(doc: &'d D, root: D::Node) -> Self {
        Self { doc, root }
    }

    pub fn root(&self) -> &D::Node {
        &self.root
    }

    fn leaves_with_len(&self) -> impl Iterator<Item = (D::Node, usize)> + '_ {
        self.doc
            .text_leaves(&self.root)
            .into_iter()
            .map(|leaf| {
                let len = self.doc.text_len(&leaf);
                (leaf, len)
            })
    }
}

impl<D: LiveDocument> TextOffsetIndex for LiveDomSource<'_, D> {
    type Leaf = D::Node;

    fn total_len(&self) -> usize {
        self.leaves_with_len().map(|(_, len)| len).sum()
    }

    fn contains(&self, leaf: &D::Node) -> bool {
        self.doc.text_leaves(&self.root).contains(leaf)
    }

    fn offset_of(&self, leaf: &D::Node, intra: usize) -> Option<usize> {
        let mut cursor = 0;
        for (candidate, len) in self.leaves_with_len() {
            if &candidate == leaf {
                return (intra <= len).then_some(cursor + intra);
            }
            cursor += len;
        }
        None
    }

    fn locate(&self, offset: usize) -> Option<LeafPoint<D::Node>> {
        locate_linear(self.leaves_with_len(), offset)
    }
}
