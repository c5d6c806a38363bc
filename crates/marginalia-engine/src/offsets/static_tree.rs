use std::collections::HashMap;

use super::{LeafPoint, TextOffsetIndex};
use crate::content::NodePath;
use crate::content::tree::{RenderNode, char_len};
use crate::models::ContainerId;

/// A text leaf of a specific container.
///
/// Carrying the container id makes leaves from different containers unequal,
/// even when their paths match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LeafRef {
    pub container_id: ContainerId,
    pub path: NodePath,
}

/// Offset index over an immutable render tree.
///
/// Cumulative leaf offsets are computed once at construction; the tree must
/// not change afterwards (build a new source instead).
#[derive(Debug, Clone)]
pub struct StaticTreeSource {
    container_id: ContainerId,
    paths: Vec<NodePath>,
    starts: Vec<usize>,
    ends: Vec<usize>,
    by_path: HashMap<NodePath, usize>,
}

impl StaticTreeSource {
    pub fn new(container_id: ContainerId, root: &RenderNode) -> Self {
        let leaves = root.leaves();
        let mut paths = Vec::with_capacity(leaves.len());
        let mut starts = Vec::with_capacity(leaves.len());
        let mut ends = Vec::with_capacity(leaves.len());
        let mut by_path = HashMap::with_capacity(leaves.len());

        let mut cursor = 0;
        for (i, (path, text)) in leaves.into_iter().enumerate() {
            starts.push(cursor);
            cursor += char_len(text);
            ends.push(cursor);
            by_path.insert(path.clone(), i);
            paths.push(path);
        }

        Self {
            container_id,
            paths,
            starts,
            ends,
            by_path,
        }
    }

    pub fn container_id(&self) -> &ContainerId {
        &self.container_id
    }

    pub fn leaf_count(&self) -> usize {
        self.paths.len()
    }

    /// `[start, end)` offsets of the leaf at `path`
    pub fn leaf_range(&self, path: &NodePath) -> Option<(usize, usize)> {
        let &i = self.by_path.get(path)?;
        Some((self.starts[i], self.ends[i]))
    }

    fn leaf_ref(&self, i: usize) -> LeafRef {
        LeafRef {
            container_id: self.container_id.clone(),
            path: self.paths[i].clone(),
        }
    }
}

impl TextOffsetIndex for StaticTreeSource {
    type Leaf = LeafRef;

    fn total_len(&self) -> usize {
        self.ends.last().copied().unwrap_or(0)
    }

    fn contains(&self, leaf: &LeafRef) -> bool {
        leaf.container_id == self.container_id && self.by_path.contains_key(&leaf.path)
    }

    fn offset_of(&self, leaf: &LeafRef, intra: usize) -> Option<usize> {
        if leaf.container_id != self.container_id {
            return None;
        }
        let (start, end) = self.leaf_range(&leaf.path)?;
        (start + intra <= end).then_some(start + intra)
    }

    fn locate(&self, offset: usize) -> Option<LeafPoint<LeafRef>> {
        let i = self.ends.partition_point(|&end| end <= offset);
        if i < self.ends.len() {
            return Some(LeafPoint::new(self.leaf_ref(i), offset - self.starts[i]));
        }
        let last = self.ends.len().checked_sub(1)?;
        (offset == self.ends[last])
            .then(|| LeafPoint::new(self.leaf_ref(last), self.ends[last] - self.starts[last]))
    }
}
