//! Utilities to traverse the KDTree structure.

use crate::kdtree::index::{KDNode, KDTreeMetadata};
use crate::r#type::IndexableFloat;

/// A node in the KDTree.
#[derive(Debug, Clone, Copy)]
pub struct Node<'a, N: IndexableFloat> {
    /// The tree that this node is a reference onto
    metadata: &'a KDTreeMetadata<N>,
    id: usize,
    depth: usize,
}

impl<'a, N: IndexableFloat> Node<'a, N> {
    pub(crate) fn from_root(metadata: &'a KDTreeMetadata<N>) -> Option<Self> {
        if metadata.nodes.is_empty() {
            return None;
        }
        Some(Self {
            metadata,
            id: 0,
            depth: 0,
        })
    }

    #[inline]
    fn kind(&self) -> KDNode<N> {
        self.metadata.nodes[self.id]
    }

    fn child(&self, id: usize) -> Self {
        Self {
            metadata: self.metadata,
            id,
            depth: self.depth + 1,
        }
    }

    /// Returns `true` if this is a leaf node without children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind(), KDNode::Leaf { .. })
    }

    /// Returns `true` if this is an intermediate node with children.
    #[inline]
    pub fn is_parent(&self) -> bool {
        !self.is_leaf()
    }

    /// Distance from the root; the root has depth 0.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The axis that the children of this node are split over.
    pub fn axis(&self) -> Option<usize> {
        match self.kind() {
            KDNode::Branch { axis, .. } => Some(axis),
            KDNode::Leaf { .. } => None,
        }
    }

    /// The largest coordinate of the left child and the smallest coordinate of the right child
    /// along [`axis`][Self::axis].
    pub fn split_bounds(&self) -> Option<(N, N)> {
        match self.kind() {
            KDNode::Branch {
                div_low, div_high, ..
            } => Some((div_low, div_high)),
            KDNode::Leaf { .. } => None,
        }
    }

    /// The child node holding the points on the low side of the split.
    pub fn left_child(&self) -> Option<Node<'a, N>> {
        match self.kind() {
            KDNode::Branch { left, .. } => Some(self.child(left)),
            KDNode::Leaf { .. } => None,
        }
    }

    /// The child node holding the points on the high side of the split.
    pub fn right_child(&self) -> Option<Node<'a, N>> {
        match self.kind() {
            KDNode::Branch { right, .. } => Some(self.child(right)),
            KDNode::Leaf { .. } => None,
        }
    }

    /// The indices of the points stored in this leaf. Empty for intermediate nodes.
    pub fn point_indices(&self) -> &'a [usize] {
        match self.kind() {
            KDNode::Leaf { start, end } => &self.metadata.ids[start..end],
            KDNode::Branch { .. } => &[],
        }
    }
}
