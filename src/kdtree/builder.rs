use std::cmp::Ordering;

use crate::bbox::BoundingBox;
use crate::error::{KdIndexError, Result};
use crate::kdtree::index::{KDNode, KDTreeMetadata};
use crate::kdtree::KDTree;
use crate::r#type::IndexableFloat;
use crate::source::PointSource;

/// The default maximum number of points stored in a leaf.
pub const DEFAULT_LEAF_MAX_SIZE: usize = 10;

/// A builder to configure and create a [`KDTree`].
///
/// ```
/// use kd_index::kdtree::{KDTreeBuilder, KDTreeIndex};
///
/// let points = vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [10.0, 10.0]];
/// let tree = KDTreeBuilder::new().leaf_max_size(2).build(&points).unwrap();
///
/// let nearest = tree.nearest(&[9.0, 9.0], 1).unwrap();
/// assert_eq!(nearest[0].index, 3);
/// assert_eq!(nearest[0].distance_sq, 2.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KDTreeBuilder {
    leaf_max_size: usize,
    auto_build: bool,
}

impl Default for KDTreeBuilder {
    fn default() -> Self {
        Self {
            leaf_max_size: DEFAULT_LEAF_MAX_SIZE,
            auto_build: true,
        }
    }
}

impl KDTreeBuilder {
    /// Create a new builder with a leaf size of [`DEFAULT_LEAF_MAX_SIZE`] that builds the tree
    /// immediately.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of points stored in a leaf. Must be at least 1.
    ///
    /// Smaller leaves make deeper trees with fewer distance computations per query.
    pub fn leaf_max_size(mut self, leaf_max_size: usize) -> Self {
        self.leaf_max_size = leaf_max_size;
        self
    }

    /// Whether [`build`][Self::build] constructs the tree right away. When `false`, the index
    /// answers every query with no results until [`KDTree::build_index`] is called.
    pub fn auto_build(mut self, auto_build: bool) -> Self {
        self.auto_build = auto_build;
        self
    }

    /// Create a [`KDTree`] over `source`.
    pub fn build<S: PointSource>(self, source: S) -> Result<KDTree<S>> {
        if self.leaf_max_size == 0 {
            return Err(KdIndexError::InvalidLeafSize(self.leaf_max_size));
        }

        let mut tree = KDTree {
            source,
            leaf_max_size: self.leaf_max_size,
            metadata: None,
        };
        if self.auto_build {
            tree.build_index()?;
        }
        Ok(tree)
    }
}

/// Construct the tree over the current contents of `source`.
///
/// Only the index permutation is reordered; point coordinates are never copied.
pub(crate) fn build_tree<N: IndexableFloat, S: PointSource<Scalar = N> + ?Sized>(
    source: &S,
    leaf_max_size: usize,
) -> Result<KDTreeMetadata<N>> {
    let dim = source.dimension_count();
    let num_items = source.point_count();

    for i in 0..num_items {
        let actual = source.point_dimension(i);
        if actual != dim {
            return Err(KdIndexError::DimensionMismatch {
                expected: dim,
                actual,
            });
        }
    }
    if dim == 0 && num_items > 0 {
        return Err(KdIndexError::General(
            "Points must have at least one dimension.".to_string(),
        ));
    }

    let mut ids: Vec<usize> = (0..num_items).collect();

    let root_bbox = match source.bounding_box() {
        Some(bbox) if bbox.dim() != dim => {
            return Err(KdIndexError::DimensionMismatch {
                expected: dim,
                actual: bbox.dim(),
            })
        }
        Some(bbox) => bbox,
        None => BoundingBox::from_indices(source, dim, &ids),
    };

    let mut nodes = Vec::new();
    if num_items > 0 {
        let mut ctx = BuildContext {
            source,
            dim,
            leaf_max_size,
            ids: &mut ids,
            nodes: &mut nodes,
        };
        ctx.divide(0, num_items, &root_bbox);
    }

    Ok(KDTreeMetadata {
        dim,
        num_items,
        leaf_max_size,
        root_bbox,
        ids,
        nodes,
    })
}

struct BuildContext<'a, N: IndexableFloat, S: PointSource<Scalar = N> + ?Sized> {
    source: &'a S,
    dim: usize,
    leaf_max_size: usize,
    ids: &'a mut [usize],
    nodes: &'a mut Vec<KDNode<N>>,
}

impl<N: IndexableFloat, S: PointSource<Scalar = N> + ?Sized> BuildContext<'_, N, S> {
    /// Build the subtree over `ids[start..end]`, whose points lie inside `bbox`. Nodes are stored
    /// in pre-order; returns the id of the subtree root.
    fn divide(&mut self, start: usize, end: usize, bbox: &BoundingBox<N>) -> usize {
        let node_id = self.nodes.len();
        if end - start <= self.leaf_max_size {
            self.nodes.push(KDNode::Leaf { start, end });
            return node_id;
        }

        // reserve the slot, filled once both children exist
        self.nodes.push(KDNode::Leaf { start, end });

        let axis = bbox.widest_axis();
        let mid = start + self.split(start, end, axis, bbox);

        let left_bbox = BoundingBox::from_indices(self.source, self.dim, &self.ids[start..mid]);
        let right_bbox = BoundingBox::from_indices(self.source, self.dim, &self.ids[mid..end]);
        let div_low = left_bbox.max()[axis];
        let div_high = right_bbox.min()[axis];

        let left = self.divide(start, mid, &left_bbox);
        let right = self.divide(mid, end, &right_bbox);

        self.nodes[node_id] = KDNode::Branch {
            axis,
            div_low,
            div_high,
            left,
            right,
        };
        node_id
    }

    /// Partition `ids[start..end]` along `axis`, returning the size of the low half. Both halves
    /// are always non-empty and each holds at least a quarter of the points.
    fn split(&mut self, start: usize, end: usize, axis: usize, bbox: &BoundingBox<N>) -> usize {
        let source = self.source;
        let ids = &mut self.ids[start..end];
        let count = ids.len();

        let lo = bbox.min()[axis];
        let hi = bbox.max()[axis];
        if hi > lo {
            let two = N::one() + N::one();
            let split_val = lo + (hi - lo) / two;
            let mid = partition(source, ids, axis, split_val);
            let smaller = mid.min(count - mid);
            if smaller > 0 && smaller >= count / 4 {
                return mid;
            }
        }

        // The midpoint left one side empty or nearly so (coincident coordinates, skewed data or
        // a loose bounding box), so split at the median position instead.
        let mid = count / 2;
        ids.select_nth_unstable_by(mid, |&a, &b| {
            source
                .coordinate(a, axis)
                .partial_cmp(&source.coordinate(b, axis))
                .unwrap_or(Ordering::Equal)
        });
        mid
    }
}

/// In-place two-way partition: ids whose coordinate on `axis` is below `split_val` are moved to
/// the front. Returns how many there are.
fn partition<N: IndexableFloat, S: PointSource<Scalar = N> + ?Sized>(
    source: &S,
    ids: &mut [usize],
    axis: usize,
    split_val: N,
) -> usize {
    let mut left = 0;
    let mut right = ids.len();
    while left < right {
        if source.coordinate(ids[left], axis) < split_val {
            left += 1;
        } else {
            right -= 1;
            ids.swap(left, right);
        }
    }
    left
}
