use crate::bbox::BoundingBox;
use crate::error::{KdIndexError, Result};
use crate::kdtree::builder::{build_tree, KDTreeBuilder};
use crate::r#type::IndexableFloat;
use crate::source::PointSource;

/// A node of the tree, stored in pre-order in [`KDTreeMetadata`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum KDNode<N: IndexableFloat> {
    /// A contiguous range `ids[start..end]` of the index permutation.
    Leaf { start: usize, end: usize },
    /// An axis-aligned split. Every point under `left` has a coordinate `<= div_low` on `axis`
    /// and every point under `right` a coordinate `>= div_high`.
    Branch {
        axis: usize,
        div_low: N,
        div_high: N,
        left: usize,
        right: usize,
    },
}

/// The built tree: the index permutation and the nodes partitioning it.
#[derive(Debug, Clone, PartialEq)]
pub struct KDTreeMetadata<N: IndexableFloat> {
    pub(crate) dim: usize,
    pub(crate) num_items: usize,
    pub(crate) leaf_max_size: usize,
    pub(crate) root_bbox: BoundingBox<N>,
    pub(crate) ids: Vec<usize>,
    pub(crate) nodes: Vec<KDNode<N>>,
}

impl<N: IndexableFloat> KDTreeMetadata<N> {
    /// The dimensionality of the points when the tree was built.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// The number of points when the tree was built.
    pub fn num_items(&self) -> usize {
        self.num_items
    }

    /// The maximum number of points per leaf.
    pub fn leaf_max_size(&self) -> usize {
        self.leaf_max_size
    }

    /// The box containing every indexed point.
    pub fn root_bbox(&self) -> &BoundingBox<N> {
        &self.root_bbox
    }

    /// The kd-sorted permutation of point indices. Each leaf covers a contiguous range of it.
    pub fn indices(&self) -> &[usize] {
        &self.ids
    }

    /// The total number of nodes, both leaves and branches.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }
}

/// A k-d tree over a point collection it does not own.
///
/// `S` is the handle to the points: usually a borrow like `&Vec<[f64; 3]>`, or a shared owner
/// such as `Rc<Vec<Vec<f32>>>`. The tree only stores a permutation of point indices, so the
/// points must not change between [`build_index`][Self::build_index] and a query. After
/// mutating them (through [`source_mut`][Self::source_mut] or shared ownership), call
/// `build_index` again; until then queries may return wrong or missing points but never read
/// out of bounds.
///
/// ```
/// use kd_index::kdtree::{KDTree, KDTreeIndex};
///
/// let points = vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [10.0, 10.0]];
/// let tree = KDTree::new(&points).unwrap();
///
/// let found = tree.within(&[0.0, 0.0], 1.5).unwrap();
/// assert_eq!(found.len(), 3);
/// assert_eq!(found[0].index, 0);
/// ```
#[derive(Debug, Clone)]
pub struct KDTree<S: PointSource> {
    pub(crate) source: S,
    pub(crate) leaf_max_size: usize,
    pub(crate) metadata: Option<KDTreeMetadata<S::Scalar>>,
}

impl<S: PointSource> KDTree<S> {
    /// Build a tree over `source` with the default leaf size.
    pub fn new(source: S) -> Result<Self> {
        KDTreeBuilder::new().build(source)
    }

    /// Create a tree with an explicit leaf size, optionally deferring construction.
    pub fn with_leaf_size(source: S, leaf_max_size: usize, auto_build: bool) -> Result<Self> {
        KDTreeBuilder::new()
            .leaf_max_size(leaf_max_size)
            .auto_build(auto_build)
            .build(source)
    }

    /// Discard the current tree and build a new one from the current contents of the source.
    ///
    /// Fails if a point has a different dimensionality than the collection, or if the
    /// collection's dimensionality changed since the last build. The previous tree is kept on
    /// failure.
    pub fn build_index(&mut self) -> Result<()> {
        let mut metadata = build_tree(&self.source, self.leaf_max_size)?;

        if let Some(previous) = &self.metadata {
            if metadata.num_items == 0 && metadata.dim == 0 {
                // an empty runtime-dimensioned collection cannot report its dimension
                metadata.dim = previous.dim;
                metadata.root_bbox = BoundingBox::empty(previous.dim);
            } else if previous.dim != 0 && metadata.dim != previous.dim {
                return Err(KdIndexError::DimensionMismatch {
                    expected: previous.dim,
                    actual: metadata.dim,
                });
            }
        }

        self.metadata = Some(metadata);
        Ok(())
    }

    /// Returns `true` once [`build_index`][Self::build_index] has succeeded.
    pub fn is_built(&self) -> bool {
        self.metadata.is_some()
    }

    /// The point collection this tree indexes.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Mutable access to the point handle. Call [`build_index`][Self::build_index] after changing
    /// the points.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Drop the tree and return the point handle.
    pub fn into_source(self) -> S {
        self.source
    }

    /// The configured maximum number of points per leaf.
    pub fn leaf_max_size(&self) -> usize {
        self.leaf_max_size
    }

    /// The number of indexed points, 0 before the first build.
    pub fn num_items(&self) -> usize {
        self.metadata.as_ref().map_or(0, |m| m.num_items)
    }

    /// The dimensionality of the indexed points. Before the first build this is the source's
    /// current dimensionality.
    pub fn dimension(&self) -> usize {
        self.metadata
            .as_ref()
            .map_or_else(|| self.source.dimension_count(), |m| m.dim)
    }

    /// The box containing every indexed point, if built.
    pub fn root_bbox(&self) -> Option<&BoundingBox<S::Scalar>> {
        self.metadata.as_ref().map(|m| &m.root_bbox)
    }
}
