use geo_traits::CoordTrait;
use tinyvec::TinyVec;

use crate::distance::{axis_dist, sq_dist_to_point};
use crate::error::{KdIndexError, Result};
use crate::kdtree::index::{KDNode, KDTreeMetadata};
use crate::kdtree::result::{KnnResultSet, Neighbor, RadiusResultSet, ResultSet, SearchParams};
use crate::kdtree::traversal::Node;
use crate::kdtree::KDTree;
use crate::r#type::IndexableFloat;
use crate::source::PointSource;

/// A trait for searching and accessing data out of a KDTree.
///
/// All distances passed in and out are **squared** Euclidean distances, except for the search
/// radius which is a plain distance.
pub trait KDTreeIndex<N: IndexableFloat>: Sized {
    /// The point collection type.
    type Source: PointSource<Scalar = N> + ?Sized;

    /// The points this tree indexes.
    fn points(&self) -> &Self::Source;

    /// Access the metadata describing the built tree, or `None` if it was never built.
    fn metadata(&self) -> Option<&KDTreeMetadata<N>>;

    /// Find all points within `radius` of `query`, writing them to `results`.
    ///
    /// `results` is cleared first. Points with `distance <= radius + params.eps` are returned
    /// with their squared distance, sorted ascending when `params.sorted`. A negative radius
    /// is treated as 0. Returns the number of points found, which is also `results.len()`.
    fn radius_search(
        &self,
        query: &[N],
        radius: N,
        results: &mut Vec<Neighbor<N>>,
        params: &SearchParams<N>,
    ) -> Result<usize> {
        let radius = radius.max(N::zero());
        let eps = params.eps.max(N::zero());
        let threshold = (radius + eps) * (radius + eps);

        let mut result_set = RadiusResultSet::new(threshold, results);
        if let Some(metadata) = checked_metadata(self, query)? {
            search(metadata, self.points(), query, &mut result_set);
        }
        if params.sorted {
            result_set.sort();
        }
        Ok(result_set.len())
    }

    /// Find all points within `radius` of `query`, sorted by ascending squared distance.
    fn within(&self, query: &[N], radius: N) -> Result<Vec<Neighbor<N>>> {
        let mut results = vec![];
        self.radius_search(query, radius, &mut results, &SearchParams::default())?;
        Ok(results)
    }

    /// Find all points within `radius` of a coordinate.
    fn within_coord(&self, coord: &impl CoordTrait<T = N>, radius: N) -> Result<Vec<Neighbor<N>>> {
        self.within(&coord_to_query(coord), radius)
    }

    /// Find the `k` points closest to `query`, writing their indices and squared distances to
    /// two parallel outputs sorted by ascending distance.
    ///
    /// `k` is clamped to `1..=num_items`; both outputs are resized to the number of results,
    /// which is returned. An empty or unbuilt tree yields no results.
    fn knn_search(
        &self,
        query: &[N],
        k: usize,
        indices: &mut Vec<usize>,
        distances_sq: &mut Vec<N>,
    ) -> Result<usize> {
        let result_set = knn(self, query, k)?;
        indices.clear();
        distances_sq.clear();
        for neighbor in result_set.into_sorted() {
            indices.push(neighbor.index);
            distances_sq.push(neighbor.distance_sq);
        }
        Ok(indices.len())
    }

    /// Find the `k` points closest to `query`, writing them to `results`.
    ///
    /// Behaves like [`knn_search`][Self::knn_search] with a single output.
    fn nearest_into(
        &self,
        query: &[N],
        k: usize,
        results: &mut Vec<Neighbor<N>>,
    ) -> Result<usize> {
        let result_set = knn(self, query, k)?;
        results.clear();
        results.extend(result_set.into_sorted());
        Ok(results.len())
    }

    /// Find the `k` points closest to `query`, sorted by ascending squared distance.
    ///
    /// ```
    /// use kd_index::kdtree::{KDTree, KDTreeIndex};
    ///
    /// let points = vec![[5.0, 5.0]];
    /// let tree = KDTree::new(&points).unwrap();
    ///
    /// // k is clamped to the number of points
    /// let nearest = tree.nearest(&[5.0, 5.0], 3).unwrap();
    /// assert_eq!(nearest.len(), 1);
    /// assert_eq!(nearest[0].distance_sq, 0.0);
    /// ```
    fn nearest(&self, query: &[N], k: usize) -> Result<Vec<Neighbor<N>>> {
        let mut results = vec![];
        self.nearest_into(query, k, &mut results)?;
        Ok(results)
    }

    /// Find the `k` points closest to a coordinate.
    fn nearest_coord(&self, coord: &impl CoordTrait<T = N>, k: usize) -> Result<Vec<Neighbor<N>>> {
        self.nearest(&coord_to_query(coord), k)
    }

    /// Access the root node of the KDTree for manual traversal. `None` if the tree is unbuilt
    /// or empty.
    fn root(&self) -> Option<Node<'_, N>> {
        self.metadata().and_then(Node::from_root)
    }
}

impl<S: PointSource> KDTreeIndex<S::Scalar> for KDTree<S> {
    type Source = S;

    fn points(&self) -> &S {
        &self.source
    }

    fn metadata(&self) -> Option<&KDTreeMetadata<S::Scalar>> {
        self.metadata.as_ref()
    }
}

/// Validate `query` against the tree, returning the metadata if there is anything to search.
fn checked_metadata<'a, N: IndexableFloat, T: KDTreeIndex<N>>(
    tree: &'a T,
    query: &[N],
) -> Result<Option<&'a KDTreeMetadata<N>>> {
    let points = tree.points();
    let Some(metadata) = tree.metadata() else {
        if points.point_count() > 0 && query.len() != points.dimension_count() {
            return Err(KdIndexError::DimensionMismatch {
                expected: points.dimension_count(),
                actual: query.len(),
            });
        }
        return Ok(None);
    };

    if (metadata.num_items > 0 || metadata.dim > 0) && query.len() != metadata.dim {
        return Err(KdIndexError::DimensionMismatch {
            expected: metadata.dim,
            actual: query.len(),
        });
    }

    let current = points.dimension_count();
    if points.point_count() > 0 && current != metadata.dim {
        return Err(KdIndexError::StaleIndex {
            built: metadata.dim,
            current,
        });
    }

    if metadata.nodes.is_empty() {
        return Ok(None);
    }
    Ok(Some(metadata))
}

fn knn<N: IndexableFloat, T: KDTreeIndex<N>>(
    tree: &T,
    query: &[N],
    k: usize,
) -> Result<KnnResultSet<N>> {
    let metadata = checked_metadata(tree, query)?;
    let Some(metadata) = metadata else {
        return Ok(KnnResultSet::new(0));
    };

    let k = k.clamp(1, metadata.num_items);
    let mut result_set = KnnResultSet::new(k);
    search(metadata, tree.points(), query, &mut result_set);
    Ok(result_set)
}

/// Branch-and-bound descent from the root.
///
/// `dists[axis]` holds a lower bound on the squared distance along `axis` from the query to the
/// current node's region; `min_dist` is their sum.
fn search<N, S, R>(metadata: &KDTreeMetadata<N>, points: &S, query: &[N], result_set: &mut R)
where
    N: IndexableFloat,
    S: PointSource<Scalar = N> + ?Sized,
    R: ResultSet<N>,
{
    let bbox = &metadata.root_bbox;
    let mut dists: TinyVec<[N; 4]> = query
        .iter()
        .enumerate()
        .map(|(axis, &q)| {
            let d = axis_dist(q, bbox.min()[axis], bbox.max()[axis]);
            d * d
        })
        .collect();
    let min_dist = dists.iter().fold(N::zero(), |acc, &d| acc + d);

    if min_dist <= result_set.worst_dist() {
        let mut ctx = SearchContext {
            metadata,
            points,
            query,
            point_count: points.point_count(),
            result_set,
        };
        ctx.search_level(0, min_dist, &mut dists);
    }
}

struct SearchContext<'a, N: IndexableFloat, S: ?Sized, R> {
    metadata: &'a KDTreeMetadata<N>,
    points: &'a S,
    query: &'a [N],
    point_count: usize,
    result_set: &'a mut R,
}

impl<N, S, R> SearchContext<'_, N, S, R>
where
    N: IndexableFloat,
    S: PointSource<Scalar = N> + ?Sized,
    R: ResultSet<N>,
{
    fn search_level(&mut self, node: usize, min_dist: N, dists: &mut [N]) {
        match self.metadata.nodes[node] {
            KDNode::Leaf { start, end } => {
                for &idx in &self.metadata.ids[start..end] {
                    // the collection shrank or the point was reshaped since the last build
                    if idx >= self.point_count
                        || self.points.point_dimension(idx) != self.metadata.dim
                    {
                        continue;
                    }
                    let dist = sq_dist_to_point(self.query, self.points, idx);
                    self.result_set.add_point(dist, idx);
                }
            }
            KDNode::Branch {
                axis,
                div_low,
                div_high,
                left,
                right,
            } => {
                let val = self.query[axis];
                let diff_low = val - div_low;
                let diff_high = val - div_high;

                // descend into the closer child first
                let (best, other, cut_dist) = if diff_low + diff_high < N::zero() {
                    (left, right, diff_high * diff_high)
                } else {
                    (right, left, diff_low * diff_low)
                };

                self.search_level(best, min_dist, dists);

                let prev = dists[axis];
                let bound = cut_dist.max(prev);
                let other_min_dist = min_dist + bound - prev;
                if other_min_dist <= self.result_set.worst_dist() {
                    dists[axis] = bound;
                    self.search_level(other, other_min_dist, dists);
                    dists[axis] = prev;
                }
            }
        }
    }
}

fn coord_to_query<N: IndexableFloat>(coord: &impl CoordTrait<T = N>) -> TinyVec<[N; 4]> {
    (0..coord.dim().size())
        .map(|axis| coord.nth_or_panic(axis))
        .collect()
}
