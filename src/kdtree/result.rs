//! Search results and the accumulators that collect them during traversal.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::r#type::IndexableFloat;

/// A single search result: the index of a point in the source collection and its squared
/// distance to the query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor<N: IndexableFloat> {
    /// Position of the point in the indexed collection.
    pub index: usize,
    /// Squared Euclidean distance to the query point.
    pub distance_sq: N,
}

impl<N: IndexableFloat> From<Neighbor<N>> for (usize, N) {
    fn from(value: Neighbor<N>) -> Self {
        (value.index, value.distance_sq)
    }
}

/// Tuning for radius searches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchParams<N: IndexableFloat> {
    /// Tolerance added to the radius: points with `distance <= radius + eps` are accepted.
    /// Negative values are treated as 0.
    pub eps: N,
    /// Sort results by ascending squared distance. Ties keep discovery order.
    pub sorted: bool,
}

impl<N: IndexableFloat> Default for SearchParams<N> {
    fn default() -> Self {
        Self {
            eps: N::zero(),
            sorted: true,
        }
    }
}

impl<N: IndexableFloat> SearchParams<N> {
    /// Set the radius tolerance.
    pub fn with_eps(mut self, eps: N) -> Self {
        self.eps = eps;
        self
    }

    /// Set whether results are sorted by distance.
    pub fn with_sorted(mut self, sorted: bool) -> Self {
        self.sorted = sorted;
        self
    }
}

/// Collects candidate points found while descending the tree.
pub(crate) trait ResultSet<N: IndexableFloat> {
    /// The current pruning bound: subtrees further than this are skipped.
    fn worst_dist(&self) -> N;

    /// Offer a point; the set decides whether to keep it.
    fn add_point(&mut self, dist: N, index: usize);
}

/// Keeps every point within a fixed squared radius, in discovery order.
pub(crate) struct RadiusResultSet<'a, N: IndexableFloat> {
    radius_sq: N,
    results: &'a mut Vec<Neighbor<N>>,
}

impl<'a, N: IndexableFloat> RadiusResultSet<'a, N> {
    pub(crate) fn new(radius_sq: N, results: &'a mut Vec<Neighbor<N>>) -> Self {
        results.clear();
        Self { radius_sq, results }
    }

    pub(crate) fn sort(&mut self) {
        self.results.sort_by(|a, b| {
            a.distance_sq
                .partial_cmp(&b.distance_sq)
                .unwrap_or(Ordering::Equal)
        });
    }

    pub(crate) fn len(&self) -> usize {
        self.results.len()
    }
}

impl<N: IndexableFloat> ResultSet<N> for RadiusResultSet<'_, N> {
    #[inline]
    fn worst_dist(&self) -> N {
        self.radius_sq
    }

    #[inline]
    fn add_point(&mut self, dist: N, index: usize) {
        if dist <= self.radius_sq {
            self.results.push(Neighbor {
                index,
                distance_sq: dist,
            });
        }
    }
}

/// A candidate in the k-nearest heap, ordered by distance and then discovery order.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Candidate<N: IndexableFloat> {
    dist: N,
    seq: usize,
    index: usize,
}

impl<N: IndexableFloat> Eq for Candidate<N> {}

impl<N: IndexableFloat> Ord for Candidate<N> {
    fn cmp(&self, other: &Self) -> Ordering {
        // NaN distances never enter the heap, see `KnnResultSet::add_point`
        self.dist
            .partial_cmp(&other.dist)
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

impl<N: IndexableFloat> PartialOrd for Candidate<N> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Keeps the `capacity` closest points seen so far in a bounded max-heap.
///
/// A new point only displaces the current worst if it is strictly closer, so among equally
/// distant points the first one discovered wins.
pub(crate) struct KnnResultSet<N: IndexableFloat> {
    capacity: usize,
    heap: BinaryHeap<Candidate<N>>,
    seq: usize,
}

impl<N: IndexableFloat> KnnResultSet<N> {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            capacity,
            heap: BinaryHeap::with_capacity(capacity + 1),
            seq: 0,
        }
    }

    /// Consume the set, yielding results sorted by ascending distance.
    pub(crate) fn into_sorted(self) -> impl Iterator<Item = Neighbor<N>> {
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|c| Neighbor {
                index: c.index,
                distance_sq: c.dist,
            })
    }
}

impl<N: IndexableFloat> ResultSet<N> for KnnResultSet<N> {
    #[inline]
    fn worst_dist(&self) -> N {
        if self.heap.len() < self.capacity {
            N::infinity()
        } else {
            self.heap.peek().map_or(N::infinity(), |c| c.dist)
        }
    }

    #[inline]
    fn add_point(&mut self, dist: N, index: usize) {
        if self.capacity == 0 || dist.is_nan() {
            return;
        }
        if self.heap.len() == self.capacity {
            // only a strictly closer point displaces the current worst
            if !(dist < self.worst_dist()) {
                return;
            }
            self.heap.pop();
        }
        self.heap.push(Candidate {
            dist,
            seq: self.seq,
            index,
        });
        self.seq += 1;
    }
}
