//! Batch queries run concurrently against one shared, read-only tree.

use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use crate::error::Result;
use crate::kdtree::result::Neighbor;
use crate::kdtree::KDTreeIndex;
use crate::r#type::IndexableFloat;

/// Run many queries in parallel with rayon.
///
/// Queries never mutate the tree, so any tree whose points are `Sync` can be searched from many
/// threads at once. Rebuilding requires `&mut`, which rules out concurrent rebuilds.
pub trait ParallelKDTreeIndex<N: IndexableFloat>: KDTreeIndex<N> + Sync {
    /// [`KDTreeIndex::within`] for every query. Results are in query order.
    fn within_batch<Q: AsRef<[N]> + Sync>(
        &self,
        queries: &[Q],
        radius: N,
    ) -> Result<Vec<Vec<Neighbor<N>>>> {
        queries
            .par_iter()
            .map(|query| self.within(query.as_ref(), radius))
            .collect()
    }

    /// [`KDTreeIndex::nearest`] for every query. Results are in query order.
    fn nearest_batch<Q: AsRef<[N]> + Sync>(
        &self,
        queries: &[Q],
        k: usize,
    ) -> Result<Vec<Vec<Neighbor<N>>>> {
        queries
            .par_iter()
            .map(|query| self.nearest(query.as_ref(), k))
            .collect()
    }
}

impl<N: IndexableFloat, T: KDTreeIndex<N> + Sync> ParallelKDTreeIndex<N> for T {}
