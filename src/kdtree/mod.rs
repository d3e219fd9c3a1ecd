//! A static k-d tree over a borrowed point collection, with radius and k-nearest-neighbor search.

#![warn(missing_docs)]

mod builder;
mod index;
#[cfg(feature = "rayon")]
mod parallel;
mod result;
mod r#trait;
mod traversal;

pub use builder::{KDTreeBuilder, DEFAULT_LEAF_MAX_SIZE};
pub use index::{KDTree, KDTreeMetadata};
#[cfg(feature = "rayon")]
pub use parallel::ParallelKDTreeIndex;
pub use r#trait::KDTreeIndex;
pub use result::{Neighbor, SearchParams};
pub use traversal::Node;
