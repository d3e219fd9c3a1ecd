//! The squared Euclidean metric used by every query.
//!
//! Distances are never square-rooted: pruning compares squared distances against a squared
//! threshold, and results report squared distances. Callers needing the true distance take the
//! square root themselves.

use crate::r#type::IndexableFloat;
use crate::source::PointSource;

/// Squared Euclidean distance between two points of equal dimensionality.
///
/// ```
/// use kd_index::distance::squared_euclidean;
///
/// assert_eq!(squared_euclidean(&[0.0, 0.0], &[3.0, 4.0]), 25.0);
/// ```
#[inline]
pub fn squared_euclidean<N: IndexableFloat>(a: &[N], b: &[N]) -> N {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).fold(N::zero(), |acc, (&x, &y)| {
        let d = x - y;
        acc + d * d
    })
}

/// Squared distance between `query` and the point at `index` in `source`.
#[inline]
pub(crate) fn sq_dist_to_point<N: IndexableFloat, S: PointSource<Scalar = N> + ?Sized>(
    query: &[N],
    source: &S,
    index: usize,
) -> N {
    query
        .iter()
        .enumerate()
        .fold(N::zero(), |acc, (axis, &q)| {
            let d = q - source.coordinate(index, axis);
            acc + d * d
        })
}

/// 1D distance from a value to a range.
#[inline]
pub(crate) fn axis_dist<N: IndexableFloat>(k: N, min: N, max: N) -> N {
    if k < min {
        min - k
    } else if k <= max {
        N::zero()
    } else {
        k - max
    }
}

#[cfg(test)]
mod test {
    use super::{axis_dist, sq_dist_to_point, squared_euclidean};

    #[test]
    fn sums_squared_axis_differences() {
        assert_eq!(squared_euclidean(&[1.0_f64, 2.0, 3.0], &[4.0, 6.0, 3.0]), 25.0);
        assert_eq!(squared_euclidean::<f32>(&[], &[]), 0.0);
    }

    #[test]
    fn distance_to_stored_point() {
        let points = vec![[1.0_f64, 1.0], [4.0, 5.0]];
        assert_eq!(sq_dist_to_point(&[1.0, 1.0], points.as_slice(), 1), 25.0);
    }

    #[test]
    fn axis_distance() {
        assert_eq!(axis_dist(0.0_f64, 1.0, 2.0), 1.0);
        assert_eq!(axis_dist(1.5_f64, 1.0, 2.0), 0.0);
        assert_eq!(axis_dist(4.0_f64, 1.0, 2.0), 2.0);
    }
}
