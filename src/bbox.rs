//! Axis-aligned bounding boxes in N dimensions.

use crate::distance::axis_dist;
use crate::error::{KdIndexError, Result};
use crate::r#type::IndexableFloat;
use crate::source::PointSource;

/// An axis-aligned bounding box with one `[min, max]` interval per dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundingBox<N: IndexableFloat> {
    min: Vec<N>,
    max: Vec<N>,
}

impl<N: IndexableFloat> BoundingBox<N> {
    /// Create a box from its minimum and maximum corners.
    pub fn try_new(min: Vec<N>, max: Vec<N>) -> Result<Self> {
        if min.len() != max.len() {
            return Err(KdIndexError::DimensionMismatch {
                expected: min.len(),
                actual: max.len(),
            });
        }
        Ok(Self { min, max })
    }

    /// An inverted box that any point will expand.
    pub(crate) fn empty(dim: usize) -> Self {
        Self {
            min: vec![N::infinity(); dim],
            max: vec![N::neg_infinity(); dim],
        }
    }

    /// Compute the box enclosing the points referenced by `indices`.
    pub(crate) fn from_indices<S: PointSource<Scalar = N> + ?Sized>(
        source: &S,
        dim: usize,
        indices: &[usize],
    ) -> Self {
        let mut bbox = Self::empty(dim);
        for &idx in indices {
            for axis in 0..dim {
                let value = source.coordinate(idx, axis);
                if value < bbox.min[axis] {
                    bbox.min[axis] = value;
                }
                if value > bbox.max[axis] {
                    bbox.max[axis] = value;
                }
            }
        }
        bbox
    }

    /// The number of dimensions of this box.
    pub fn dim(&self) -> usize {
        self.min.len()
    }

    /// The minimum corner.
    pub fn min(&self) -> &[N] {
        &self.min
    }

    /// The maximum corner.
    pub fn max(&self) -> &[N] {
        &self.max
    }

    /// The extent of the box along `axis`.
    #[inline]
    pub fn spread(&self, axis: usize) -> N {
        self.max[axis] - self.min[axis]
    }

    /// The axis with the largest extent. The lowest axis wins ties.
    pub(crate) fn widest_axis(&self) -> usize {
        let mut best = 0;
        let mut best_spread = N::neg_infinity();
        for axis in 0..self.dim() {
            let spread = self.spread(axis);
            if spread > best_spread {
                best = axis;
                best_spread = spread;
            }
        }
        best
    }

    /// Returns `true` if the point lies inside or on the boundary of this box.
    pub fn contains(&self, point: &[N]) -> bool {
        point.len() == self.dim()
            && point
                .iter()
                .enumerate()
                .all(|(axis, &v)| v >= self.min[axis] && v <= self.max[axis])
    }

    /// Squared distance from `point` to the closest point of this box. Zero when inside.
    pub fn min_sq_dist(&self, point: &[N]) -> N {
        point
            .iter()
            .enumerate()
            .fold(N::zero(), |acc, (axis, &v)| {
                let d = axis_dist(v, self.min[axis], self.max[axis]);
                acc + d * d
            })
    }
}

#[cfg(test)]
mod test {
    use super::BoundingBox;
    use crate::KdIndexError;

    #[test]
    fn rejects_mismatched_corners() {
        let err = BoundingBox::try_new(vec![0.0_f64, 0.0], vec![1.0]).unwrap_err();
        assert_eq!(
            err,
            KdIndexError::DimensionMismatch {
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn computes_min_distance() {
        let bbox = BoundingBox::try_new(vec![0.0_f64, 0.0], vec![2.0, 2.0]).unwrap();
        assert_eq!(bbox.min_sq_dist(&[1.0, 1.0]), 0.0);
        assert_eq!(bbox.min_sq_dist(&[5.0, 1.0]), 9.0);
        assert_eq!(bbox.min_sq_dist(&[-1.0, 4.0]), 5.0);
        assert!(bbox.contains(&[2.0, 0.0]));
        assert!(!bbox.contains(&[2.5, 0.0]));
    }

    #[test]
    fn widest_axis_prefers_lowest_on_ties() {
        let bbox = BoundingBox::try_new(vec![0.0_f32, 0.0, 0.0], vec![1.0, 3.0, 3.0]).unwrap();
        assert_eq!(bbox.widest_axis(), 1);
    }
}
