//! The point adapter contract between the index and the caller's point storage.
//!
//! The index never copies point coordinates. It only asks a [`PointSource`] for the number of
//! points, their dimensionality and single coordinates, so any container can be indexed once it
//! implements this trait.

use std::rc::Rc;
use std::sync::Arc;

use bytemuck::try_cast_slice;
use geo_traits::CoordTrait;

use crate::bbox::BoundingBox;
use crate::error::{KdIndexError, Result};
use crate::r#type::IndexableFloat;

/// A collection of points of fixed dimensionality that can be indexed.
///
/// Implementations must keep `dimension_count` and `point_count` stable between building an index
/// and querying it. Changing them invalidates the index until it is rebuilt.
pub trait PointSource {
    /// The coordinate type.
    type Scalar: IndexableFloat;

    /// The dimensionality `D` of every point.
    fn dimension_count(&self) -> usize;

    /// The number of points in the collection.
    fn point_count(&self) -> usize;

    /// One coordinate of one point.
    ///
    /// `index` must be in `0..point_count()` and `axis` in `0..dimension_count()`.
    /// Implementations panic outside of these bounds; the index never asks for them.
    fn coordinate(&self, index: usize, axis: usize) -> Self::Scalar;

    /// The dimensionality of a single point.
    ///
    /// Collections whose points carry their own length (like `Vec<Vec<N>>`) override this so
    /// that ragged collections are rejected when building.
    fn point_dimension(&self, _index: usize) -> usize {
        self.dimension_count()
    }

    /// A precomputed box containing every point, if one is available.
    ///
    /// Returning `None` makes the index compute the bounds itself. A box returned here must
    /// contain all points, otherwise queries may miss results.
    fn bounding_box(&self) -> Option<BoundingBox<Self::Scalar>> {
        None
    }
}

impl<N: IndexableFloat, const D: usize> PointSource for [[N; D]] {
    type Scalar = N;

    fn dimension_count(&self) -> usize {
        D
    }

    fn point_count(&self) -> usize {
        self.len()
    }

    #[inline]
    fn coordinate(&self, index: usize, axis: usize) -> N {
        self[index][axis]
    }
}

impl<N: IndexableFloat, const D: usize> PointSource for Vec<[N; D]> {
    type Scalar = N;

    fn dimension_count(&self) -> usize {
        D
    }

    fn point_count(&self) -> usize {
        self.len()
    }

    #[inline]
    fn coordinate(&self, index: usize, axis: usize) -> N {
        self[index][axis]
    }
}

impl<N: IndexableFloat> PointSource for [Vec<N>] {
    type Scalar = N;

    /// The length of the first point, or 0 for an empty collection.
    fn dimension_count(&self) -> usize {
        self.first().map_or(0, Vec::len)
    }

    fn point_count(&self) -> usize {
        self.len()
    }

    #[inline]
    fn coordinate(&self, index: usize, axis: usize) -> N {
        self[index][axis]
    }

    fn point_dimension(&self, index: usize) -> usize {
        self[index].len()
    }
}

impl<N: IndexableFloat> PointSource for Vec<Vec<N>> {
    type Scalar = N;

    fn dimension_count(&self) -> usize {
        self.first().map_or(0, Vec::len)
    }

    fn point_count(&self) -> usize {
        self.len()
    }

    #[inline]
    fn coordinate(&self, index: usize, axis: usize) -> N {
        self[index][axis]
    }

    fn point_dimension(&self, index: usize) -> usize {
        self[index].len()
    }
}

macro_rules! forward_point_source {
    ($($handle:ty),*) => {
        $(
            impl<T: PointSource + ?Sized> PointSource for $handle {
                type Scalar = T::Scalar;

                fn dimension_count(&self) -> usize {
                    (**self).dimension_count()
                }

                fn point_count(&self) -> usize {
                    (**self).point_count()
                }

                #[inline]
                fn coordinate(&self, index: usize, axis: usize) -> T::Scalar {
                    (**self).coordinate(index, axis)
                }

                fn point_dimension(&self, index: usize) -> usize {
                    (**self).point_dimension(index)
                }

                fn bounding_box(&self) -> Option<BoundingBox<T::Scalar>> {
                    (**self).bounding_box()
                }
            }
        )*
    };
}

forward_point_source!(&T, &mut T, Rc<T>, Arc<T>);

/// Points stored interleaved in one flat buffer: `[x0, y0, z0, x1, y1, z1, ...]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatPoints<'a, N: IndexableFloat> {
    coords: &'a [N],
    dim: usize,
    bbox_hint: Option<(&'a [N], &'a [N])>,
}

impl<'a, N: IndexableFloat> FlatPoints<'a, N> {
    /// View `coords` as points of `dim` dimensions.
    pub fn try_new(coords: &'a [N], dim: usize) -> Result<Self> {
        if dim == 0 {
            return Err(KdIndexError::InvalidBuffer(
                "Points must have at least one dimension.".to_string(),
            ));
        }
        if coords.len() % dim != 0 {
            return Err(KdIndexError::InvalidBuffer(format!(
                "Buffer of {} coordinates is not a multiple of {} dimensions.",
                coords.len(),
                dim
            )));
        }
        Ok(Self {
            coords,
            dim,
            bbox_hint: None,
        })
    }

    /// View a raw byte buffer of native-endian coordinates as points of `dim` dimensions.
    pub fn from_bytes(data: &'a [u8], dim: usize) -> Result<Self> {
        if data.len() % N::BYTES_PER_ELEMENT != 0 {
            return Err(KdIndexError::InvalidBuffer(format!(
                "Buffer of {} bytes is not a multiple of {} bytes per coordinate.",
                data.len(),
                N::BYTES_PER_ELEMENT
            )));
        }
        let coords: &[N] =
            try_cast_slice(data).map_err(|err| KdIndexError::InvalidBuffer(err.to_string()))?;
        Self::try_new(coords, dim)
    }

    /// Attach precomputed bounds, used as the root box when building.
    pub fn with_bounds(mut self, min: &'a [N], max: &'a [N]) -> Result<Self> {
        for corner in [min, max] {
            if corner.len() != self.dim {
                return Err(KdIndexError::DimensionMismatch {
                    expected: self.dim,
                    actual: corner.len(),
                });
            }
        }
        self.bbox_hint = Some((min, max));
        Ok(self)
    }

    /// The coordinates of the point at `index`.
    pub fn point(&self, index: usize) -> &'a [N] {
        &self.coords[index * self.dim..(index + 1) * self.dim]
    }
}

impl<N: IndexableFloat> PointSource for FlatPoints<'_, N> {
    type Scalar = N;

    fn dimension_count(&self) -> usize {
        self.dim
    }

    fn point_count(&self) -> usize {
        self.coords.len() / self.dim
    }

    #[inline]
    fn coordinate(&self, index: usize, axis: usize) -> N {
        assert!(axis < self.dim, "axis {} out of range", axis);
        self.coords[index * self.dim + axis]
    }

    fn bounding_box(&self) -> Option<BoundingBox<N>> {
        self.bbox_hint
            .and_then(|(min, max)| BoundingBox::try_new(min.to_vec(), max.to_vec()).ok())
    }
}

/// Adapter over a slice of [`geo_traits::CoordTrait`] coordinates.
///
/// The dimensionality is taken from the first coordinate (2 for `Xy`, 3 for `Xyz`/`Xym`,
/// 4 for `Xyzm`).
#[derive(Debug, Clone, Copy)]
pub struct CoordPoints<'a, C: CoordTrait> {
    coords: &'a [C],
}

impl<'a, C: CoordTrait> CoordPoints<'a, C> {
    pub fn new(coords: &'a [C]) -> Self {
        Self { coords }
    }
}

impl<C: CoordTrait> PointSource for CoordPoints<'_, C>
where
    C::T: IndexableFloat,
{
    type Scalar = C::T;

    fn dimension_count(&self) -> usize {
        self.coords.first().map_or(0, |c| c.dim().size())
    }

    fn point_count(&self) -> usize {
        self.coords.len()
    }

    #[inline]
    fn coordinate(&self, index: usize, axis: usize) -> C::T {
        self.coords[index].nth_or_panic(axis)
    }

    fn point_dimension(&self, index: usize) -> usize {
        self.coords[index].dim().size()
    }
}
