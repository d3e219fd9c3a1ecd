use std::fmt::Debug;

use num_traits::Float;

/// A trait for the scalar types that can be used for indexed coordinates.
///
/// This trait is sealed and cannot be implemented for external types. Squared distances are
/// reported in the same type as the coordinates, so only floating point types are allowed.
pub trait IndexableFloat:
    private::Sealed + Float + Debug + Default + Send + Sync + bytemuck::Pod
{
    /// The number of bytes per element
    const BYTES_PER_ELEMENT: usize;
}

impl IndexableFloat for f32 {
    const BYTES_PER_ELEMENT: usize = 4;
}

impl IndexableFloat for f64 {
    const BYTES_PER_ELEMENT: usize = 8;
}

// https://rust-lang.github.io/api-guidelines/future-proofing.html#sealed-traits-protect-against-downstream-implementations-c-sealed
mod private {
    pub trait Sealed {}

    impl Sealed for f32 {}
    impl Sealed for f64 {}
}
