use thiserror::Error;

/// Enum with all errors in this crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KdIndexError {
    /// A point, query or bounding box does not have the dimensionality of the indexed collection.
    #[error("Dimension mismatch: expected {expected} dimensions, got {actual}.")]
    DimensionMismatch { expected: usize, actual: usize },

    /// The maximum leaf size must hold at least one point.
    #[error("Invalid maximum leaf size {0}: must be at least 1.")]
    InvalidLeafSize(usize),

    /// A coordinate buffer could not be interpreted as a point collection.
    #[error("Invalid coordinate buffer: {0}")]
    InvalidBuffer(String),

    /// The point collection changed dimensionality since the index was last built.
    #[error("Index was built over {built}-dimensional points but the collection is now {current}-dimensional; call build_index.")]
    StaleIndex { built: usize, current: usize },

    #[error("General error: {0}")]
    General(String),
}

pub type Result<T> = std::result::Result<T, KdIndexError>;
