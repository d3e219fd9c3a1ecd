#![doc = include_str!("../README.md")]

pub mod bbox;
pub mod distance;
mod error;
pub mod kdtree;
pub mod source;
mod r#type;

pub use error::{KdIndexError, Result};
pub use r#type::IndexableFloat;

#[cfg(test)]
pub(crate) mod test;
