//! Articulated skeletons: full joint tree plus its compressed form.
//!
//! The matcher works on the compressed graph, where chains of degree-2
//! joints collapse into one bone; path reconstruction uses the maps and
//! length fractions to place the dropped joints again.

mod builder;
mod types;

pub use builder::SkeletonBuilder;
pub use types::{Skeleton, SkeletonError};

#[cfg(test)]
mod tests;
