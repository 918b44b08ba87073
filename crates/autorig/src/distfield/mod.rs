//! Signed distance field of a mesh on an adaptive octree.
//!
//! Purpose
//! - Give the medial sampler and the graph builder a cheap, differentiable
//!   approximation of the signed distance (negative inside) over `[0, 1]^3`.
//!
//! Why this design
//! - Arena of nodes addressed by index; a split node has exactly 8 children.
//! - The exact oracle is a trait (`DistanceEval`) so tests can build trees
//!   over closed-form fields; `MeshDistance` owns its cache and its box
//!   classification stack for the duration of one build.
//! - Gradients are analytic: the field is piecewise trilinear, so the
//!   derivative of the leaf interpolant is exact for the approximation.
//!
//! References
//! - `crate::geom3` for the projector and the ray-parity test.

mod evaluator;
mod multilinear;
mod octree;

pub use evaluator::{DistCache, DistanceEval, MeshDistance, PointDistance, Side};
pub use multilinear::Multilinear;
pub use octree::{DistNode, DistTree, NodeId};

#[cfg(test)]
mod tests;
