//! From distance field to proximity graph.
//!
//! Purpose
//! - Reduce the mesh interior to a small graph the skeleton can be matched
//!   against: medial samples, a sparse sphere packing of them, and a
//!   Gabriel-style graph on the packed centers.
//!
//! Why this design
//! - Every stage reads the octree only (`evaluate`, `gradient`), never the
//!   mesh, so the stages can be tested on closed-form fields.
//! - The proximity graph keeps plain adjacency lists; it is small (at most a
//!   few thousand vertices) and read-only once built.

mod connect;
mod medial;
mod pack;
mod types;

pub use connect::{connect_samples, max_field_along};
pub use medial::{min_dot, sample_medial_surface};
pub use pack::pack_spheres;
pub use types::{PtGraph, Sphere};

#[cfg(test)]
mod tests;
