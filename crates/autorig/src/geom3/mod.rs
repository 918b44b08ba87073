//! 3D geometry primitives for the rigging pipeline.
//!
//! Purpose
//! - Provide the pieces the distance evaluator needs from a mesh: axis-aligned
//!   boxes, a validated triangle soup fitted into the unit cube, nearest
//!   surface point queries and ray-parity inside/outside classification.
//!
//! Why this design
//! - `Rect<D>` is generic in the dimension so the corner numbering and the
//!   multilinear weights stay in one place; the pipeline only instantiates 3.
//! - Acceleration structures (`TriangleBvh`, `XRayIntersector`) are built once
//!   per mesh and borrowed immutably afterwards.
//!
//! Conventions
//! - Meshes handed to `distfield` are normalized: largest side 0.9, centered
//!   at (0.5, 0.5, 0.5).
//! - The inside test casts one +x line; multi-component or non-manifold meshes
//!   may be misclassified.

mod bvh;
mod mesh;
mod ray;
pub mod shapes;
mod types;
mod util;

pub use bvh::TriangleBvh;
pub use mesh::{MeshError, Normalization, TriMesh};
pub use ray::XRayIntersector;
pub use types::{Rect, Rect3};
pub use util::{closest_point_on_triangle, normalize_or_zero, smooth_interp};
