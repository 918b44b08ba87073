//! Automatic skeleton embedding for closed triangle meshes.
//!
//! Pipeline (leaves first)
//! - `geom3`: boxes, triangle soups, nearest-point and ray-parity queries.
//! - `distfield`: adaptive octree approximating the signed distance field.
//! - `discretize`: medial-axis samples, sphere packing, proximity graph.
//! - `skeleton`: full and compressed (degree-2-free) joint graphs.
//! - `embed`: best-first matching of the compressed skeleton onto the
//!   proximity graph, then reconstruction of the full joint positions.
//! - `pipeline`: the end-to-end `autorig` call.
//!
//! API Policy
//! - The crate is consumed by the workspace CLI and by downstream attachment
//!   code. Prefer the curated surface in `api` over deep module paths.

pub mod api;
pub mod cfg;
pub mod discretize;
pub mod distfield;
pub mod embed;
pub mod geom3;
pub mod pipeline;
pub mod skeleton;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use cfg::RigCfg;
pub use nalgebra::Vector3 as Vec3;
pub use pipeline::{autorig, prepare_mesh, try_autorig, RigError, RigOutput};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::discretize::{PtGraph, Sphere};
    pub use crate::distfield::{DistTree, DistanceEval, MeshDistance};
    pub use crate::embed::{SearchCfg, SearchMode};
    pub use crate::geom3::{Rect3, TriMesh};
    pub use crate::skeleton::{Skeleton, SkeletonBuilder};
    pub use crate::{autorig, RigCfg};
    pub use nalgebra::Vector3;
}
