//! Curated API for workspace callers.
//!
//! Important
//! - Prefer these re-exports over deep module paths; internal layout may
//!   move between versions while this list stays put.

// 3D geometry
pub use crate::geom3::{
    shapes, MeshError, Normalization, Rect3, TriMesh, TriangleBvh, XRayIntersector,
};
// Distance field
pub use crate::distfield::{DistTree, DistanceEval, MeshDistance, PointDistance};
// Discretization
pub use crate::discretize::{
    connect_samples, pack_spheres, sample_medial_surface, PtGraph, Sphere,
};
// Skeletons
pub use crate::skeleton::{Skeleton, SkeletonBuilder, SkeletonError};
// Embedding
pub use crate::embed::{
    compute_possibilities, discrete_embed, split_paths, AllShortestPaths, Penalty,
    PenaltyWeights, SearchCfg, SearchMode, SearchStats,
};
// Pipeline
pub use crate::cfg::{RigCfg, DEFAULT_MAX_SPHERES, DEFAULT_TREE_TOL};
pub use crate::pipeline::{autorig, prepare_mesh, try_autorig, RigError, RigOutput};
