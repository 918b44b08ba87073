//! End-to-end skeleton embedding.
//!
//! Stages: prepare mesh, distance field, medial samples, sphere packing,
//! proximity graph, candidate sets, discrete embedding, path reconstruction.
//! Continuous refinement and skin attachment happen downstream.

use std::fmt;

use nalgebra::Vector3;
use tracing::{debug, info, warn};

use crate::cfg::RigCfg;
use crate::discretize::{connect_samples, pack_spheres, sample_medial_surface, PtGraph, Sphere};
use crate::distfield::{DistTree, MeshDistance};
use crate::embed::{
    compute_possibilities, search, split_paths, AllShortestPaths, PenaltyCtx, SearchStats,
};
use crate::geom3::{MeshError, Normalization, TriMesh};
use crate::skeleton::Skeleton;

/// Why an embedding could not be produced.
#[derive(Debug, Clone, PartialEq)]
pub enum RigError {
    Mesh(MeshError),
    /// A tolerance in `RigCfg` is not a finite positive number.
    InvalidTolerance { name: &'static str, value: f64 },
    /// The medial sampler found no interior point far enough from the surface.
    NoSpheres,
    /// The search exhausted every candidate sequence.
    NoMatch,
}

impl fmt::Display for RigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RigError::Mesh(e) => write!(f, "mesh rejected: {e}"),
            RigError::InvalidTolerance { name, value } => {
                write!(f, "{name} must be finite and positive, got {value}")
            }
            RigError::NoSpheres => write!(f, "no medial spheres inside the mesh"),
            RigError::NoMatch => write!(f, "no embedding below the penalty budget"),
        }
    }
}

impl std::error::Error for RigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RigError::Mesh(e) => Some(e),
            _ => None,
        }
    }
}

impl From<MeshError> for RigError {
    fn from(e: MeshError) -> Self {
        RigError::Mesh(e)
    }
}

/// Everything a successful run produces, in normalized mesh coordinates.
#[derive(Clone, Debug)]
pub struct RigOutput {
    /// One position per full skeleton joint.
    pub embedding: Vec<Vector3<f64>>,
    /// Graph vertex per compressed joint.
    pub assignment: Vec<usize>,
    /// Sum of weighted penalties of the winning assignment.
    pub penalty: f64,
    pub normalization: Normalization,
    pub field: DistTree,
    pub spheres: Vec<Sphere>,
    pub graph: PtGraph,
    pub stats: SearchStats,
}

impl RigOutput {
    /// Embedding mapped back to the caller's mesh coordinates.
    pub fn world_embedding(&self) -> Vec<Vector3<f64>> {
        self.embedding
            .iter()
            .map(|p| self.normalization.invert(p))
            .collect()
    }
}

/// Validated copy of `mesh` fitted into the unit cube.
pub fn prepare_mesh(mesh: &TriMesh) -> Result<(TriMesh, Normalization), MeshError> {
    mesh.prepared().map_err(|e| {
        warn!(error = %e, "mesh rejected");
        e
    })
}

fn check_tolerance(name: &'static str, value: f64) -> Result<(), RigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        warn!(name, value, "invalid tolerance");
        Err(RigError::InvalidTolerance { name, value })
    }
}

/// Runs every stage and reports the first failure.
pub fn try_autorig(skeleton: &Skeleton, mesh: &TriMesh, cfg: &RigCfg) -> Result<RigOutput, RigError> {
    check_tolerance("tree_tol", cfg.tree_tol)?;
    check_tolerance("medial_tol", cfg.medial_tol)?;
    let (mesh, normalization) = prepare_mesh(mesh)?;
    debug!(
        verts = mesh.vertices.len(),
        tris = mesh.triangles.len(),
        scale = normalization.scale,
        "mesh prepared"
    );

    let field = {
        let mut eval = MeshDistance::new(&mesh);
        DistTree::build_with(&mut eval, cfg.tree_tol, cfg.crop_outside)
    };

    let samples = sample_medial_surface(&field, cfg.medial_tol);
    let spheres = pack_spheres(&samples, cfg.max_spheres);
    if spheres.is_empty() {
        warn!("no medial spheres");
        return Err(RigError::NoSpheres);
    }
    let graph = connect_samples(&field, &spheres);

    let possibilities = compute_possibilities(&graph, &spheres, skeleton);
    let paths = AllShortestPaths::new(&graph);
    debug!(verts = graph.len(), "shortest paths ready");
    let ctx = PenaltyCtx::new(&graph, &spheres, skeleton, &paths);
    let (found, stats) = search(&ctx, &possibilities, &cfg.search);
    let found = found.ok_or(RigError::NoMatch)?;

    let embedding = split_paths(&found.matched, &graph, skeleton, &paths);
    info!(joints = embedding.len(), penalty = found.penalty, "embedding done");
    Ok(RigOutput {
        embedding,
        assignment: found.matched,
        penalty: found.penalty,
        normalization,
        field,
        spheres,
        graph,
        stats,
    })
}

/// Joint positions (normalized coordinates, indexed by full joint), or an
/// empty list when any stage fails.
pub fn autorig(skeleton: &Skeleton, mesh: &TriMesh, cfg: &RigCfg) -> Vec<Vector3<f64>> {
    match try_autorig(skeleton, mesh, cfg) {
        Ok(out) => out.embedding,
        Err(e) => {
            warn!(error = %e, "autorig failed");
            Vec::new()
        }
    }
}
