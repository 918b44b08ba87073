//! Tolerances and fixed constants for the rigging pipeline.
//!
//! Policy
//! - Algorithmic constants are fixed `pub(crate)` values; only the knobs a
//!   caller legitimately tunes (tolerances, sphere budget, search mode) live
//!   in `RigCfg`.

use crate::embed::SearchCfg;

/// Octree depth bound: `32 / Dim` levels below the root.
pub(crate) const MAX_TREE_LEVEL: usize = 32 / 3;
/// Distance cache quantization: `round(x * 1023)` per axis, stride 1024.
pub(crate) const CACHE_SCALE: f64 = 1023.0;
/// Sentinel cost for structurally impossible candidates.
pub(crate) const NOMATCH: f64 = 1e10;
/// Fraction of the end-sphere radii credited to a bone's graph length.
pub(crate) const DIST_PLAY_FACTOR: f64 = 0.7;
/// Number of largest-radius graph vertices eligible for "fat" joints.
pub(crate) const FAT_CANDIDATES: usize = 50;
/// Spheres below this radius cannot host two bone paths.
pub(crate) const THIN_SPHERE_RADIUS: f64 = 0.02;
/// Edge interiority is checked at this many points along the segment.
pub(crate) const EDGE_SAMPLES: usize = 101;

/// Default octree tolerance (also the medial sampling step).
pub const DEFAULT_TREE_TOL: f64 = 0.003;
/// Default upper bound on packed spheres.
pub const DEFAULT_MAX_SPHERES: usize = 1000;

/// Pipeline configuration.
#[derive(Clone, Copy, Debug)]
pub struct RigCfg {
    /// Max |interpolated - exact| allowed in an unsplit octree cell.
    pub tree_tol: f64,
    /// Grid step for medial-surface sampling.
    pub medial_tol: f64,
    pub max_spheres: usize,
    /// Skip octree cells that are provably outside the mesh.
    pub crop_outside: bool,
    pub search: SearchCfg,
}

impl Default for RigCfg {
    fn default() -> Self {
        Self {
            tree_tol: DEFAULT_TREE_TOL,
            medial_tol: DEFAULT_TREE_TOL,
            max_spheres: DEFAULT_MAX_SPHERES,
            crop_outside: true,
            search: SearchCfg::default(),
        }
    }
}
