//! Proximity graph on packed sphere centers.

use nalgebra::Vector3;
use tracing::info;

use super::types::{PtGraph, Sphere};
use crate::cfg::EDGE_SAMPLES;
use crate::distfield::DistTree;

/// Largest field value at `EDGE_SAMPLES` evenly spaced points on `a -> b`.
/// Stops as soon as the running maximum exceeds `max_allowed`.
pub fn max_field_along(tree: &DistTree, a: &Vector3<f64>, b: &Vector3<f64>, max_allowed: f64) -> f64 {
    let diff = (b - a) / (EDGE_SAMPLES - 1) as f64;
    let mut worst = f64::NEG_INFINITY;
    for k in 0..EDGE_SAMPLES {
        let p = a + diff * k as f64;
        worst = worst.max(tree.evaluate(&p));
        if worst > max_allowed {
            break;
        }
    }
    worst
}

/// Connects sphere centers.
///
/// Overlapping spheres (center distance below the mean radius sum) are
/// always adjacent. Other pairs need an empty diametral ball (Gabriel test
/// against all other centers) and a segment that stays at least half the
/// smaller radius inside the surface.
pub fn connect_samples(tree: &DistTree, spheres: &[Sphere]) -> PtGraph {
    let mut out = PtGraph::with_verts(spheres.iter().map(|s| s.center).collect());
    for i in 1..spheres.len() {
        for j in 0..i {
            let (si, sj) = (&spheres[i], &spheres[j]);
            let mid = (si.center + sj.center) * 0.5;
            let half_sq = (si.center - sj.center).norm_squared() * 0.25;
            let reach = si.radius + sj.radius;
            if half_sq < reach * reach * 0.25 {
                out.add_edge(i, j);
                continue;
            }
            let blocked = spheres
                .iter()
                .enumerate()
                .any(|(k, s)| k != i && k != j && (s.center - mid).norm_squared() < half_sq);
            if blocked {
                continue;
            }
            let max_allowed = -0.5 * si.radius.min(sj.radius);
            if max_field_along(tree, &si.center, &sj.center, max_allowed) < max_allowed {
                out.add_edge(i, j);
            }
        }
    }
    info!(verts = out.len(), edges = out.edge_count(), "proximity graph");
    out
}
