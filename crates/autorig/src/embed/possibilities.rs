use tracing::debug;

use crate::cfg::FAT_CANDIDATES;
use crate::discretize::{PtGraph, Sphere};
use crate::geom3::normalize_or_zero;
use crate::skeleton::Skeleton;

/// Graph vertices that look like the tip of a limb: for some neighbour `e1`,
/// no neighbour of comparable size continues in the direction `e1 -> v`.
pub fn limb_vertices(graph: &PtGraph, spheres: &[Sphere]) -> Vec<usize> {
    (0..graph.len())
        .filter(|&i| {
            let cur = graph.verts[i];
            let rad = spheres[i].radius;
            let nb = &graph.edges[i];
            nb.iter().any(|&j| {
                let incoming = normalize_or_zero(cur - graph.verts[j]);
                !nb.iter().any(|&k| {
                    rad <= 2.0 * spheres[k].radius
                        && normalize_or_zero(graph.verts[k] - cur).dot(&incoming) > 0.8
                })
            })
        })
        .collect()
}

/// Vertices whose radius reaches the `FAT_CANDIDATES`-th largest one
/// (all vertices on smaller graphs).
pub fn fat_vertices(spheres: &[Sphere]) -> Vec<usize> {
    let mut rads: Vec<f64> = spheres.iter().map(|s| s.radius).collect();
    rads.sort_by(f64::total_cmp);
    let cutoff = if rads.len() < FAT_CANDIDATES {
        f64::NEG_INFINITY
    } else {
        rads[rads.len() - FAT_CANDIDATES]
    };
    (0..spheres.len())
        .filter(|&i| spheres[i].radius >= cutoff)
        .collect()
}

/// Candidate graph vertices per compressed joint.
///
/// Fat joints get the fat set, other leaf joints the limb set, everything
/// else all vertices. Callers may pin joint `c` to vertex `v` afterwards by
/// replacing entry `c` with `vec![v]`.
pub fn compute_possibilities(
    graph: &PtGraph,
    spheres: &[Sphere],
    skeleton: &Skeleton,
) -> Vec<Vec<usize>> {
    let all: Vec<usize> = (0..graph.len()).collect();
    let limb = limb_vertices(graph, spheres);
    let fat = fat_vertices(spheres);
    debug!(limb = limb.len(), fat = fat.len(), "candidate sets");
    (0..skeleton.compressed_len())
        .map(|c| {
            if skeleton.c_fat()[c] {
                fat.clone()
            } else if skeleton.c_graph().edges[c].len() == 1 {
                limb.clone()
            } else {
                all.clone()
            }
        })
        .collect()
}
