//! Medial-surface sampling on the distance-field octree.

use nalgebra::Vector3;
use tracing::{debug, info, warn};

use super::types::Sphere;
use crate::distfield::DistTree;
use crate::geom3::normalize_or_zero;

/// Smallest pairwise dot product between field gradients probed at the 8
/// diagonal offsets `c ± step` per axis.
///
/// Values near -1 mean neighbouring probes see different nearest surface
/// points, i.e. `c` is close to the medial surface. Zero gradients carry no
/// direction and are skipped; with fewer than two usable probes the result
/// is 1.
pub fn min_dot(tree: &DistTree, c: &Vector3<f64>, step: f64) -> f64 {
    let dirs: Vec<Vector3<f64>> = (0..8)
        .map(|i| {
            let off = Vector3::from_fn(|k, _| if (i >> k) & 1 == 1 { step } else { -step });
            normalize_or_zero(tree.gradient(&(c + off)))
        })
        .filter(|g| *g != Vector3::zeros())
        .collect();
    let mut out: f64 = 1.0;
    for i in 1..dirs.len() {
        for j in 0..i {
            out = out.min(dirs[i].dot(&dirs[j]));
        }
    }
    out
}

/// Medial-surface samples sorted by radius, largest first.
///
/// Leaves whose corner probes agree are skipped. Other leaves are sampled on
/// a `step` grid over the three faces through their `lo` corner (the other
/// three faces belong to neighbouring cells); a sample survives when it is
/// more than `2 * step` inside and its own fine probe still disagrees.
/// A `step` that is not finite and positive yields no samples.
pub fn sample_medial_surface(tree: &DistTree, step: f64) -> Vec<Sphere> {
    if !(step.is_finite() && step > 0.0) {
        warn!(step, "medial step must be finite and positive");
        return Vec::new();
    }
    let mut out = Vec::new();
    let mut visited_leaves = 0usize;
    let mut candidates = 0usize;
    for id in tree.level_order() {
        let node = tree.node(id);
        if !node.is_leaf() {
            continue;
        }
        visited_leaves += 1;
        let rect = node.rect;
        if min_dot(tree, &rect.center(), rect.half_diagonal()) > 0.0 {
            continue;
        }
        candidates += 1;
        let side = rect.size()[0];
        let n = (side / step + 1e-9).floor() as usize;
        let mut pts = Vec::with_capacity(3 * (n + 1) * (n + 1));
        for a in 0..=n {
            let x = a as f64 * step;
            for b in 0..=n {
                let y = b as f64 * step;
                pts.push(rect.lo + Vector3::new(x, y, 0.0));
                if b != 0 {
                    pts.push(rect.lo + Vector3::new(x, 0.0, y));
                }
                if a != 0 && b != 0 {
                    pts.push(rect.lo + Vector3::new(0.0, x, y));
                }
            }
        }
        for p in pts {
            let dist = -tree.evaluate(&p);
            if dist <= 2.0 * step {
                continue;
            }
            if min_dot(tree, &p, step * 0.001) > 0.0 {
                continue;
            }
            out.push(Sphere::new(p, dist));
        }
    }
    out.sort_by(|a, b| b.radius.total_cmp(&a.radius));
    debug!(visited_leaves, candidates, "medial leaves scanned");
    info!(samples = out.len(), "medial axis points");
    out
}
