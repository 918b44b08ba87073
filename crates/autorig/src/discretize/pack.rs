use tracing::info;

use super::types::Sphere;

/// Greedy sparsification of radius-sorted samples.
///
/// A sample is kept unless its center lies strictly inside an already kept
/// sphere. At most `max_count` spheres are returned.
pub fn pack_spheres(samples: &[Sphere], max_count: usize) -> Vec<Sphere> {
    let mut out: Vec<Sphere> = Vec::new();
    for s in samples {
        if out.len() >= max_count {
            break;
        }
        let covered = out
            .iter()
            .any(|k| (k.center - s.center).norm_squared() < k.radius * k.radius);
        if !covered {
            out.push(*s);
        }
    }
    info!(spheres = out.len(), from = samples.len(), "packed spheres");
    out
}
