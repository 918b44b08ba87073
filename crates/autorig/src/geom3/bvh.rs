//! Bounding-volume hierarchy over triangles for nearest-surface-point queries.
//!
//! Median split on the longest axis of the centroid bounds; leaves hold at
//! most `LEAF_SIZE` triangles. Nodes live in one arena and refer to each other
//! by index.

use nalgebra::Vector3;

use super::mesh::TriMesh;
use super::types::Rect3;
use super::util::closest_point_on_triangle;

const LEAF_SIZE: usize = 4;

#[derive(Clone, Debug)]
enum NodeKind {
    Leaf { start: usize, end: usize },
    Inner { left: usize, right: usize },
}

#[derive(Clone, Debug)]
struct BvhNode {
    bbox: Rect3,
    kind: NodeKind,
}

/// Projects points onto a triangle soup.
#[derive(Clone, Debug, Default)]
pub struct TriangleBvh {
    tris: Vec<[Vector3<f64>; 3]>,
    order: Vec<usize>,
    nodes: Vec<BvhNode>,
}

fn tri_box(t: &[Vector3<f64>; 3]) -> Rect3 {
    Rect3::from_point(t[0])
        .union(&Rect3::from_point(t[1]))
        .union(&Rect3::from_point(t[2]))
}

impl TriangleBvh {
    pub fn new(mesh: &TriMesh) -> Self {
        let tris: Vec<[Vector3<f64>; 3]> =
            (0..mesh.triangles.len()).map(|t| mesh.triangle(t)).collect();
        let centroids: Vec<Vector3<f64>> = tris
            .iter()
            .map(|t| (t[0] + t[1] + t[2]) / 3.0)
            .collect();
        let mut out = Self {
            order: (0..tris.len()).collect(),
            tris,
            nodes: Vec::new(),
        };
        if !out.tris.is_empty() {
            out.build(&centroids, 0, out.tris.len());
        }
        out
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tris.is_empty()
    }

    fn build(&mut self, centroids: &[Vector3<f64>], start: usize, end: usize) -> usize {
        let bbox = self.order[start..end]
            .iter()
            .map(|&t| tri_box(&self.tris[t]))
            .reduce(|a, b| a.union(&b))
            .unwrap_or_else(|| Rect3::from_point(Vector3::zeros()));
        let idx = self.nodes.len();
        if end - start <= LEAF_SIZE {
            self.nodes.push(BvhNode {
                bbox,
                kind: NodeKind::Leaf { start, end },
            });
            return idx;
        }
        let cbox = self.order[start..end]
            .iter()
            .map(|&t| Rect3::from_point(centroids[t]))
            .reduce(|a, b| a.union(&b))
            .unwrap_or(bbox);
        let axis = cbox.size().imax();
        let mid = (start + end) / 2;
        self.order[start..end].select_nth_unstable_by(mid - start, |&a, &b| {
            centroids[a][axis].total_cmp(&centroids[b][axis])
        });
        // Placeholder until both subtrees exist.
        self.nodes.push(BvhNode {
            bbox,
            kind: NodeKind::Leaf { start, end },
        });
        let left = self.build(centroids, start, mid);
        let right = self.build(centroids, mid, end);
        self.nodes[idx].kind = NodeKind::Inner { left, right };
        idx
    }

    /// Nearest point on the surface, `None` for an empty soup.
    pub fn closest_point(&self, p: &Vector3<f64>) -> Option<Vector3<f64>> {
        if self.nodes.is_empty() {
            return None;
        }
        let mut best = None;
        let mut best_d2 = f64::INFINITY;
        let mut stack = vec![0usize];
        while let Some(n) = stack.pop() {
            let node = &self.nodes[n];
            if node.bbox.exterior_distance_sq(p) >= best_d2 {
                continue;
            }
            match node.kind {
                NodeKind::Leaf { start, end } => {
                    for &t in &self.order[start..end] {
                        let [a, b, c] = &self.tris[t];
                        let q = closest_point_on_triangle(p, a, b, c);
                        let d2 = (q - p).norm_squared();
                        if d2 < best_d2 {
                            best_d2 = d2;
                            best = Some(q);
                        }
                    }
                }
                NodeKind::Inner { left, right } => {
                    let dl = self.nodes[left].bbox.exterior_distance_sq(p);
                    let dr = self.nodes[right].bbox.exterior_distance_sq(p);
                    // Visit the nearer child first (pushed last).
                    if dl < dr {
                        stack.push(right);
                        stack.push(left);
                    } else {
                        stack.push(left);
                        stack.push(right);
                    }
                }
            }
        }
        best
    }

    /// Unsigned distance to the surface (`+inf` for an empty soup).
    pub fn distance(&self, p: &Vector3<f64>) -> f64 {
        self.closest_point(p)
            .map(|q| (q - p).norm())
            .unwrap_or(f64::INFINITY)
    }
}
