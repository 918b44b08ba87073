//! Crossings of axis-parallel (+x) lines with a triangle soup.
//!
//! Triangles are projected onto the YZ plane and bucketed on a uniform grid.
//! Coverage uses edge functions with a top-left tie rule evaluated in a
//! canonical endpoint order, so a line through a shared edge or vertex of a
//! closed mesh is counted exactly once per surface layer.
//!
//! Known limitation: one fixed direction and a parity count assume a single
//! closed, manifold component; other inputs may be misclassified.

use nalgebra::{Vector2, Vector3};

use super::mesh::TriMesh;

const GRID: usize = 64;

#[derive(Clone, Debug)]
pub struct XRayIntersector {
    tris: Vec<[Vector3<f64>; 3]>,
    cells: Vec<Vec<usize>>,
    lo: Vector2<f64>,
    size: Vector2<f64>,
}

#[inline]
fn yz(v: &Vector3<f64>) -> Vector2<f64> {
    Vector2::new(v.y, v.z)
}

/// Edge function of `q` against the directed edge `v0 -> v1`, evaluated with
/// the endpoints in lexicographic order so both incident triangles agree bit
/// for bit (up to sign).
#[inline]
fn edge_fn(v0: &Vector2<f64>, v1: &Vector2<f64>, q: &Vector2<f64>) -> f64 {
    let forward = v0.x < v1.x || (v0.x == v1.x && v0.y <= v1.y);
    let (a, b) = if forward { (v0, v1) } else { (v1, v0) };
    let w = (b.x - a.x) * (q.y - a.y) - (b.y - a.y) * (q.x - a.x);
    if forward {
        w
    } else {
        -w
    }
}

#[inline]
fn is_top_left(v0: &Vector2<f64>, v1: &Vector2<f64>) -> bool {
    let d = v1 - v0;
    d.y > 0.0 || (d.y == 0.0 && d.x < 0.0)
}

#[inline]
fn covers(w: f64, v0: &Vector2<f64>, v1: &Vector2<f64>) -> bool {
    w > 0.0 || (w == 0.0 && is_top_left(v0, v1))
}

impl XRayIntersector {
    pub fn new(mesh: &TriMesh) -> Self {
        let tris: Vec<[Vector3<f64>; 3]> =
            (0..mesh.triangles.len()).map(|t| mesh.triangle(t)).collect();
        let (lo, size) = match mesh.bounding_box() {
            Some(b) => {
                let lo = yz(&b.lo);
                let size = (yz(&b.hi) - lo).map(|s| s.max(1e-12));
                (lo, size)
            }
            None => (Vector2::zeros(), Vector2::repeat(1.0)),
        };
        let mut out = Self {
            tris,
            cells: vec![Vec::new(); GRID * GRID],
            lo,
            size,
        };
        for t in 0..out.tris.len() {
            let tri = out.tris[t];
            let p: Vec<Vector2<f64>> = tri.iter().map(yz).collect();
            let min = p[0].inf(&p[1]).inf(&p[2]);
            let max = p[0].sup(&p[1]).sup(&p[2]);
            let (i0, j0) = out.cell_of(&min);
            let (i1, j1) = out.cell_of(&max);
            for i in i0..=i1 {
                for j in j0..=j1 {
                    out.cells[i * GRID + j].push(t);
                }
            }
        }
        out
    }

    #[inline]
    fn cell_of(&self, q: &Vector2<f64>) -> (usize, usize) {
        let f = |c: f64, lo: f64, size: f64| -> usize {
            let k = ((c - lo) / size * GRID as f64).floor();
            if k.is_nan() || k < 0.0 {
                0
            } else {
                (k as usize).min(GRID - 1)
            }
        };
        (f(q.x, self.lo.x, self.size.x), f(q.y, self.lo.y, self.size.y))
    }

    /// X coordinates where the line `{(t, p.y, p.z)}` crosses the surface.
    pub fn crossings(&self, p: &Vector3<f64>) -> Vec<f64> {
        let q = yz(p);
        let (i, j) = self.cell_of(&q);
        let mut out = Vec::new();
        for &t in &self.cells[i * GRID + j] {
            let [a3, mut b3, mut c3] = self.tris[t];
            let (a, mut b, mut c) = (yz(&a3), yz(&b3), yz(&c3));
            let area = edge_fn(&a, &b, &c);
            if area == 0.0 {
                continue;
            }
            if area < 0.0 {
                std::mem::swap(&mut b, &mut c);
                std::mem::swap(&mut b3, &mut c3);
            }
            let wa = edge_fn(&b, &c, &q);
            let wb = edge_fn(&c, &a, &q);
            let wc = edge_fn(&a, &b, &q);
            if !(covers(wa, &b, &c) && covers(wb, &c, &a) && covers(wc, &a, &b)) {
                continue;
            }
            let sum = wa + wb + wc;
            if sum <= 0.0 {
                continue;
            }
            out.push((wa * a3.x + wb * b3.x + wc * c3.x) / sum);
        }
        out
    }

    /// Parity test: odd number of crossings beyond `p.x` means inside.
    pub fn is_inside(&self, p: &Vector3<f64>) -> bool {
        self.crossings(p).iter().filter(|&&x| x > p.x).count() % 2 == 1
    }
}
