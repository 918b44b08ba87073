//! Adaptive octree over `[0, 1]^3` with a trilinear interpolant per node.
//!
//! Nodes live in one arena. A split node owns exactly 8 consecutive children
//! starting at `first_child`; child `i` is the octant whose corner `i`
//! coincides with the parent's corner `i`.

use nalgebra::Vector3;
use tracing::{debug, info};

use super::evaluator::{DistanceEval, MeshDistance};
use super::multilinear::Multilinear;
use crate::cfg::MAX_TREE_LEVEL;
use crate::geom3::{Rect3, TriMesh};

pub type NodeId = usize;

#[derive(Clone, Debug)]
pub struct DistNode {
    pub rect: Rect3,
    pub interp: Multilinear,
    pub level: usize,
    first_child: Option<u32>,
}

impl DistNode {
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.first_child.is_none()
    }

    /// Interpolated value at a global point (extrapolates outside `rect`).
    #[inline]
    pub fn evaluate(&self, p: &Vector3<f64>) -> f64 {
        self.interp.evaluate(&self.rect.to_local(p))
    }

    /// Gradient at a global point.
    #[inline]
    pub fn gradient(&self, p: &Vector3<f64>) -> Vector3<f64> {
        self.interp
            .gradient(&self.rect.to_local(p))
            .component_div(&self.rect.size())
    }
}

/// Signed distance field approximated on an adaptive octree.
#[derive(Clone, Debug)]
pub struct DistTree {
    nodes: Vec<DistNode>,
}

/// Child octant of `rect` with index `idx` (same bit convention as corners).
fn octant(rect: &Rect3, idx: usize) -> Rect3 {
    let c = rect.center();
    let mut lo = rect.lo;
    let mut hi = c;
    for k in 0..3 {
        if (idx >> k) & 1 == 1 {
            lo[k] = c[k];
            hi[k] = rect.hi[k];
        }
    }
    Rect3::new(lo, hi)
}

/// The 3x3x3 grid points of `rect` that are not corners.
fn check_points(rect: &Rect3) -> impl Iterator<Item = Vector3<f64>> + '_ {
    (0..27usize).filter_map(move |n| {
        let t = [n % 3, (n / 3) % 3, n / 9];
        if !t.contains(&1) {
            return None;
        }
        Some(Vector3::from_fn(|k, _| {
            rect.lo[k] + rect.size()[k] * (t[k] as f64) * 0.5
        }))
    })
}

impl DistTree {
    /// Signed distance field of a normalized mesh with outside cropping on.
    pub fn build(mesh: &TriMesh, tol: f64) -> Self {
        let mut eval = MeshDistance::new(mesh);
        Self::build_with(&mut eval, tol, true)
    }

    /// Refines from the unit cube until every cell reproduces `eval` within
    /// `tol` at its edge, face and center midpoints, or the depth limit is hit.
    pub fn build_with<E: DistanceEval>(eval: &mut E, tol: f64, crop_outside: bool) -> Self {
        let mut tree = Self {
            nodes: vec![DistNode {
                rect: Rect3::unit(),
                interp: Multilinear::default(),
                level: 0,
                first_child: None,
            }],
        };
        debug!(tol, crop_outside, "building distance field");
        tree.split(0, eval, tol, crop_outside);
        info!(
            nodes = tree.node_count(),
            max_level = tree.max_level(),
            "distance field built"
        );
        tree
    }

    fn split<E: DistanceEval>(&mut self, id: NodeId, eval: &mut E, tol: f64, mut crop: bool) {
        let rect = self.nodes[id].rect;
        let level = self.nodes[id].level;
        eval.set_rect(&rect);
        let interp = Multilinear::sample(&rect, |p| eval.eval(p));
        self.nodes[id].interp = interp;

        if crop && level > 0 {
            let d = eval.eval(&rect.center());
            let reach = rect.half_diagonal();
            if d > reach {
                return;
            }
            if d < -reach {
                crop = false;
            }
        }
        if level >= MAX_TREE_LEVEL {
            return;
        }
        let refine = level == 0
            || check_points(&rect)
                .any(|p| (interp.evaluate(&rect.to_local(&p)) - eval.eval(&p)).abs() > tol);
        if !refine {
            return;
        }

        let first = self.nodes.len();
        for i in 0..8 {
            self.nodes.push(DistNode {
                rect: octant(&rect, i),
                interp: Multilinear::default(),
                level: level + 1,
                first_child: None,
            });
        }
        self.nodes[id].first_child = Some(first as u32);
        for i in 0..8 {
            self.split(first + i, eval, tol, crop);
        }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        0
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &DistNode {
        &self.nodes[id]
    }

    /// The 8 children of a split node, `None` for a leaf.
    pub fn children(&self, id: NodeId) -> Option<std::ops::Range<NodeId>> {
        self.nodes[id].first_child.map(|f| {
            let f = f as usize;
            f..f + 8
        })
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn max_level(&self) -> usize {
        self.nodes.iter().map(|n| n.level).max().unwrap_or(0)
    }

    pub fn leaves(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).filter(|&i| self.nodes[i].is_leaf())
    }

    /// Node ids in breadth-first (level) order starting at the root.
    pub fn level_order(&self) -> Vec<NodeId> {
        let mut out = vec![self.root()];
        let mut i = 0;
        while i < out.len() {
            if let Some(ch) = self.children(out[i]) {
                out.extend(ch);
            }
            i += 1;
        }
        out
    }

    /// Leaf whose cell contains `p`; points outside the unit cube are routed
    /// to the nearest octant at every level.
    pub fn locate(&self, p: &Vector3<f64>) -> NodeId {
        let mut id = self.root();
        while let Some(first) = self.nodes[id].first_child {
            let c = self.nodes[id].rect.center();
            let mut idx = 0;
            for k in 0..3 {
                if p[k] > c[k] {
                    idx |= 1 << k;
                }
            }
            id = first as usize + idx;
        }
        id
    }

    #[inline]
    pub fn evaluate(&self, p: &Vector3<f64>) -> f64 {
        self.nodes[self.locate(p)].evaluate(p)
    }

    /// Gradient of the piecewise-trilinear field at `p`.
    #[inline]
    pub fn gradient(&self, p: &Vector3<f64>) -> Vector3<f64> {
        self.nodes[self.locate(p)].gradient(p)
    }

    /// Integral of the field over `rect` (zero where it misses the cube).
    pub fn integrate(&self, rect: &Rect3) -> f64 {
        let mut total = 0.0;
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id];
            let clip = node.rect.intersect(rect);
            if clip.is_empty() {
                continue;
            }
            match self.children(id) {
                Some(ch) => stack.extend(ch),
                None => {
                    let lo = node.rect.to_local(&clip.lo);
                    let hi = node.rect.to_local(&clip.hi);
                    total += clip.content() * node.interp.mean_over(&lo, &hi);
                }
            }
        }
        total
    }
}
